use fieldnotes_core::timer::{
    FocusSession, SilentTone, StartOutcome, TimerState, ToneError, TonePlayer, FOCUS_BUDGET_SECS,
};
use fieldnotes_core::{
    Clock, KeyValueStore, ManualClock, MemoryKeyValueStore, NotificationCenter, NotificationKind,
};

struct BrokenSpeaker {
    attempts: usize,
}

impl TonePlayer for BrokenSpeaker {
    fn play(&mut self) -> Result<(), ToneError> {
        self.attempts += 1;
        Err(ToneError("no audio device".to_string()))
    }
}

fn run_seconds(
    session: &mut FocusSession<'_>,
    clock: &ManualClock,
    seconds: u32,
    tone: &mut dyn TonePlayer,
    notices: &mut NotificationCenter,
) -> Vec<i64> {
    let mut logged = Vec::new();
    for _ in 0..seconds {
        clock.advance_secs(1);
        if let Some(id) = session.poll(tone, notices) {
            logged.push(id);
        }
    }
    logged
}

#[test]
fn full_interval_completes_once_and_logs_one_session() {
    let kv = MemoryKeyValueStore::new();
    let clock = ManualClock::new(1_700_000_000_000);
    let mut notices = NotificationCenter::new();
    let mut session = FocusSession::open(&kv, &clock);

    assert_eq!(session.start(), StartOutcome::Started);
    let logged = run_seconds(&mut session, &clock, 1_500, &mut SilentTone, &mut notices);

    assert_eq!(logged.len(), 1);
    assert_eq!(session.sessions().len(), 1);
    let entry = &session.sessions()[0];
    assert_eq!(entry.duration_seconds, 1_500);
    assert_eq!(entry.duration_seconds, FOCUS_BUDGET_SECS);
    assert!(entry.completed);
    assert_eq!(entry.date, clock.now_ms());

    assert_eq!(session.timer().state(), TimerState::Idle);
    assert_eq!(session.timer().readout(), "25:00");
    assert!(!session.timer().has_tick_source());
    assert_eq!(notices.last().unwrap().kind, NotificationKind::Success);

    let persisted = kv.get("pomodoro_sessions").unwrap().unwrap();
    assert!(persisted.contains("\"durationSeconds\":1500"));

    let extra = run_seconds(&mut session, &clock, 60, &mut SilentTone, &mut notices);
    assert!(extra.is_empty());
}

#[test]
fn pause_and_resume_do_not_double_count() {
    let kv = MemoryKeyValueStore::new();
    let clock = ManualClock::new(0);
    let mut notices = NotificationCenter::new();
    let mut session = FocusSession::open(&kv, &clock);

    session.start();
    run_seconds(&mut session, &clock, 100, &mut SilentTone, &mut notices);
    assert!(session.pause());
    let at_pause = session.timer().remaining_secs();
    assert_eq!(at_pause, 1_400);

    clock.advance_secs(600);
    session.poll(&mut SilentTone, &mut notices);
    assert_eq!(session.timer().remaining_secs(), at_pause);
    assert_eq!(session.timer().controls().start_label, "Resume");

    assert_eq!(session.start(), StartOutcome::Resumed);
    assert_eq!(session.timer().remaining_secs(), at_pause);

    let logged = run_seconds(&mut session, &clock, 1_400, &mut SilentTone, &mut notices);
    assert_eq!(logged.len(), 1);
}

#[test]
fn second_start_does_not_add_a_tick_source() {
    let kv = MemoryKeyValueStore::new();
    let clock = ManualClock::new(0);
    let mut notices = NotificationCenter::new();
    let mut session = FocusSession::open(&kv, &clock);

    session.start();
    clock.advance_ms(500);
    assert_eq!(session.start(), StartOutcome::Ignored);

    run_seconds(&mut session, &clock, 10, &mut SilentTone, &mut notices);
    assert_eq!(session.timer().remaining_secs(), 1_490);
}

#[test]
fn tone_failure_is_swallowed() {
    let kv = MemoryKeyValueStore::new();
    let clock = ManualClock::new(0);
    let mut notices = NotificationCenter::new();
    let mut speaker = BrokenSpeaker { attempts: 0 };
    let mut session = FocusSession::open(&kv, &clock);

    session.start();
    let logged = run_seconds(&mut session, &clock, 1_500, &mut speaker, &mut notices);

    assert_eq!(speaker.attempts, 1);
    assert_eq!(logged.len(), 1);
    assert!(notices
        .visible(clock.now_ms())
        .iter()
        .all(|notice| notice.kind == NotificationKind::Success));
}

#[test]
fn reset_mid_interval_logs_nothing() {
    let kv = MemoryKeyValueStore::new();
    let clock = ManualClock::new(0);
    let mut notices = NotificationCenter::new();
    let mut session = FocusSession::open(&kv, &clock);

    session.start();
    run_seconds(&mut session, &clock, 700, &mut SilentTone, &mut notices);
    session.reset();
    let logged = run_seconds(&mut session, &clock, 1_500, &mut SilentTone, &mut notices);

    assert!(logged.is_empty());
    assert_eq!(session.timer().readout(), "25:00");
    assert!(session.sessions().is_empty());
}
