//! Focus timer coordinator: completion tone, session log and notification.

use crate::clock::Clock;
use crate::model::{PomodoroSession, RecordId};
use crate::notify::NotificationCenter;
use crate::storage::KeyValueStore;
use crate::store::record_store::RecordStore;
use crate::timer::pomodoro::{FocusTimer, StartOutcome, TickOutcome, FOCUS_BUDGET_SECS};
use log::{debug, info, warn};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Audio failure; always swallowed by the coordinator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToneError(pub String);

impl Display for ToneError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "tone unavailable: {}", self.0)
    }
}

impl Error for ToneError {}

/// Best-effort short completion tone.
pub trait TonePlayer {
    fn play(&mut self) -> Result<(), ToneError>;
}

#[derive(Debug, Default, Clone, Copy)]
pub struct SilentTone;

impl TonePlayer for SilentTone {
    fn play(&mut self) -> Result<(), ToneError> {
        Ok(())
    }
}

/// Owns one timer and the Pomodoro session log it appends to.
pub struct FocusSession<'s> {
    timer: FocusTimer,
    sessions: RecordStore<'s, PomodoroSession>,
    clock: &'s dyn Clock,
}

impl<'s> FocusSession<'s> {
    pub fn open(kv: &'s dyn KeyValueStore, clock: &'s dyn Clock) -> Self {
        Self {
            timer: FocusTimer::new(),
            sessions: RecordStore::open(kv, clock),
            clock,
        }
    }

    pub fn timer(&self) -> &FocusTimer {
        &self.timer
    }

    pub fn sessions(&self) -> &[PomodoroSession] {
        self.sessions.records()
    }

    pub fn start(&mut self) -> StartOutcome {
        let outcome = self.timer.start(self.clock.now_ms());
        debug!("event=focus_start module=timer status=ok outcome={outcome:?}");
        outcome
    }

    pub fn pause(&mut self) -> bool {
        self.timer.pause()
    }

    pub fn reset(&mut self) {
        self.timer.reset();
    }

    /// Fires due ticks; on completion logs the session and returns its id.
    pub fn poll(
        &mut self,
        tone: &mut dyn TonePlayer,
        notices: &mut NotificationCenter,
    ) -> Option<RecordId> {
        let now_ms = self.clock.now_ms();
        if self.timer.poll(now_ms) != TickOutcome::Completed {
            return None;
        }
        self.complete(now_ms, tone, notices)
    }

    fn complete(
        &mut self,
        now_ms: i64,
        tone: &mut dyn TonePlayer,
        notices: &mut NotificationCenter,
    ) -> Option<RecordId> {
        if let Err(err) = tone.play() {
            debug!("event=focus_tone module=timer status=skipped error={err}");
        }

        let session = PomodoroSession {
            id: 0,
            date: now_ms,
            duration_seconds: FOCUS_BUDGET_SECS,
            completed: true,
        };
        let logged = match self.sessions.add(session) {
            Ok(id) => {
                info!(
                    "event=focus_complete module=timer status=ok session_id={} duration_seconds={}",
                    id, FOCUS_BUDGET_SECS
                );
                notices.success("Focus session complete! Time for a short break.", now_ms);
                Some(id)
            }
            Err(err) => {
                warn!("event=focus_complete module=timer status=error error={err}");
                notices.error(format!("Could not save focus session: {err}"), now_ms);
                None
            }
        };

        self.timer.finish();
        logged
    }
}
