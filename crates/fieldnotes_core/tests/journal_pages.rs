use chrono::NaiveDate;
use fieldnotes_core::render::CountingHook;
use fieldnotes_core::timer::SilentTone;
use fieldnotes_core::{
    open_db, Clock, CollectingSink, FieldEdit, Journal, KeyValueStore, ManualClock,
    MemoryKeyValueStore, NotificationKind, Page, Paper, ProgressEntry, ResearchEntry,
    SqliteKeyValueStore,
};
use std::cell::RefCell;
use std::rc::Rc;

fn clock() -> ManualClock {
    ManualClock::at_date(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap())
}

fn paper(title: &str, link: &str) -> Paper {
    Paper {
        id: 0,
        title: title.to_string(),
        external_link: link.to_string(),
        date_added: 0,
    }
}

#[test]
fn page_seeding_survives_reopening_the_database() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fieldnotes.sqlite3");
    let clock = clock();

    {
        let conn = open_db(&path).unwrap();
        let kv = SqliteKeyValueStore::new(&conn);
        let mut journal = Journal::open(&kv, &clock);
        let seeded = journal.initialize_page(Page::Home);
        assert_eq!(seeded, vec!["phd_courses", "phd_insights", "phd_reads"]);
        assert_eq!(journal.courses.records()[0].title, "Course 1");
        assert_eq!(
            journal.reads.current().unwrap().title,
            "Welcome to 2 Min Reads"
        );
    }

    let conn = open_db(&path).unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    let mut journal = Journal::open(&kv, &clock);
    assert!(journal.initialize_page(Page::Home).is_empty());
    assert_eq!(journal.courses.records().len(), 1);
    assert_eq!(journal.reads.reads().len(), 1);
}

#[test]
fn pages_only_seed_their_own_collections() {
    let kv = MemoryKeyValueStore::new();
    let clock = clock();
    let mut journal = Journal::open(&kv, &clock);

    let seeded = journal.initialize_page(Page::Library);

    assert_eq!(seeded, vec!["papers", "skills"]);
    assert!(kv.get("research_entries").unwrap().is_none());
    assert!(journal.research.records().is_empty());
    assert_eq!(journal.mental_models.records().len(), 0);
}

#[test]
fn emptied_collection_is_not_reseeded() {
    let kv = MemoryKeyValueStore::new();
    let clock = clock();
    let mut journal = Journal::open(&kv, &clock);
    journal.initialize_page(Page::Research);
    let ids: Vec<i64> = journal.mental_models.records().iter().map(|m| m.id).collect();
    assert_eq!(ids.len(), 2);

    for id in ids {
        assert!(journal
            .mental_models
            .delete(id, &mut |_: &str| true, &mut journal.notices));
    }

    let mut reopened = Journal::open(&kv, &clock);
    assert!(reopened.initialize_page(Page::Research).is_empty());
    assert!(reopened.mental_models.records().is_empty());
    assert_eq!(reopened.research.records().len(), 1);
}

#[test]
fn missing_required_field_notifies_and_creates_nothing() {
    let kv = MemoryKeyValueStore::new();
    let clock = clock();
    let mut journal = Journal::open(&kv, &clock);

    let outcome = journal
        .papers
        .submit(paper("Some paper", "  "), &mut journal.notices);

    assert!(outcome.is_none());
    assert!(journal.papers.records().is_empty());
    let notice = journal.notices.last().unwrap();
    assert_eq!(notice.kind, NotificationKind::Error);
    assert_eq!(notice.message, "Please fill in the externalLink field.");
}

#[test]
fn quota_exceeded_notifies_and_keeps_state() {
    let kv = MemoryKeyValueStore::with_quota(64);
    let clock = clock();
    let mut journal = Journal::open(&kv, &clock);

    let outcome = journal.papers.submit(
        paper("Deep Residual Learning", "https://arxiv.org/abs/1512.03385"),
        &mut journal.notices,
    );

    assert!(outcome.is_none());
    assert!(journal.papers.records().is_empty());
    assert!(kv.get("papers").unwrap().is_none());
    let notice = journal.notices.last().unwrap();
    assert_eq!(notice.kind, NotificationKind::Error);
    assert!(notice.message.starts_with("Could not save changes"));
}

#[test]
fn debounced_edit_persists_after_quiet_period() {
    let kv = MemoryKeyValueStore::new();
    let clock = clock();
    let mut journal = Journal::open(&kv, &clock);
    let id = journal
        .research
        .submit(ResearchEntry::new("Kalman filters"), &mut journal.notices)
        .unwrap();

    journal
        .research
        .input(FieldEdit::new(id, "firstPrinciples", "Bayes"));
    clock.advance_ms(600);
    journal
        .research
        .input(FieldEdit::new(id, "firstPrinciples", "Bayes rule, linear"));

    clock.advance_ms(999);
    journal.poll(&mut SilentTone);
    assert_eq!(journal.research.pending_edits(), 1);
    assert!(!kv.get("research_entries").unwrap().unwrap().contains("linear"));

    clock.advance_ms(1);
    journal.poll(&mut SilentTone);
    assert_eq!(journal.research.pending_edits(), 0);
    assert_eq!(
        journal.research.records()[0].first_principles,
        "Bayes rule, linear"
    );
    assert!(kv.get("research_entries").unwrap().unwrap().contains("linear"));
}

#[test]
fn blur_persists_immediately_and_bad_value_rolls_back() {
    let kv = MemoryKeyValueStore::new();
    let clock = clock();
    let mut journal = Journal::open(&kv, &clock);
    let id = journal
        .progress
        .submit(
            ProgressEntry::new(NaiveDate::from_ymd_opt(2024, 3, 11).unwrap(), 6),
            &mut journal.notices,
        )
        .unwrap();

    journal
        .progress
        .input(FieldEdit::new(id, "milestones", "Chapter two"));
    assert!(journal
        .progress
        .blur(id, "milestones", &mut journal.notices));
    assert_eq!(journal.progress.records()[0].milestones, "Chapter two");

    journal
        .progress
        .input(FieldEdit::new(id, "concentrationScore", "eleven"));
    assert!(!journal
        .progress
        .blur(id, "concentrationScore", &mut journal.notices));
    assert_eq!(journal.progress.records()[0].concentration_score, 6);
    assert_eq!(
        journal.notices.last().unwrap().kind,
        NotificationKind::Error
    );
}

#[test]
fn attached_sink_rerenders_after_every_mutation() {
    let kv = MemoryKeyValueStore::new();
    let clock = clock();
    let mut journal = Journal::open(&kv, &clock);
    let sink = Rc::new(RefCell::new(CollectingSink::<Paper>::default()));
    let hook = CountingHook::default();
    let calls = Rc::clone(&hook.calls);

    journal
        .papers
        .attach(Box::new(Rc::clone(&sink)), Some(Box::new(hook)));
    assert_eq!(sink.borrow().clear_count, 1);
    assert_eq!(*calls.borrow(), 1);

    journal.initialize_page(Page::Library);
    assert_eq!(sink.borrow().fragments.len(), 1);

    let id = journal
        .papers
        .submit(paper("ResNet v2", "https://arxiv.org/abs/1603.05027"), &mut journal.notices)
        .unwrap();
    assert_eq!(sink.borrow().fragments.len(), 2);

    journal
        .papers
        .delete(id, &mut |_: &str| true, &mut journal.notices);
    assert_eq!(sink.borrow().fragments.len(), 1);
    assert_eq!(*calls.borrow(), 4);
}

#[test]
fn search_renders_filtered_view_only() {
    let kv = MemoryKeyValueStore::new();
    let clock = clock();
    let mut journal = Journal::open(&kv, &clock);
    let sink = Rc::new(RefCell::new(CollectingSink::<ResearchEntry>::default()));
    journal.research.attach(Box::new(Rc::clone(&sink)), None);
    journal.initialize_page(Page::Research);
    journal
        .research
        .submit(ResearchEntry::new("Kalman filters"), &mut journal.notices);

    let view = journal.research.search("KALMAN");

    assert_eq!(view.len(), 1);
    assert_eq!(sink.borrow().fragments.len(), 1);
    assert_eq!(journal.research.records().len(), 2);
}

#[test]
fn notifications_expire_after_three_seconds() {
    let kv = MemoryKeyValueStore::new();
    let clock = clock();
    let mut journal = Journal::open(&kv, &clock);
    journal
        .papers
        .submit(paper("A", "https://example.org/a"), &mut journal.notices);
    clock.advance_ms(2_000);
    journal
        .papers
        .submit(paper("B", "https://example.org/b"), &mut journal.notices);

    clock.advance_ms(1_000);
    journal.poll(&mut SilentTone);
    assert_eq!(journal.notices.len(), 1);

    clock.advance_ms(2_000);
    journal.poll(&mut SilentTone);
    assert!(journal.notices.is_empty());
}

#[test]
fn bio_is_saved_after_typing_stops() {
    let kv = MemoryKeyValueStore::new();
    let clock = clock();
    let mut journal = Journal::open(&kv, &clock);
    journal.set_edit_mode(true);
    assert!(journal.bio.load().is_none());

    journal.bio.input("PhD student", 0);
    journal.bio.input("PhD student in optimization", 500);
    assert!(!journal.bio.poll(1_499).unwrap());
    assert!(journal.bio.poll(1_500).unwrap());
    assert_eq!(
        journal.bio.load().as_deref(),
        Some("PhD student in optimization")
    );

    assert!(journal.save_bio("Postdoc"));
    assert_eq!(kv.get("phd_bio").unwrap().as_deref(), Some("Postdoc"));
}

#[test]
fn edit_mode_starts_off_and_gates_home_regions() {
    let kv = MemoryKeyValueStore::new();
    let clock = clock();
    let mut journal = Journal::open(&kv, &clock);
    journal.initialize_page(Page::Home);
    let course = journal.courses.records()[0].id;
    let read = journal.reads.reads()[0].id;
    assert!(!journal.edit_mode());

    assert!(!journal
        .courses
        .input(FieldEdit::new(course, "title", "Convex Optimization")));
    assert!(!journal.reads.input(FieldEdit::new(read, "title", "Changed")));
    assert!(!journal.bio.input("Hello", clock.now_ms()));
    assert!(!journal.save_bio("Hello"));
    assert!(!journal
        .courses
        .delete(course, &mut |_: &str| true, &mut journal.notices));
    assert_eq!(journal.courses.records().len(), 1);
    assert_eq!(
        journal.notices.last().unwrap().message,
        "Turn on edit mode to change this."
    );
    assert!(kv.get("phd_bio").unwrap().is_none());

    assert!(journal.toggle_edit_mode());
    assert!(journal
        .courses
        .input(FieldEdit::new(course, "title", "Convex Optimization")));
    assert!(journal.courses.blur(course, "title", &mut journal.notices));
    assert_eq!(journal.courses.records()[0].title, "Convex Optimization");
    assert!(journal
        .courses
        .delete(course, &mut |_: &str| true, &mut journal.notices));
    assert!(journal.courses.records().is_empty());

    assert!(!journal.toggle_edit_mode());
    assert!(!journal.insights.is_editable());
}

#[test]
fn edit_mode_leaves_other_pages_editable() {
    let kv = MemoryKeyValueStore::new();
    let clock = clock();
    let mut journal = Journal::open(&kv, &clock);
    journal.initialize_page(Page::Research);
    let id = journal.research.records()[0].id;

    assert!(!journal.edit_mode());
    assert!(journal
        .research
        .input(FieldEdit::new(id, "firstPrinciples", "Priors")));
    assert!(journal
        .research
        .blur(id, "firstPrinciples", &mut journal.notices));
}

#[test]
fn read_edits_flush_through_journal_poll() {
    let kv = MemoryKeyValueStore::new();
    let clock = clock();
    let mut journal = Journal::open(&kv, &clock);
    journal.initialize_page(Page::Home);
    journal.set_edit_mode(true);
    let id = journal.reads.reads()[0].id;

    journal
        .reads
        .input(FieldEdit::new(id, "content", "Two minutes on duality"));
    clock.advance_ms(1_000);
    journal.poll(&mut SilentTone);

    assert_eq!(journal.reads.pending_edits(), 0);
    assert!(kv
        .get("phd_reads")
        .unwrap()
        .unwrap()
        .contains("Two minutes on duality"));
}

#[test]
fn focus_session_completes_through_journal_poll() {
    let kv = MemoryKeyValueStore::new();
    let clock = clock();
    let mut journal = Journal::open(&kv, &clock);
    journal.focus.start();

    let mut logged = Vec::new();
    for _ in 0..1_500 {
        clock.advance_secs(1);
        logged.extend(journal.poll(&mut SilentTone));
    }

    assert_eq!(logged.len(), 1);
    assert_eq!(journal.focus.sessions().len(), 1);
    assert_eq!(
        journal.notices.last().unwrap().message,
        "Focus session complete! Time for a short break."
    );
}

#[test]
fn journal_statistics_and_export_use_the_clock_date() {
    let dir = tempfile::tempdir().unwrap();
    let kv = MemoryKeyValueStore::new();
    let clock = clock();
    let mut journal = Journal::open(&kv, &clock);
    journal.initialize_page(Page::Progress);

    let stats = journal.concentration_stats();
    assert_eq!(stats.today_minutes, 50);
    assert_eq!(stats.average_score, Some(8.0));
    assert_eq!(journal.progress_series().labels, vec!["Mar 11"]);

    let path = journal.export_progress(dir.path()).unwrap();
    assert!(path.ends_with("progress-export-2024-03-11.json"));
    assert_eq!(
        journal.notices.last().unwrap().kind,
        NotificationKind::Success
    );
}
