//! Page-level journal facade.
//!
//! # Responsibility
//! - Own one instance of every collection, the carousel, the focus timer and
//!   the notification surface.
//! - Initialize a page: hydrate its stores and seed sample data once.
//! - Drive every deadline (ticks, dwell, debounced edits) from one `poll`.
//! - Own edit mode, which locks the home page regions (bio, courses,
//!   insights, reads) while off.
//!
//! # Invariants
//! - Seeding happens at most once per collection key, across page loads.
//! - Nothing in this facade is fatal; failures become notifications.
//! - Edit mode starts off on every open.

use crate::carousel::Carousel;
use crate::clock::Clock;
use crate::export::{write_progress_export, ExportError};
use crate::model::{
    ConcentrationSession, Course, Insight, MentalModel, Paper, ProgressEntry, Read, Record,
    RecordId, ResearchEntry, Skill,
};
use crate::notify::NotificationCenter;
use crate::seeds;
use crate::service::collection_service::{CollectionService, EDIT_MODE_OFF_MESSAGE};
use crate::stats::{concentration_stats, progress_chart_series, ChartSeries, ConcentrationStats};
use crate::storage::KeyValueStore;
use crate::store::text_field::{TextField, BIO_KEY};
use crate::store::StoreResult;
use crate::timer::{FocusSession, TonePlayer};
use log::{info, warn};
use std::path::{Path, PathBuf};

/// Pages of the journal; each owns a fixed set of collections.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Home,
    Research,
    Progress,
    Library,
}

impl Page {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Home => "home",
            Self::Research => "research",
            Self::Progress => "progress",
            Self::Library => "library",
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "home" => Some(Self::Home),
            "research" => Some(Self::Research),
            "progress" => Some(Self::Progress),
            "library" => Some(Self::Library),
            _ => None,
        }
    }
}

/// Every stateful component of the journal, bound to one store and clock.
pub struct Journal<'s> {
    clock: &'s dyn Clock,
    edit_mode: bool,
    pub notices: NotificationCenter,
    pub research: CollectionService<'s, ResearchEntry>,
    pub mental_models: CollectionService<'s, MentalModel>,
    pub progress: CollectionService<'s, ProgressEntry>,
    pub concentration: CollectionService<'s, ConcentrationSession>,
    pub papers: CollectionService<'s, Paper>,
    pub skills: CollectionService<'s, Skill>,
    pub courses: CollectionService<'s, Course>,
    pub insights: CollectionService<'s, Insight>,
    pub reads: Carousel<'s>,
    pub focus: FocusSession<'s>,
    pub bio: TextField<'s>,
}

impl<'s> Journal<'s> {
    /// Hydrates every collection from `kv`.
    pub fn open(kv: &'s dyn KeyValueStore, clock: &'s dyn Clock) -> Self {
        let mut journal = Self {
            clock,
            edit_mode: false,
            notices: NotificationCenter::new(),
            research: CollectionService::open(kv, clock),
            mental_models: CollectionService::open(kv, clock),
            progress: CollectionService::open(kv, clock),
            concentration: CollectionService::open(kv, clock),
            papers: CollectionService::open(kv, clock),
            skills: CollectionService::open(kv, clock),
            courses: CollectionService::open(kv, clock),
            insights: CollectionService::open(kv, clock),
            reads: Carousel::open(kv, clock),
            focus: FocusSession::open(kv, clock),
            bio: TextField::new(kv, BIO_KEY),
        };
        journal.lock_home_regions();
        journal
    }

    pub fn clock(&self) -> &'s dyn Clock {
        self.clock
    }

    pub fn edit_mode(&self) -> bool {
        self.edit_mode
    }

    pub fn set_edit_mode(&mut self, on: bool) {
        self.edit_mode = on;
        self.lock_home_regions();
        info!(
            "event=edit_mode module=service status=ok enabled={}",
            self.edit_mode
        );
    }

    /// Flips edit mode and returns the new state.
    pub fn toggle_edit_mode(&mut self) -> bool {
        self.set_edit_mode(!self.edit_mode);
        self.edit_mode
    }

    fn lock_home_regions(&mut self) {
        let editable = self.edit_mode;
        self.courses.set_editable(editable);
        self.insights.set_editable(editable);
        self.reads.set_editable(editable);
        self.bio.set_editable(editable);
    }

    /// One-time page setup: seeds the page's collections on first run.
    ///
    /// Returns the keys that were seeded by this call. Seeding failures are
    /// reported as notifications and the page continues with what loaded.
    pub fn initialize_page(&mut self, page: Page) -> Vec<&'static str> {
        let clock = self.clock;
        let outcomes: Vec<(&'static str, StoreResult<bool>)> = match page {
            Page::Home => vec![
                (
                    Course::COLLECTION_KEY,
                    self.courses.seed(seeds::courses(clock)),
                ),
                (
                    Insight::COLLECTION_KEY,
                    self.insights.seed(seeds::insights(clock)),
                ),
                (
                    Read::COLLECTION_KEY,
                    self.reads.seed_if_empty(seeds::reads(clock)),
                ),
            ],
            Page::Research => vec![
                (
                    ResearchEntry::COLLECTION_KEY,
                    self.research.seed(seeds::research_entries(clock)),
                ),
                (
                    MentalModel::COLLECTION_KEY,
                    self.mental_models.seed(seeds::mental_models(clock)),
                ),
            ],
            Page::Progress => vec![
                (
                    ProgressEntry::COLLECTION_KEY,
                    self.progress.seed(seeds::progress_entries(clock)),
                ),
                (
                    ConcentrationSession::COLLECTION_KEY,
                    self.concentration.seed(seeds::concentration_sessions(clock)),
                ),
            ],
            Page::Library => vec![
                (
                    Paper::COLLECTION_KEY,
                    self.papers.seed(seeds::papers(clock)),
                ),
                (
                    Skill::COLLECTION_KEY,
                    self.skills.seed(seeds::skills(clock)),
                ),
            ],
        };

        let now_ms = clock.now_ms();
        let mut seeded = Vec::new();
        for (key, outcome) in outcomes {
            match outcome {
                Ok(true) => seeded.push(key),
                Ok(false) => {}
                Err(err) => {
                    warn!(
                        "event=page_seed module=service status=error page={} key={} error={}",
                        page.as_str(),
                        key,
                        err
                    );
                    self.notices
                        .error(format!("Could not save sample data: {err}"), now_ms);
                }
            }
        }

        info!(
            "event=page_init module=service status=ok page={} seeded={}",
            page.as_str(),
            seeded.len()
        );
        seeded
    }

    /// Appends a read to the carousel and jumps to it.
    pub fn add_read(&mut self, read: Read) -> Option<RecordId> {
        self.reads.add(read, &mut self.notices)
    }

    /// Saves the bio now (explicit save or loss of focus). Refused outside edit mode.
    pub fn save_bio(&mut self, value: &str) -> bool {
        if !self.edit_mode {
            self.notices.info(EDIT_MODE_OFF_MESSAGE, self.clock.now_ms());
            return false;
        }
        match self.bio.save(value) {
            Ok(()) => true,
            Err(err) => {
                self.notices
                    .error(format!("Could not save bio: {err}"), self.clock.now_ms());
                false
            }
        }
    }

    /// Today's concentration summary.
    pub fn concentration_stats(&self) -> ConcentrationStats {
        concentration_stats(self.concentration.records(), self.clock.today())
    }

    /// Weekly concentration series for the chart sink.
    pub fn progress_series(&self) -> ChartSeries {
        progress_chart_series(self.progress.records())
    }

    /// Exports progress entries as a JSON file in `dir`.
    pub fn export_progress(&mut self, dir: &Path) -> Result<PathBuf, ExportError> {
        let outcome = write_progress_export(dir, self.progress.records(), self.clock.today());
        let now_ms = self.clock.now_ms();
        match &outcome {
            Ok(path) => self
                .notices
                .success(format!("Exported to {}", path.display()), now_ms),
            Err(err) => self.notices.error(format!("Export failed: {err}"), now_ms),
        }
        outcome
    }

    /// Fires every due deadline: focus ticks, carousel dwell and debounced edits.
    ///
    /// Returns the id of a Pomodoro session logged by this poll, if any.
    pub fn poll(&mut self, tone: &mut dyn TonePlayer) -> Option<RecordId> {
        let logged = self.focus.poll(tone, &mut self.notices);
        self.reads.poll();
        self.reads.flush_due(&mut self.notices);

        self.research.flush_due(&mut self.notices);
        self.mental_models.flush_due(&mut self.notices);
        self.progress.flush_due(&mut self.notices);
        self.skills.flush_due(&mut self.notices);
        self.courses.flush_due(&mut self.notices);
        self.insights.flush_due(&mut self.notices);

        if let Err(err) = self.bio.poll(self.clock.now_ms()) {
            self.notices
                .error(format!("Could not save bio: {err}"), self.clock.now_ms());
        }

        self.notices.prune(self.clock.now_ms());
        logged
    }
}
