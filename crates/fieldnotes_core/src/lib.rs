//! Core domain logic for the fieldnotes research journal.
//! This crate owns every persisted collection, the focus timer and the
//! carousel; front ends only render and forward user actions.

pub mod carousel;
pub mod clock;
pub mod config;
pub mod export;
pub mod logging;
pub mod model;
pub mod notify;
pub mod render;
pub mod seeds;
pub mod service;
pub mod stats;
pub mod storage;
pub mod store;
pub mod timer;

pub use carousel::{Carousel, DWELL_MS};
pub use clock::{Clock, ManualClock, SystemClock};
pub use config::JournalConfig;
pub use export::{export_progress, write_progress_export, ExportError};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::{
    ConcentrationSession, Course, EditableRecord, Insight, MentalModel, Paper, PomodoroSession,
    ProgressEntry, Read, Record, RecordId, ResearchEntry, Searchable, Skill, ValidationError,
};
pub use notify::{Notification, NotificationCenter, NotificationKind};
pub use render::{ChartSink, CollectingSink, NoopHook, PostRenderHook, RenderSink};
pub use service::collection_service::CollectionService;
pub use service::journal::{Journal, Page};
pub use stats::{
    concentration_stats, parse_duration_minutes, progress_chart_series, ChartSeries,
    ConcentrationStats,
};
pub use storage::{
    open_db, open_db_in_memory, KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore,
    StorageError, StorageResult,
};
pub use store::debounce::{EditDebouncer, FieldEdit};
pub use store::record_store::RecordStore;
pub use store::text_field::TextField;
pub use store::{Confirm, StoreError, StoreResult};
pub use timer::{FocusSession, FocusTimer, TimerState, TonePlayer};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
