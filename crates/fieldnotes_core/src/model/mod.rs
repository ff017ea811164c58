//! Journal domain model.
//!
//! # Responsibility
//! - Define every persisted record type and its collection key.
//! - Provide presence checks and field-level edit application.
//!
//! # Invariants
//! - Records are flat; no record references another collection.
//! - `id` is unique within its collection (enforced by the record store).

pub mod library;
pub mod progress;
pub mod record;
pub mod research;

pub use library::{Course, Insight, Paper, Read, Skill};
pub use progress::{ConcentrationSession, PomodoroSession, ProgressEntry};
pub use record::{EditableRecord, Record, RecordId, Searchable, ValidationError};
pub use research::{
    confidence_stars, parse_layers, parse_tags, MentalModel, ResearchEntry,
};
