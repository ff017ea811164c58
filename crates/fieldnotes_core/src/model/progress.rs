//! Weekly progress, concentration sessions and the Pomodoro log.

use super::record::{
    parse_score, require, unknown_field, EditableRecord, Record, RecordId, ValidationError,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

pub const PROGRESS_ENTRIES_KEY: &str = "progress_entries";
pub const CONCENTRATION_SESSIONS_KEY: &str = "concentration_sessions";
pub const POMODORO_SESSIONS_KEY: &str = "pomodoro_sessions";

/// One week of self-reported progress.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProgressEntry {
    pub id: RecordId,
    pub week: NaiveDate,
    #[serde(default)]
    pub quick_wins: String,
    /// Nominally 1-10.
    pub concentration_score: u8,
    #[serde(default)]
    pub endorphins_log: String,
    #[serde(default)]
    pub milestones: String,
}

impl ProgressEntry {
    pub fn new(week: NaiveDate, concentration_score: u8) -> Self {
        Self {
            id: 0,
            week,
            quick_wins: String::new(),
            concentration_score,
            endorphins_log: String::new(),
            milestones: String::new(),
        }
    }
}

impl Record for ProgressEntry {
    const COLLECTION_KEY: &'static str = PROGRESS_ENTRIES_KEY;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn label(&self) -> &str {
        "weekly progress"
    }
}

impl EditableRecord for ProgressEntry {
    fn apply_edit(&mut self, field: &str, value: &str) -> Result<(), ValidationError> {
        match field {
            "quickWins" => self.quick_wins = value.to_string(),
            "concentrationScore" => {
                self.concentration_score = parse_score("concentrationScore", value)?
            }
            "endorphinsLog" => self.endorphins_log = value.to_string(),
            "milestones" => self.milestones = value.to_string(),
            other => return Err(unknown_field(PROGRESS_ENTRIES_KEY, other)),
        }
        Ok(())
    }
}

/// One deep-work session with a free-text duration such as `45 min`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConcentrationSession {
    pub id: RecordId,
    pub date: NaiveDate,
    pub duration: String,
    /// Nominally 1-10.
    pub score: u8,
    #[serde(default)]
    pub notes: String,
}

impl ConcentrationSession {
    pub fn new(date: NaiveDate, duration: impl Into<String>, score: u8) -> Self {
        Self {
            id: 0,
            date,
            duration: duration.into(),
            score,
            notes: String::new(),
        }
    }
}

impl Record for ConcentrationSession {
    const COLLECTION_KEY: &'static str = CONCENTRATION_SESSIONS_KEY;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn label(&self) -> &str {
        &self.duration
    }

    fn validate(&self) -> Result<(), ValidationError> {
        require(CONCENTRATION_SESSIONS_KEY, "duration", &self.duration)
    }
}

/// Append-only log entry for a completed focus interval.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PomodoroSession {
    pub id: RecordId,
    /// Completion time in epoch milliseconds.
    pub date: i64,
    pub duration_seconds: u32,
    pub completed: bool,
}

impl Record for PomodoroSession {
    const COLLECTION_KEY: &'static str = POMODORO_SESSIONS_KEY;

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn label(&self) -> &str {
        "pomodoro"
    }
}
