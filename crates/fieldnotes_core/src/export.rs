//! One-way JSON export of progress entries.

use crate::model::ProgressEntry;
use chrono::NaiveDate;
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::{Path, PathBuf};

#[derive(Debug)]
pub enum ExportError {
    Serialize(serde_json::Error),
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl Display for ExportError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Serialize(err) => write!(f, "failed to serialize export: {err}"),
            Self::Io { path, source } => {
                write!(f, "failed to write export `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ExportError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Serialize(err) => Some(err),
            Self::Io { source, .. } => Some(source),
        }
    }
}

impl From<serde_json::Error> for ExportError {
    fn from(value: serde_json::Error) -> Self {
        Self::Serialize(value)
    }
}

/// Pretty JSON array with every entry, in persisted order.
pub fn export_progress(entries: &[ProgressEntry]) -> Result<String, ExportError> {
    Ok(serde_json::to_string_pretty(entries)?)
}

pub fn export_file_name(today: NaiveDate) -> String {
    format!("progress-export-{}.json", today.format("%Y-%m-%d"))
}

/// Writes the export into `dir` and returns the file path.
pub fn write_progress_export(
    dir: &Path,
    entries: &[ProgressEntry],
    today: NaiveDate,
) -> Result<PathBuf, ExportError> {
    let body = export_progress(entries)?;
    let path = dir.join(export_file_name(today));
    if let Err(source) = std::fs::write(&path, body) {
        error!(
            "event=progress_export module=export status=error path={} error={}",
            path.display(),
            source
        );
        return Err(ExportError::Io { path, source });
    }

    info!(
        "event=progress_export module=export status=ok path={} count={}",
        path.display(),
        entries.len()
    );
    Ok(path)
}
