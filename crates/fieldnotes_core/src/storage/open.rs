//! Opening the journal database.
//!
//! # Invariants
//! - Returned connections carry the latest schema.
//! - Every open emits exactly one terminal `journal_db_open` event.

use super::schema::upgrade;
use super::{StorageError, StorageResult};
use log::{error, info};
use rusqlite::Connection;
use std::path::Path;
use std::time::{Duration, Instant};

const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// Opens (or creates) the journal file and upgrades its schema.
///
/// Parent directories are not created here; callers resolve the data
/// directory through `JournalConfig::ensure_data_dir`.
pub fn open_db(path: impl AsRef<Path>) -> StorageResult<Connection> {
    open_with("file", || Connection::open(path))
}

/// Throwaway journal database for tests and previews.
pub fn open_db_in_memory() -> StorageResult<Connection> {
    open_with("memory", Connection::open_in_memory)
}

fn open_with<F>(mode: &str, connect: F) -> StorageResult<Connection>
where
    F: FnOnce() -> rusqlite::Result<Connection>,
{
    let started_at = Instant::now();
    let outcome = connect()
        .map_err(StorageError::from)
        .and_then(|mut conn| {
            conn.busy_timeout(BUSY_TIMEOUT)?;
            upgrade(&mut conn)?;
            Ok(conn)
        });

    let elapsed_ms = started_at.elapsed().as_millis();
    match &outcome {
        Ok(_) => info!(
            "event=journal_db_open module=storage status=ok mode={mode} duration_ms={elapsed_ms}"
        ),
        Err(err) => error!(
            "event=journal_db_open module=storage status=error mode={mode} duration_ms={elapsed_ms} error={err}"
        ),
    }
    outcome
}
