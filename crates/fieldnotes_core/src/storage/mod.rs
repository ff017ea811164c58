//! Local key→string persistence medium.
//!
//! # Responsibility
//! - Open the SQLite journal file and keep its schema current.
//! - Define the synchronous key-value contract every collection persists through.
//! - Track the one-time "seeded" flag per collection key.
//!
//! # Invariants
//! - A failed `set` leaves the previously stored value untouched.
//! - Quota checks count UTF-8 bytes of keys and values.

use std::error::Error;
use std::fmt::{Display, Formatter};

pub mod kv_store;
mod open;
pub mod schema;

pub use kv_store::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore};
pub use open::{open_db, open_db_in_memory};
pub use schema::LATEST_SCHEMA_VERSION;

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure opening the journal file or reading and writing a key.
#[derive(Debug)]
pub enum StorageError {
    Sqlite(rusqlite::Error),
    /// The file was written by a newer build.
    SchemaTooNew { found: u32, supported: u32 },
    /// Write rejected because it would grow the store past its byte quota.
    QuotaExceeded {
        key: String,
        required_bytes: u64,
        quota_bytes: u64,
    },
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sqlite(err) => write!(f, "{err}"),
            Self::SchemaTooNew { found, supported } => write!(
                f,
                "journal schema version {found} is newer than supported {supported}"
            ),
            Self::QuotaExceeded {
                key,
                required_bytes,
                quota_bytes,
            } => write!(
                f,
                "storage quota exceeded writing `{key}`: {required_bytes} bytes needed, quota is {quota_bytes}"
            ),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Sqlite(err) => Some(err),
            Self::SchemaTooNew { .. } | Self::QuotaExceeded { .. } => None,
        }
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Sqlite(value)
    }
}
