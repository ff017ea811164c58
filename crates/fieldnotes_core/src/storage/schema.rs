//! Journal database schema.
//!
//! Each step in `SCHEMA_STEPS` raises `PRAGMA user_version` by one. Pending
//! steps run in one transaction, so a half-upgraded file never exists.

use super::{StorageError, StorageResult};
use log::info;
use rusqlite::Connection;

const SCHEMA_STEPS: &[&str] = &[
    include_str!("schema/0001_kv_entries.sql"),
    include_str!("schema/0002_seed_flags.sql"),
];

/// Schema version written by this build.
pub const LATEST_SCHEMA_VERSION: u32 = SCHEMA_STEPS.len() as u32;

/// Version currently recorded in the database file.
pub fn recorded_version(conn: &Connection) -> StorageResult<u32> {
    let version = conn.pragma_query_value(None, "user_version", |row| row.get::<_, u32>(0))?;
    Ok(version)
}

/// Brings the journal schema up to `LATEST_SCHEMA_VERSION`.
pub(crate) fn upgrade(conn: &mut Connection) -> StorageResult<()> {
    let found = recorded_version(conn)?;
    if found > LATEST_SCHEMA_VERSION {
        return Err(StorageError::SchemaTooNew {
            found,
            supported: LATEST_SCHEMA_VERSION,
        });
    }

    let pending = &SCHEMA_STEPS[found as usize..];
    if pending.is_empty() {
        return Ok(());
    }

    let tx = conn.transaction()?;
    for step in pending {
        tx.execute_batch(step)?;
    }
    tx.pragma_update(None, "user_version", LATEST_SCHEMA_VERSION)?;
    tx.commit()?;

    info!(
        "event=schema_upgrade module=storage status=ok from={} to={} steps={}",
        found,
        LATEST_SCHEMA_VERSION,
        pending.len()
    );
    Ok(())
}
