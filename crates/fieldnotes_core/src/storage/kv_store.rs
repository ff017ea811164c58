//! Key-value store contract with SQLite and in-memory implementations.

use super::{StorageError, StorageResult};
use log::warn;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::{BTreeMap, BTreeSet};

/// Synchronous, origin-scoped key→string store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
    /// Whether sample data was ever written for `key`.
    fn is_seeded(&self, key: &str) -> StorageResult<bool>;
    fn mark_seeded(&self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn is_seeded(&self, key: &str) -> StorageResult<bool> {
        (**self).is_seeded(key)
    }

    fn mark_seeded(&self, key: &str) -> StorageResult<()> {
        (**self).mark_seeded(key)
    }
}

/// SQLite-backed store over the `kv_entries` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
    quota_bytes: Option<u64>,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a migrated connection without a quota.
    pub fn new(conn: &'conn Connection) -> Self {
        Self {
            conn,
            quota_bytes: None,
        }
    }

    /// Limits the total stored bytes (keys plus values).
    pub fn with_quota(mut self, quota_bytes: Option<u64>) -> Self {
        self.quota_bytes = quota_bytes;
        self
    }

    fn bytes_excluding(&self, key: &str) -> StorageResult<u64> {
        let used: i64 = self.conn.query_row(
            "SELECT COALESCE(SUM(LENGTH(CAST(key AS BLOB)) + LENGTH(CAST(value AS BLOB))), 0)
             FROM kv_entries
             WHERE key <> ?1;",
            [key],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(used).unwrap_or(0))
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(quota_bytes) = self.quota_bytes {
            let required_bytes = self.bytes_excluding(key)? + entry_bytes(key, value);
            if required_bytes > quota_bytes {
                warn!(
                    "event=kv_write module=storage status=error error_code=quota_exceeded key={} required_bytes={} quota_bytes={}",
                    key, required_bytes, quota_bytes
                );
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    required_bytes,
                    quota_bytes,
                });
            }
        }

        self.conn.execute(
            "INSERT INTO kv_entries (key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn is_seeded(&self, key: &str) -> StorageResult<bool> {
        let seeded: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM seeded_collections WHERE collection_key = ?1);",
            [key],
            |row| row.get(0),
        )?;
        Ok(seeded == 1)
    }

    fn mark_seeded(&self, key: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT OR IGNORE INTO seeded_collections (collection_key) VALUES (?1);",
            [key],
        )?;
        Ok(())
    }
}

/// In-process store used by tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<BTreeMap<String, String>>,
    seeded: RefCell<BTreeSet<String>>,
    quota_bytes: Option<u64>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_quota(quota_bytes: u64) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::default()
        }
    }

    /// Writes a raw value bypassing quota checks, e.g. to plant corrupt data.
    pub fn insert_raw(&self, key: &str, value: &str) {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        if let Some(quota_bytes) = self.quota_bytes {
            let others: u64 = self
                .entries
                .borrow()
                .iter()
                .filter(|(existing, _)| existing.as_str() != key)
                .map(|(existing, stored)| entry_bytes(existing, stored))
                .sum();
            let required_bytes = others + entry_bytes(key, value);
            if required_bytes > quota_bytes {
                return Err(StorageError::QuotaExceeded {
                    key: key.to_string(),
                    required_bytes,
                    quota_bytes,
                });
            }
        }
        self.insert_raw(key, value);
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn is_seeded(&self, key: &str) -> StorageResult<bool> {
        Ok(self.seeded.borrow().contains(key))
    }

    fn mark_seeded(&self, key: &str) -> StorageResult<()> {
        self.seeded.borrow_mut().insert(key.to_string());
        Ok(())
    }
}

fn entry_bytes(key: &str, value: &str) -> u64 {
    (key.len() + value.len()) as u64
}
