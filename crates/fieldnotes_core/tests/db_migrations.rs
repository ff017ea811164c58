use fieldnotes_core::storage::schema::{recorded_version, LATEST_SCHEMA_VERSION};
use fieldnotes_core::{
    open_db, open_db_in_memory, KeyValueStore, SqliteKeyValueStore, StorageError,
};
use rusqlite::Connection;

#[test]
fn open_db_in_memory_applies_all_migrations() {
    let conn = open_db_in_memory().unwrap();

    assert_eq!(recorded_version(&conn).unwrap(), LATEST_SCHEMA_VERSION);
    assert_table_exists(&conn, "kv_entries");
    assert_table_exists(&conn, "seeded_collections");
}

#[test]
fn reopening_file_keeps_values_and_schema() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fieldnotes.sqlite3");

    {
        let conn = open_db(&path).unwrap();
        let kv = SqliteKeyValueStore::new(&conn);
        kv.set("phd_bio", "PhD student in applied math").unwrap();
        kv.mark_seeded("papers").unwrap();
    }

    let conn = open_db(&path).unwrap();
    assert_eq!(recorded_version(&conn).unwrap(), LATEST_SCHEMA_VERSION);
    let kv = SqliteKeyValueStore::new(&conn);
    assert_eq!(
        kv.get("phd_bio").unwrap().as_deref(),
        Some("PhD student in applied math")
    );
    assert!(kv.is_seeded("papers").unwrap());
    assert!(!kv.is_seeded("skills").unwrap());
}

#[test]
fn opening_database_with_newer_schema_version_returns_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = open_db(&path).unwrap_err();
    match err {
        StorageError::SchemaTooNew { found, supported } => {
            assert_eq!(found, 999);
            assert_eq!(supported, LATEST_SCHEMA_VERSION);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn version_one_file_gains_seed_flags_and_keeps_values() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("old.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch(
        "CREATE TABLE kv_entries (
            key TEXT PRIMARY KEY NOT NULL,
            value TEXT NOT NULL,
            updated_at INTEGER NOT NULL DEFAULT 0
        );
        INSERT INTO kv_entries (key, value) VALUES ('phd_bio', 'kept');
        PRAGMA user_version = 1;",
    )
    .unwrap();
    drop(conn);

    let conn = open_db(&path).unwrap();
    assert_eq!(recorded_version(&conn).unwrap(), LATEST_SCHEMA_VERSION);
    assert_table_exists(&conn, "seeded_collections");
    let kv = SqliteKeyValueStore::new(&conn);
    assert_eq!(kv.get("phd_bio").unwrap().as_deref(), Some("kept"));
    assert!(!kv.is_seeded("phd_bio").unwrap());
}

#[test]
fn sqlite_quota_rejects_oversized_write_and_keeps_prior_value() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn).with_quota(Some(64));

    kv.set("papers", "[]").unwrap();
    let err = kv.set("papers", &"x".repeat(128)).unwrap_err();
    assert!(err.to_string().contains("quota"));
    assert_eq!(kv.get("papers").unwrap().as_deref(), Some("[]"));
}

#[test]
fn removing_a_key_leaves_other_keys_and_seeded_flags() {
    let conn = open_db_in_memory().unwrap();
    let kv = SqliteKeyValueStore::new(&conn);
    kv.set("papers", "[]").unwrap();
    kv.set("skills", "[]").unwrap();
    kv.mark_seeded("papers").unwrap();

    kv.remove("papers").unwrap();

    assert!(kv.get("papers").unwrap().is_none());
    assert_eq!(kv.get("skills").unwrap().as_deref(), Some("[]"));
    assert!(kv.is_seeded("papers").unwrap());
}

fn assert_table_exists(conn: &Connection, table_name: &str) {
    let exists: i64 = conn
        .query_row(
            "SELECT EXISTS(
                SELECT 1
                FROM sqlite_master
                WHERE type = 'table' AND name = ?1
            );",
            [table_name],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(exists, 1, "table {table_name} does not exist");
}
