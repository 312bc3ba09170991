use homehub_core::db::migrations::{apply_migrations, latest_version};
use homehub_core::db::{initialize, initialize_in_memory, DbError, InitializationError};
use homehub_core::{RecordRepository, SqliteRecordRepository, Store};
use rusqlite::Connection;

const COLLECTION_TABLES: [&str; 5] = [
    "tasks",
    "stores",
    "shopping_lists",
    "family_members",
    "journal_entries",
];

#[test]
fn initialize_in_memory_creates_every_collection() {
    let conn = initialize_in_memory().unwrap();

    assert_eq!(schema_version(&conn), latest_version());
    for table in COLLECTION_TABLES {
        assert_table_exists(&conn, table);
    }
}

#[test]
fn reopening_same_database_is_idempotent_and_keeps_records() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("homehub.sqlite3");

    let conn_first = initialize(&path).unwrap();
    assert_eq!(schema_version(&conn_first), latest_version());
    SqliteRecordRepository::try_new(&conn_first)
        .unwrap()
        .add(&Store::new("Market"))
        .unwrap();
    drop(conn_first);

    let mut conn_second = initialize(&path).unwrap();
    assert_eq!(schema_version(&conn_second), latest_version());
    assert_eq!(apply_migrations(&mut conn_second).unwrap(), 0);

    let stores = SqliteRecordRepository::try_new(&conn_second)
        .unwrap()
        .get_all::<Store>()
        .unwrap();
    assert_eq!(stores.len(), 1);
    assert_eq!(stores[0].name, "Market");
}

#[test]
fn fresh_connection_applies_each_migration_once() {
    let mut conn = Connection::open_in_memory().unwrap();

    assert_eq!(
        apply_migrations(&mut conn).unwrap(),
        latest_version() as usize
    );
    assert_eq!(apply_migrations(&mut conn).unwrap(), 0);
}

#[test]
fn opening_database_with_newer_schema_version_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("future.sqlite3");

    let conn = Connection::open(&path).unwrap();
    conn.execute_batch("PRAGMA user_version = 999;").unwrap();
    drop(conn);

    let err = initialize(&path).unwrap_err();
    match err {
        InitializationError::Bootstrap(DbError::UnsupportedSchemaVersion {
            db_version,
            latest_supported,
        }) => {
            assert_eq!(db_version, 999);
            assert_eq!(latest_supported, latest_version());
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn unopenable_path_reports_open_failure() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing-dir").join("homehub.sqlite3");

    let err = initialize(&path).unwrap_err();
    assert!(matches!(err, InitializationError::Open(DbError::Sqlite(_))));
}

fn schema_version(conn: &Connection) -> u32 {
    conn.query_row("PRAGMA user_version;", [], |row| row.get(0))
        .unwrap()
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
