use chrono::NaiveDate;
use homehub_core::db::initialize_in_memory;
use homehub_core::{
    AppState, Collection, ReadError, ReadResult, Record, RecordId, RecordRepository, ShoppingItem,
    SqliteRecordRepository, Store, Task, TaskType, WriteError, WriteResult,
};
use rusqlite::Connection;

/// Delegates to SQLite but fails reads or writes of one collection.
struct FailingRepository<'conn> {
    inner: SqliteRecordRepository<'conn>,
    fail_reads_of: Option<Collection>,
    fail_writes_of: Option<Collection>,
}

impl<'conn> FailingRepository<'conn> {
    fn new(conn: &'conn Connection) -> Self {
        Self {
            inner: SqliteRecordRepository::try_new(conn).unwrap(),
            fail_reads_of: None,
            fail_writes_of: None,
        }
    }

    fn write_guard<T: Record>(&self) -> WriteResult<()> {
        if self.fail_writes_of == Some(T::COLLECTION) {
            return Err(WriteError::InvalidRecord {
                collection: T::COLLECTION,
                message: "forced failure".to_string(),
            });
        }
        Ok(())
    }

    fn read_guard<T: Record>(&self) -> ReadResult<()> {
        if self.fail_reads_of == Some(T::COLLECTION) {
            return Err(ReadError::InvalidData {
                collection: T::COLLECTION,
                id: 0,
                message: "forced failure".to_string(),
            });
        }
        Ok(())
    }
}

impl RecordRepository for FailingRepository<'_> {
    fn add<T: Record>(&self, record: &T) -> WriteResult<RecordId> {
        self.write_guard::<T>()?;
        self.inner.add(record)
    }

    fn put<T: Record>(&self, record: &T) -> WriteResult<RecordId> {
        self.write_guard::<T>()?;
        self.inner.put(record)
    }

    fn get<T: Record>(&self, id: RecordId) -> ReadResult<Option<T>> {
        self.read_guard::<T>()?;
        self.inner.get(id)
    }

    fn get_all<T: Record>(&self) -> ReadResult<Vec<T>> {
        self.read_guard::<T>()?;
        self.inner.get_all()
    }
}

fn seed(repo: &impl RecordRepository) -> RecordId {
    let store_id = repo.add(&Store::new("Market")).unwrap();
    repo.add(&ShoppingItem::new(store_id, "Milk")).unwrap();
    repo.add(&Task::new(
        "Checkup",
        TaskType::Doctor,
        NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(),
    ))
    .unwrap();
    store_id
}

#[test]
fn reload_replaces_snapshot_with_store_contents() {
    let conn = initialize_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    let mut state = AppState::new();
    assert!(state.snapshot().is_empty());

    seed(&repo);
    assert!(state.snapshot().is_empty(), "writes are invisible until reload");

    state.reload(&repo).unwrap();
    assert_eq!(state.snapshot().stores.len(), 1);
    assert_eq!(state.snapshot().shopping_lists.len(), 1);
    assert_eq!(state.snapshot().tasks.len(), 1);
    assert_eq!(state.reload_count(), 1);
}

#[test]
fn reload_is_idempotent_without_mutation() {
    let conn = initialize_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    seed(&repo);
    let mut state = AppState::new();

    state.reload(&repo).unwrap();
    let first = state.snapshot().clone();
    state.reload(&repo).unwrap();

    assert_eq!(state.snapshot(), &first);
}

#[test]
fn failed_collection_read_leaves_previous_snapshot_intact() {
    let conn = initialize_in_memory().unwrap();
    let mut repo = FailingRepository::new(&conn);
    seed(&repo);
    let mut state = AppState::new();
    state.reload(&repo).unwrap();
    let before = state.snapshot().clone();

    repo.add(&Store::new("Pharmacy")).unwrap();
    repo.fail_reads_of = Some(Collection::JournalEntries);

    let err = state.reload(&repo).unwrap_err();
    assert!(matches!(err.0, ReadError::InvalidData { .. }));
    assert_eq!(state.snapshot(), &before);
    assert_eq!(state.reload_count(), 1);

    repo.fail_reads_of = None;
    state.reload(&repo).unwrap();
    assert_eq!(state.snapshot().stores.len(), 2);
}

#[test]
fn engine_failure_during_reload_keeps_cache() {
    let conn = initialize_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    seed(&repo);
    let mut state = AppState::new();
    state.reload(&repo).unwrap();
    let before = state.snapshot().clone();

    conn.execute_batch("DROP TABLE family_members;").unwrap();

    assert!(state.reload(&repo).is_err());
    assert_eq!(state.snapshot(), &before);
}

#[test]
fn toggle_updates_cache_and_store_without_reload() {
    let conn = initialize_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    seed(&repo);
    let mut state = AppState::new();
    state.reload(&repo).unwrap();

    assert!(state.toggle_shopping_item(&repo, 1, true).unwrap());

    assert!(state.snapshot().shopping_item(1).unwrap().completed);
    assert!(repo.get::<ShoppingItem>(1).unwrap().unwrap().completed);
    assert_eq!(state.reload_count(), 1);
}

#[test]
fn toggle_of_uncached_item_is_a_no_op() {
    let conn = initialize_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    let mut state = AppState::new();

    assert!(!state.toggle_shopping_item(&repo, 5, true).unwrap());
    assert!(repo.get_all::<ShoppingItem>().unwrap().is_empty());
}

#[test]
fn failed_toggle_rolls_back_cached_flag() {
    let conn = initialize_in_memory().unwrap();
    let mut repo = FailingRepository::new(&conn);
    seed(&repo);
    let mut state = AppState::new();
    state.reload(&repo).unwrap();
    let before = state.snapshot().clone();

    repo.fail_writes_of = Some(Collection::ShoppingLists);
    let err = state.toggle_shopping_item(&repo, 1, true).unwrap_err();

    assert!(matches!(err, WriteError::InvalidRecord { .. }));
    assert_eq!(state.snapshot(), &before);
    assert!(!repo.get::<ShoppingItem>(1).unwrap().unwrap().completed);
}

#[test]
fn optimistic_update_works_for_any_cached_record() {
    let conn = initialize_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();
    let store_id = seed(&repo);
    let mut state = AppState::new();
    state.reload(&repo).unwrap();

    let applied = state
        .apply_optimistic::<Store, _, _>(&repo, store_id, |store| {
            store.name = "Farmers Market".to_string()
        })
        .unwrap();

    assert!(applied);
    assert_eq!(state.snapshot().store(store_id).unwrap().name, "Farmers Market");
    assert_eq!(
        repo.get::<Store>(store_id).unwrap().unwrap().name,
        "Farmers Market"
    );
}
