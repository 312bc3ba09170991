use homehub_core::db::initialize_in_memory;
use homehub_core::{
    Collection, ReadError, RecordRepository, SqliteRecordRepository, UnknownCollection, WriteError,
};
use serde_json::json;

#[test]
fn market_scenario_through_collection_names() {
    let conn = initialize_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    let store_id = repo.add_value("stores", json!({"name": "Market"})).unwrap();
    assert_eq!(store_id, 1);
    let item_id = repo
        .add_value(
            "shoppingLists",
            json!({"storeId": store_id, "name": "Milk", "completed": false}),
        )
        .unwrap();
    assert_eq!(item_id, 1);

    assert_eq!(
        repo.get_all_values("shoppingLists").unwrap(),
        vec![json!({"id": 1, "storeId": 1, "name": "Milk", "completed": false})]
    );
}

#[test]
fn put_value_merges_by_id() {
    let conn = initialize_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    let id = repo
        .put_value(
            "tasks",
            json!({"name": "Checkup", "type": "Doctor", "date": "2024-05-01"}),
        )
        .unwrap();
    repo.put_value(
        "tasks",
        json!({"id": id, "name": "Checkup", "type": "Doctor", "date": "2024-05-01", "time": "09:00"}),
    )
    .unwrap();

    assert_eq!(
        repo.get_value("tasks", id).unwrap(),
        Some(json!({
            "id": id,
            "name": "Checkup",
            "type": "Doctor",
            "date": "2024-05-01",
            "time": "09:00"
        }))
    );
}

#[test]
fn unknown_collection_fails_writes_and_reads() {
    let conn = initialize_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    let err = repo.add_value("pets", json!({"name": "Rex"})).unwrap_err();
    assert!(matches!(
        err,
        WriteError::UnknownCollection(UnknownCollection(ref name)) if name == "pets"
    ));
    assert!(matches!(
        repo.put_value("pets", json!({})).unwrap_err(),
        WriteError::UnknownCollection(_)
    ));
    assert!(matches!(
        repo.get_all_values("pets").unwrap_err(),
        ReadError::UnknownCollection(_)
    ));
    assert!(matches!(
        repo.get_value("pets", 1).unwrap_err(),
        ReadError::UnknownCollection(_)
    ));
}

#[test]
fn record_shape_mismatch_is_a_write_error() {
    let conn = initialize_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    let err = repo
        .add_value("shoppingLists", json!({"name": "Milk"}))
        .unwrap_err();
    assert!(matches!(
        err,
        WriteError::InvalidRecord {
            collection: Collection::ShoppingLists,
            ..
        }
    ));
    assert!(repo.get_all_values("shoppingLists").unwrap().is_empty());
}

#[test]
fn missing_record_reads_as_none() {
    let conn = initialize_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    assert_eq!(repo.get_value("journalEntries", 3).unwrap(), None);
    assert!(repo.get_all_values("familyMembers").unwrap().is_empty());
}

#[test]
fn optional_fields_stay_absent_in_dynamic_reads() {
    let conn = initialize_in_memory().unwrap();
    let repo = SqliteRecordRepository::try_new(&conn).unwrap();

    let id = repo
        .add_value("familyMembers", json!({"name": "Sam"}))
        .unwrap();

    assert_eq!(
        repo.get_value("familyMembers", id).unwrap(),
        Some(json!({"id": id, "name": "Sam"}))
    );
}
