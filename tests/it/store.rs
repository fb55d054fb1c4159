use crate::helpers::*;
use itemmap::condition::{ConditionMap, ExpectedCondition};
use itemmap::request::{KeysAndAttributes, ReadBatch, WriteBatch, WriteRequest};
use itemmap::store::{InMemoryStore, Store, RESOURCE_NOT_FOUND};
use itemmap::value::{AttributeUpdate, Value};
use std::collections::HashMap;

fn store_with_table() -> InMemoryStore {
    let mut store = InMemoryStore::new();
    store.create_table("testTable", vec!["id".to_string()]);
    store
}

#[test]
fn test_in_memory_store_basic_operations() {
    let mut store = store_with_table();

    let item = string_item(&[("id", "a"), ("firstValue", "v1")]);
    store.put_item("testTable", item.clone()).expect("put");
    assert_eq!(store.item_count("testTable"), 1);

    let key = string_item(&[("id", "a")]);
    assert_eq!(store.get_item("testTable", &key), Some(&item));

    store.delete_item("testTable", &key).expect("delete");
    assert_eq!(store.item_count("testTable"), 0);
    assert_eq!(store.get_item("testTable", &key), None);
}

#[test]
fn test_in_memory_store_rejects_unknown_table() {
    let mut store = InMemoryStore::new();

    let err = store
        .put_item("missing", string_item(&[("id", "a")]))
        .expect_err("unknown table");
    assert_eq!(err.code(), RESOURCE_NOT_FOUND);
}

#[test]
fn test_in_memory_store_rejects_incomplete_key() {
    let mut store = store_with_table();

    let err = store
        .put_item("testTable", string_item(&[("firstValue", "v1")]))
        .expect_err("missing key attribute");
    assert_eq!(err.code(), "ValidationException");
}

#[test]
fn test_in_memory_store_batch_write_and_get() {
    let mut store = store_with_table();

    let mut batch = WriteBatch::new();
    batch.insert(
        "testTable".to_string(),
        vec![
            WriteRequest::Put(string_item(&[("id", "a"), ("firstValue", "v1")])),
            WriteRequest::Put(string_item(&[("id", "b"), ("firstValue", "v2")])),
            WriteRequest::Delete(string_item(&[("id", "a")])),
        ],
    );

    let output = store.batch_write(&batch).expect("batch write");
    assert!(output.unprocessed_items.is_empty());
    assert_eq!(store.item_count("testTable"), 1);

    let mut read = ReadBatch::new();
    read.insert(
        "testTable".to_string(),
        KeysAndAttributes::for_keys(vec![
            string_item(&[("id", "a")]),
            string_item(&[("id", "b")]),
        ]),
    );

    let output = store.batch_get(&read).expect("batch get");
    assert!(output.unprocessed_keys.is_empty());
    // Only the surviving item comes back
    let items = &output.responses["testTable"];
    assert_eq!(items.len(), 1);
    assert_eq!(items[0]["id"], Value::s("b"));
}

#[test]
fn test_in_memory_store_batch_get_projection() {
    let mut store = store_with_table();
    store
        .put_item(
            "testTable",
            string_item(&[("id", "a"), ("firstValue", "v1"), ("secondValue", "v2")]),
        )
        .expect("put");

    let mut read = ReadBatch::new();
    read.insert(
        "testTable".to_string(),
        KeysAndAttributes {
            keys: vec![string_item(&[("id", "a")])],
            attributes_to_get: Some(vec!["id".to_string(), "secondValue".to_string()]),
            consistent_read: false,
        },
    );

    let output = store.batch_get(&read).expect("batch get");
    let items = &output.responses["testTable"];
    assert_eq!(items.len(), 1);
    assert_eq!(items[0].len(), 2);
    assert!(items[0].contains_key("secondValue"));
    assert!(!items[0].contains_key("firstValue"));
}

#[test]
fn test_in_memory_store_conditional_update() {
    let mut store = store_with_table();
    let key = string_item(&[("id", "a")]);

    let mut updates = HashMap::new();
    updates.insert(
        "firstValue".to_string(),
        AttributeUpdate::put(Value::s("v1")),
    );

    // Creating under a not-exists guard succeeds once
    let mut expected = ConditionMap::new();
    expected.insert("firstValue".to_string(), ExpectedCondition::not_exists());
    store
        .apply_update("testTable", &key, &updates, &expected)
        .expect("first conditional update");

    // And fails the second time, leaving the item untouched
    let err = store
        .apply_update("testTable", &key, &updates, &expected)
        .expect_err("condition should fail");
    assert_eq!(err.code(), "ConditionalCheckFailedException");
    assert_eq!(
        store.get_item("testTable", &key).expect("item")["firstValue"],
        Value::s("v1")
    );
}

#[test]
fn test_in_memory_store_update_delete_action() {
    let mut store = store_with_table();
    store
        .put_item(
            "testTable",
            string_item(&[("id", "a"), ("firstValue", "v1"), ("secondValue", "v2")]),
        )
        .expect("put");

    let key = string_item(&[("id", "a")]);
    let mut updates = HashMap::new();
    updates.insert(
        "secondValue".to_string(),
        AttributeUpdate {
            value: Value::Null,
            action: itemmap::value::UpdateAction::Delete,
        },
    );

    store
        .apply_update("testTable", &key, &updates, &ConditionMap::new())
        .expect("update");

    let item = store.get_item("testTable", &key).expect("item");
    assert!(!item.contains_key("secondValue"));
    assert_eq!(item["firstValue"], Value::s("v1"));
}

#[test]
fn test_in_memory_store_save_and_load_file() {
    let mut store = store_with_table();
    store
        .put_item("testTable", string_item(&[("id", "a"), ("firstValue", "v1")]))
        .expect("put");

    let dir = tempfile::tempdir().expect("temp dir");
    let path = dir.path().join("store.json");

    store.save_to_file(&path).expect("save");
    let loaded = InMemoryStore::load_from_file(&path).expect("load");

    let key = string_item(&[("id", "a")]);
    assert_eq!(loaded.item_count("testTable"), 1);
    assert_eq!(
        loaded.get_item("testTable", &key),
        store.get_item("testTable", &key)
    );
}

#[test]
fn test_in_memory_store_load_missing_file_is_empty() {
    let dir = tempfile::tempdir().expect("temp dir");
    let loaded =
        InMemoryStore::load_from_file(dir.path().join("absent.json")).expect("load");
    assert_eq!(loaded.item_count("testTable"), 0);
}
