use crate::condition::ConditionMap;
use crate::request::{ReadBatch, WriteBatch, WriteRequest};
use crate::store::{
    BatchGetOutput, BatchWriteOutput, Store, StoreError, StoreResult, CONDITIONAL_CHECK_FAILED,
    RESOURCE_NOT_FOUND,
};
use crate::value::{AttributeUpdate, Item, Key, UpdateAction};
use crate::Result;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::fs;
use std::path::Path;

/// A simple in-memory store implementation using a `HashMap` per table.
///
/// This store is suitable for testing, development, or scenarios where
/// data persistence is not strictly required or is handled externally
/// (e.g., by saving/loading the entire state to/from a file).
///
/// Tables must be created before use, mirroring a real backend where
/// the table and its key schema exist ahead of any request. Basic
/// persistence is available via `save_to_file` and `load_from_file`,
/// serializing the table map to JSON.
#[derive(Serialize, Deserialize, Debug, Default)]
pub struct InMemoryStore {
    tables: HashMap<String, TableData>,
}

#[derive(Serialize, Deserialize, Debug)]
struct TableData {
    key_attributes: Vec<String>,
    // Indexed by the key fingerprint, not the key itself: items are
    // attribute maps and maps cannot hash themselves.
    items: HashMap<String, Item>,
}

/// A deterministic string form of a key, used as the item index.
///
/// Attributes are sorted by name before serialization so that two equal
/// keys always produce the same fingerprint.
fn key_fingerprint(key: &Key) -> String {
    let mut pairs: Vec<(&String, &crate::value::Value)> = key.iter().collect();
    pairs.sort_by_key(|(name, _)| name.as_str());
    serde_json::to_string(&pairs).expect("key attributes serialize to JSON")
}

impl InMemoryStore {
    /// Creates a new, empty `InMemoryStore` with no tables.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with the given key attribute names.
    ///
    /// Recreating an existing table clears its items.
    pub fn create_table(&mut self, name: impl Into<String>, key_attributes: Vec<String>) {
        self.tables.insert(
            name.into(),
            TableData {
                key_attributes,
                items: HashMap::new(),
            },
        );
    }

    fn table(&self, name: &str) -> StoreResult<&TableData> {
        self.tables
            .get(name)
            .ok_or_else(|| StoreError::new(RESOURCE_NOT_FOUND, format!("no such table: {name}")))
    }

    fn table_mut(&mut self, name: &str) -> StoreResult<&mut TableData> {
        self.tables
            .get_mut(name)
            .ok_or_else(|| StoreError::new(RESOURCE_NOT_FOUND, format!("no such table: {name}")))
    }

    /// Extract the key attributes of `item` per the table's key schema.
    fn key_of(table: &TableData, item: &Item) -> StoreResult<Key> {
        let mut key = Key::new();
        for name in &table.key_attributes {
            let value = item.get(name).filter(|v| !v.is_null()).ok_or_else(|| {
                StoreError::new(
                    "ValidationException",
                    format!("item is missing key attribute {name}"),
                )
            })?;
            key.insert(name.clone(), value.clone());
        }
        Ok(key)
    }

    /// Number of items currently stored in a table, zero if the table
    /// does not exist.
    pub fn item_count(&self, table: &str) -> usize {
        self.tables.get(table).map_or(0, |t| t.items.len())
    }

    /// Fetch a single item by key.
    pub fn get_item(&self, table: &str, key: &Key) -> Option<&Item> {
        self.tables
            .get(table)
            .and_then(|t| t.items.get(&key_fingerprint(key)))
    }

    /// Insert or replace a single item.
    pub fn put_item(&mut self, table: &str, item: Item) -> StoreResult<()> {
        let data = self.table_mut(table)?;
        let key = Self::key_of(data, &item)?;
        data.items.insert(key_fingerprint(&key), item);
        Ok(())
    }

    /// Remove a single item by key. Removing an absent item is not an
    /// error.
    pub fn delete_item(&mut self, table: &str, key: &Key) -> StoreResult<()> {
        let data = self.table_mut(table)?;
        data.items.remove(&key_fingerprint(key));
        Ok(())
    }

    /// Apply an update map to the item under `key`, subject to the
    /// expected conditions.
    ///
    /// Put actions set attributes, delete actions remove them; an absent
    /// item is created from the key plus the put attributes. A failed
    /// expectation leaves the item untouched and reports
    /// `ConditionalCheckFailedException`.
    pub fn apply_update(
        &mut self,
        table: &str,
        key: &Key,
        updates: &HashMap<String, AttributeUpdate>,
        expected: &ConditionMap,
    ) -> StoreResult<()> {
        let data = self.table_mut(table)?;
        let fingerprint = key_fingerprint(key);
        let existing = data.items.get(&fingerprint);

        for (name, condition) in expected {
            let current = existing.and_then(|item| item.get(name)).filter(|v| !v.is_null());
            if let Some(exists) = condition.existence() {
                if exists != current.is_some() {
                    return Err(StoreError::new(
                        CONDITIONAL_CHECK_FAILED,
                        format!("existence expectation failed for attribute {name}"),
                    ));
                }
            }
            if let Some(expected_value) = condition.value() {
                if current != Some(expected_value) {
                    return Err(StoreError::new(
                        CONDITIONAL_CHECK_FAILED,
                        format!("value expectation failed for attribute {name}"),
                    ));
                }
            }
        }

        let mut item = existing.cloned().unwrap_or_else(|| key.clone());
        for (name, update) in updates {
            match update.action {
                UpdateAction::Put => {
                    item.insert(name.clone(), update.value.clone());
                }
                UpdateAction::Delete => {
                    item.remove(name);
                }
            }
        }
        data.items.insert(fingerprint, item);
        Ok(())
    }

    /// Saves the entire store state (all tables) to a specified file as JSON.
    pub fn save_to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let json = serde_json::to_string(self)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Loads the store state from a specified JSON file.
    ///
    /// If the file does not exist, a new, empty `InMemoryStore` is returned.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        if !path.as_ref().exists() {
            return Ok(Self::new());
        }

        let json = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&json)?)
    }
}

impl Store for InMemoryStore {
    /// Applies every write request in the batch. The in-memory store has
    /// no capacity limits, so the unprocessed-items map is always empty.
    fn batch_write(&mut self, batch: &WriteBatch) -> StoreResult<BatchWriteOutput> {
        for (table, requests) in batch {
            // Surface unknown tables before mutating anything
            self.table(table)?;
            for request in requests {
                match request {
                    WriteRequest::Put(item) => self.put_item(table, item.clone())?,
                    WriteRequest::Delete(key) => self.delete_item(table, key)?,
                }
            }
        }
        Ok(BatchWriteOutput::default())
    }

    /// Looks up every requested key. Keys with no stored item simply
    /// produce no response entry; the unprocessed-keys map is always
    /// empty.
    fn batch_get(&mut self, batch: &ReadBatch) -> StoreResult<BatchGetOutput> {
        let mut output = BatchGetOutput::default();
        for (table, request) in batch {
            let data = self.table(table)?;
            let mut items = Vec::new();
            for key in &request.keys {
                if let Some(item) = data.items.get(&key_fingerprint(key)) {
                    items.push(match &request.attributes_to_get {
                        Some(projection) => item
                            .iter()
                            .filter(|(name, _)| projection.contains(name))
                            .map(|(name, value)| (name.clone(), value.clone()))
                            .collect(),
                        None => item.clone(),
                    });
                }
            }
            output.responses.insert(table.clone(), items);
        }
        Ok(output)
    }

    /// Returns `self` as a `&dyn Any` reference.
    fn as_any(&self) -> &dyn Any {
        self
    }
}
