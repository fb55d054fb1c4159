use itemmap::request::{ReadBatch, WriteBatch};
use itemmap::schema::{Mapped, Schema};
use itemmap::store::{BatchGetOutput, BatchWriteOutput, Store, StoreError, StoreResult};
use itemmap::value::{Item, Value};
use std::any::Any;
use std::collections::VecDeque;

/// Builds an item from string attribute pairs
pub fn string_item(pairs: &[(&str, &str)]) -> Item {
    pairs
        .iter()
        .map(|(name, value)| (name.to_string(), Value::s(*value)))
        .collect()
}

/// A mapped type with one key, two plain attributes, and a version
/// attribute
#[derive(Clone, Debug, Default, PartialEq)]
pub struct VersionedRecord {
    pub id: Option<String>,
    pub first_value: Option<String>,
    pub second_value: Option<String>,
    pub version: Option<i64>,
}

impl VersionedRecord {
    pub fn new(id: &str, first_value: Option<&str>, second_value: Option<&str>) -> Self {
        Self {
            id: Some(id.to_string()),
            first_value: first_value.map(String::from),
            second_value: second_value.map(String::from),
            version: None,
        }
    }
}

impl Mapped for VersionedRecord {
    fn schema() -> Schema {
        Schema::builder("mapper-test")
            .hash_key("id")
            .attribute("firstValue")
            .attribute("secondValue")
            .version("version")
            .build()
    }

    fn to_item(&self) -> Item {
        let mut item = Item::new();
        if let Some(id) = &self.id {
            item.insert("id".to_string(), Value::s(id.clone()));
        }
        if let Some(first) = &self.first_value {
            item.insert("firstValue".to_string(), Value::s(first.clone()));
        }
        if let Some(second) = &self.second_value {
            item.insert("secondValue".to_string(), Value::s(second.clone()));
        }
        if let Some(version) = self.version {
            item.insert("version".to_string(), Value::n(version.to_string()));
        }
        item
    }

    fn from_item(item: &Item) -> itemmap::Result<Self> {
        Ok(Self {
            id: item.get("id").and_then(|v| v.as_s()).map(String::from),
            first_value: item
                .get("firstValue")
                .and_then(|v| v.as_s())
                .map(String::from),
            second_value: item
                .get("secondValue")
                .and_then(|v| v.as_s())
                .map(String::from),
            version: item
                .get("version")
                .and_then(|v| v.as_n())
                .and_then(|n| n.parse().ok()),
        })
    }
}

/// A mapped type living in its own physical table
#[derive(Clone, Debug, Default, PartialEq)]
pub struct OtherRecord {
    pub id: Option<String>,
    pub first_value: Option<String>,
}

impl OtherRecord {
    pub fn new(id: &str, first_value: &str) -> Self {
        Self {
            id: Some(id.to_string()),
            first_value: Some(first_value.to_string()),
        }
    }
}

impl Mapped for OtherRecord {
    fn schema() -> Schema {
        Schema::builder("mapper-test-different-table")
            .hash_key("id")
            .attribute("firstValue")
            .build()
    }

    fn to_item(&self) -> Item {
        let mut item = Item::new();
        if let Some(id) = &self.id {
            item.insert("id".to_string(), Value::s(id.clone()));
        }
        if let Some(first) = &self.first_value {
            item.insert("firstValue".to_string(), Value::s(first.clone()));
        }
        item
    }

    fn from_item(item: &Item) -> itemmap::Result<Self> {
        Ok(Self {
            id: item.get("id").and_then(|v| v.as_s()).map(String::from),
            first_value: item
                .get("firstValue")
                .and_then(|v| v.as_s())
                .map(String::from),
        })
    }
}

/// A mapped type whose hash key may be auto-generated on save
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AutoKeyedRecord {
    pub key: Option<String>,
    pub range_key: Option<String>,
    pub other_attribute: Option<String>,
}

impl Mapped for AutoKeyedRecord {
    fn schema() -> Schema {
        Schema::builder("auto-keyed-test")
            .auto_generated_hash_key("key")
            .range_key("rangeKey")
            .attribute("otherAttribute")
            .build()
    }

    fn to_item(&self) -> Item {
        let mut item = Item::new();
        if let Some(key) = &self.key {
            item.insert("key".to_string(), Value::s(key.clone()));
        }
        if let Some(range) = &self.range_key {
            item.insert("rangeKey".to_string(), Value::s(range.clone()));
        }
        if let Some(other) = &self.other_attribute {
            item.insert("otherAttribute".to_string(), Value::s(other.clone()));
        }
        item
    }

    fn from_item(item: &Item) -> itemmap::Result<Self> {
        Ok(Self {
            key: item.get("key").and_then(|v| v.as_s()).map(String::from),
            range_key: item
                .get("rangeKey")
                .and_then(|v| v.as_s())
                .map(String::from),
            other_attribute: item
                .get("otherAttribute")
                .and_then(|v| v.as_s())
                .map(String::from),
        })
    }
}

/// A store double driven by a script of pre-programmed results.
///
/// Every round's request is recorded by appending to a list, so tests
/// can assert on each round independently instead of sharing one
/// mutable capture slot.
#[derive(Default)]
pub struct ScriptedStore {
    write_results: VecDeque<StoreResult<BatchWriteOutput>>,
    get_results: VecDeque<StoreResult<BatchGetOutput>>,
    pub write_rounds: Vec<WriteBatch>,
    pub get_rounds: Vec<ReadBatch>,
}

impl ScriptedStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a successful write round with the given unprocessed items.
    pub fn push_write_ok(&mut self, unprocessed_items: WriteBatch) {
        self.write_results
            .push_back(Ok(BatchWriteOutput { unprocessed_items }));
    }

    /// Script a failed write round.
    pub fn push_write_err(&mut self, code: &str, message: &str) {
        self.write_results
            .push_back(Err(StoreError::new(code, message)));
    }

    /// Script a successful read round.
    pub fn push_get_ok(&mut self, output: BatchGetOutput) {
        self.get_results.push_back(Ok(output));
    }
}

impl Store for ScriptedStore {
    fn batch_write(&mut self, batch: &WriteBatch) -> StoreResult<BatchWriteOutput> {
        self.write_rounds.push(batch.clone());
        self.write_results
            .pop_front()
            .expect("scripted store ran out of write results")
    }

    fn batch_get(&mut self, batch: &ReadBatch) -> StoreResult<BatchGetOutput> {
        self.get_rounds.push(batch.clone());
        self.get_results
            .pop_front()
            .expect("scripted store ran out of get results")
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}
