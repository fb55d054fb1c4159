//!
//! Request and batch shapes shared by the coordinators and the store
//! seam.

use crate::store::StoreError;
use crate::value::{Item, Key};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single write against a table: a full-item put or a key-only delete.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum WriteRequest {
    /// Store the full item, replacing any existing item under its key.
    Put(Item),
    /// Remove the item addressed by the key.
    Delete(Key),
}

/// A write batch: table name to ordered write requests.
pub type WriteBatch = HashMap<String, Vec<WriteRequest>>;

/// Total number of write requests across all tables of a batch.
pub fn request_count(batch: &WriteBatch) -> usize {
    batch.values().map(Vec::len).sum()
}

/// The read-side per-table request: keys to fetch, an optional attribute
/// projection, and the consistency mode.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct KeysAndAttributes {
    pub keys: Vec<Key>,
    pub attributes_to_get: Option<Vec<String>>,
    pub consistent_read: bool,
}

impl KeysAndAttributes {
    /// A request for the given keys with no projection.
    pub fn for_keys(keys: Vec<Key>) -> Self {
        Self {
            keys,
            ..Self::default()
        }
    }
}

/// A read batch: table name to keys-and-attributes.
pub type ReadBatch = HashMap<String, KeysAndAttributes>;

/// A write batch the coordinator could not fully commit, together with
/// the failure that stopped it.
///
/// Always carries at least one unprocessed request and the captured
/// error; fully committed batches produce no record.
#[derive(Clone, Debug)]
pub struct FailedBatch {
    requests: WriteBatch,
    error: StoreError,
}

impl FailedBatch {
    pub fn new(requests: WriteBatch, error: StoreError) -> Self {
        Self { requests, error }
    }

    /// The write requests that were never committed.
    pub fn requests(&self) -> &WriteBatch {
        &self.requests
    }

    /// The failure that terminated this batch.
    pub fn error(&self) -> &StoreError {
        &self.error
    }

    /// Reclaim the unprocessed requests, e.g. to retry them.
    pub fn into_requests(self) -> WriteBatch {
        self.requests
    }
}
