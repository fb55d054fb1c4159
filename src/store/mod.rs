//!
//! The backend seam: the two batch request primitives the mapping layer
//! consumes, and the error signal it classifies.

use crate::request::{ReadBatch, WriteBatch};
use crate::value::Item;
use serde::{Deserialize, Serialize};
use std::any::Any;
use std::collections::HashMap;
use std::fmt;

mod in_memory;

pub use in_memory::InMemoryStore;

/// Error code signaled when a physical request exceeds the backend's
/// size limit. Compared case-sensitively.
pub const ENTITY_TOO_LARGE: &str = "Request entity too large";

/// Error code signaled when the backend is throttling the caller.
/// Compared case-sensitively.
pub const THROTTLING_EXCEPTION: &str = "ThrottlingException";

/// Error code signaled when a table does not exist.
pub const RESOURCE_NOT_FOUND: &str = "ResourceNotFoundException";

/// Error code signaled when a conditional write's expectations fail.
pub const CONDITIONAL_CHECK_FAILED: &str = "ConditionalCheckFailedException";

/// A failure reported by the store, classified by its code string.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct StoreError {
    code: String,
    message: String,
}

impl StoreError {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
        }
    }

    /// The backend error identifier.
    pub fn code(&self) -> &str {
        &self.code
    }

    /// The human-readable failure description.
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Whether this is the entity-too-large class, recoverable by
    /// splitting the batch.
    pub fn is_capacity_exceeded(&self) -> bool {
        self.code == ENTITY_TOO_LARGE
    }

    /// Whether this is the throttling class, recoverable by
    /// caller-driven backoff.
    pub fn is_throttling(&self) -> bool {
        self.code == THROTTLING_EXCEPTION
    }
}

impl fmt::Display for StoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for StoreError {}

impl From<StoreError> for crate::Error {
    fn from(err: StoreError) -> Self {
        crate::Error::Store {
            code: err.code,
            message: err.message,
        }
    }
}

/// Result type for store calls.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// The outcome of a physical batch write: requests the backend accepted
/// are absent; the rest come back for another round.
#[derive(Clone, Debug, Default)]
pub struct BatchWriteOutput {
    pub unprocessed_items: WriteBatch,
}

/// The outcome of a physical batch get: per-table response items plus
/// the keys the backend did not get to this round.
#[derive(Clone, Debug, Default)]
pub struct BatchGetOutput {
    pub responses: HashMap<String, Vec<Item>>,
    pub unprocessed_keys: ReadBatch,
}

/// Store trait abstracting the underlying wire client.
///
/// One call corresponds to one backend round-trip. Implementations do
/// not retry; the coordinators own the unprocessed-entry and split
/// policies.
pub trait Store: Send + Sync + Any {
    fn batch_write(&mut self, batch: &WriteBatch) -> StoreResult<BatchWriteOutput>;
    fn batch_get(&mut self, batch: &ReadBatch) -> StoreResult<BatchGetOutput>;

    /// Get a reference to self as Any
    fn as_any(&self) -> &dyn Any;
}
