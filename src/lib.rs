//!
//! Itemmap: a typed object-mapping layer for wide-column key-value stores.
//! This library translates in-memory objects to and from store items and
//! coordinates the batch plumbing around them.
//!
//! ## Core Concepts
//!
//! Itemmap is built around several key concepts:
//!
//! * **Values (`value::Value`)**: The tagged attribute representation used on the wire — strings, numbers, binaries, sets, and null.
//! * **Items (`value::Item`)**: A single stored record, a map from attribute name to `Value`. A `Key` is the key-attribute subset of an item.
//! * **Schemas (`schema::Schema`)**: An explicit, caller-built descriptor of a mapped type: table name plus ordered attribute definitions with key roles. There is no runtime reflection; every mapping component takes a schema by reference.
//! * **Stores (`store::Store`)**: A pluggable backend seam exposing the two batch primitives (`batch_write`, `batch_get`). `InMemoryStore` is the bundled reference implementation.
//! * **Coordinators (`batch_write`, `batch_read`)**: Retry/split logic for oversized write batches and round-merging for batched key lookups. Failures are returned as data (`FailedBatch`), never thrown, so partial success stays representable.
//! * **Save protocol (`save::SaveOperation`)**: A phased attribute traversal that builds an update request and notifies a `SaveHandler` capability before the final commit step.
//! * **Mapper (`mapper::Mapper`)**: The facade tying a store, a configuration, and the mapping components together.

pub mod batch_read;
pub mod batch_write;
pub mod condition;
pub mod config;
pub mod mapper;
pub mod request;
pub mod save;
pub mod scan;
pub mod schema;
pub mod store;
pub mod transform;
pub mod value;

/// Re-export the `Mapper` struct for easier access.
pub use mapper::Mapper;

/// Result type used throughout the Itemmap library.
pub type Result<T> = std::result::Result<T, Error>;

/// Common error type for the Itemmap library.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Item not found")]
    NotFound,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialize(#[from] serde_json::Error),

    /// Invalid caller-supplied arguments, e.g. an unsupported
    /// conditional combinator. Fatal and never retried.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A schema does not describe what an operation requires, e.g. a
    /// missing hash key definition. Fatal at traversal start.
    #[error("Schema error: {0}")]
    Schema(String),

    /// A store call failed outside of the batch coordinators. Batch-level
    /// store failures are returned as [`FailedBatch`](crate::request::FailedBatch)
    /// records instead of this variant.
    #[error("Store error [{code}]: {message}")]
    Store { code: String, message: String },

    /// An item could not be decoded back into its mapped type.
    #[error("Malformed item: {0}")]
    MalformedItem(String),
}
