//!
//! Defines the tagged attribute value representation (`Value`) and the
//! item/key aliases built from it.
//!
//! A `Value` mirrors the store's wire vocabulary: strings, numbers,
//! binaries, homogeneous sets of each, and an explicit null. Numbers
//! travel as strings, matching the store's arbitrary-precision decimal
//! representation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A single stored record: attribute name to tagged value.
///
/// Attribute names are unique; no ordering is guaranteed downstream.
pub type Item = HashMap<String, Value>;

/// The key-attribute subset of an [`Item`], identifying exactly one item
/// within a table. Structurally identical to an item; restricted to key
/// attributes by construction (see [`Schema::key_of`](crate::schema::Schema::key_of)).
pub type Key = Item;

/// A tagged attribute value.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum Value {
    /// A UTF-8 string.
    S(String),
    /// A number in its store-side decimal string form.
    N(String),
    /// An opaque binary blob.
    B(Vec<u8>),
    /// A set of strings.
    SS(Vec<String>),
    /// A set of numbers.
    NS(Vec<String>),
    /// A set of binary blobs.
    BS(Vec<Vec<u8>>),
    /// An explicit null.
    Null,
}

impl Value {
    /// Build a string value.
    pub fn s(value: impl Into<String>) -> Self {
        Value::S(value.into())
    }

    /// Build a number value from its decimal string form.
    pub fn n(value: impl Into<String>) -> Self {
        Value::N(value.into())
    }

    /// Build a binary value.
    pub fn b(value: impl Into<Vec<u8>>) -> Self {
        Value::B(value.into())
    }

    /// Get the string payload, if this is a string value.
    pub fn as_s(&self) -> Option<&str> {
        match self {
            Value::S(s) => Some(s),
            _ => None,
        }
    }

    /// Get the number payload in its decimal string form, if this is a
    /// number value.
    pub fn as_n(&self) -> Option<&str> {
        match self {
            Value::N(n) => Some(n),
            _ => None,
        }
    }

    /// Get the binary payload, if this is a binary value.
    pub fn as_b(&self) -> Option<&[u8]> {
        match self {
            Value::B(b) => Some(b),
            _ => None,
        }
    }

    /// Whether this value is the explicit null.
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }
}

/// The action carried by an update entry.
#[derive(Clone, Copy, Debug, Default, Serialize, Deserialize, PartialEq, Eq)]
pub enum UpdateAction {
    /// Set the attribute to the carried value.
    #[default]
    Put,
    /// Remove the attribute from the item.
    Delete,
}

/// A single entry in an update request: a value and what to do with it.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeUpdate {
    pub value: Value,
    pub action: UpdateAction,
}

impl AttributeUpdate {
    /// An update entry that sets the attribute to `value`.
    pub fn put(value: Value) -> Self {
        Self {
            value,
            action: UpdateAction::Put,
        }
    }
}
