//!
//! Explicit schema descriptors for mapped types.
//!
//! A `Schema` replaces runtime reflection: the caller builds one per
//! mapped type (table name plus ordered attribute definitions with key
//! roles) and passes it by reference into the mapping components. The
//! `Mapped` trait ties a concrete Rust type to its schema and to the
//! encode/decode functions that turn it into an [`Item`] and back.

use crate::config::MapperConfig;
use crate::value::{Item, Key, Value};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};

/// The role an attribute plays within its table's key.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub enum KeyRole {
    /// The partition (hash) key attribute.
    Hash,
    /// The sort (range) key attribute.
    Range,
    /// A plain, non-key attribute.
    NonKey,
}

/// Describes a single attribute of a mapped type.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct AttributeDef {
    name: String,
    role: KeyRole,
    version: bool,
    auto_generate: bool,
}

impl AttributeDef {
    /// The attribute name as stored.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The attribute's key role.
    pub fn role(&self) -> KeyRole {
        self.role
    }

    /// Whether this attribute is part of the table key.
    pub fn is_key(&self) -> bool {
        !matches!(self.role, KeyRole::NonKey)
    }

    /// Whether this attribute carries the optimistic-lock version.
    pub fn is_version(&self) -> bool {
        self.version
    }

    /// Whether a missing value for this key attribute may be synthesized
    /// on save.
    pub fn is_auto_generated(&self) -> bool {
        self.auto_generate
    }
}

/// An explicit descriptor of a mapped type: the base table name and the
/// ordered attribute definitions.
///
/// Built once per type via [`Schema::builder`] and passed by reference
/// into the mapping components. Validation of key requirements happens
/// at the operations that need them, so a schema without a hash key can
/// exist but fails as soon as a key is required.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Schema {
    table_name: String,
    attributes: Vec<AttributeDef>,
}

impl Schema {
    /// Start building a schema for the given base table name.
    pub fn builder(table_name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder::new(table_name)
    }

    /// The base (unresolved) table name.
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    /// The attribute definitions, in declaration order.
    pub fn attributes(&self) -> &[AttributeDef] {
        &self.attributes
    }

    /// Look up an attribute definition by name.
    pub fn attribute(&self, name: &str) -> Option<&AttributeDef> {
        self.attributes.iter().find(|a| a.name == name)
    }

    /// The hash key definition, if one is declared.
    pub fn hash_key(&self) -> Option<&AttributeDef> {
        self.attributes
            .iter()
            .find(|a| matches!(a.role, KeyRole::Hash))
    }

    /// The range key definition, if one is declared.
    pub fn range_key(&self) -> Option<&AttributeDef> {
        self.attributes
            .iter()
            .find(|a| matches!(a.role, KeyRole::Range))
    }

    /// Resolve the physical table name for this schema.
    ///
    /// Precedence: a per-instance override replaces the base name, then
    /// the configured prefix (if any) is applied to whichever name won.
    pub fn resolve_table_name(
        &self,
        instance_override: Option<&str>,
        config: &MapperConfig,
    ) -> String {
        let base = instance_override.unwrap_or(&self.table_name);
        match config.table_name_prefix() {
            Some(prefix) => format!("{prefix}{base}"),
            None => base.to_string(),
        }
    }

    /// Extract the key attributes of `item` into a [`Key`].
    ///
    /// # Errors
    /// * `Error::Schema` if the schema declares no hash key.
    /// * `Error::MalformedItem` if the item is missing a declared key
    ///   attribute's value.
    pub fn key_of(&self, item: &Item) -> Result<Key> {
        let hash = self.hash_key().ok_or_else(|| {
            Error::Schema(format!("no hash key defined for table {}", self.table_name))
        })?;

        let mut key = Key::new();
        let hash_value = item
            .get(&hash.name)
            .filter(|v| !v.is_null())
            .ok_or_else(|| {
                Error::MalformedItem(format!("missing hash key attribute {}", hash.name))
            })?;
        key.insert(hash.name.clone(), hash_value.clone());

        if let Some(range) = self.range_key() {
            let range_value = item
                .get(&range.name)
                .filter(|v| !v.is_null())
                .ok_or_else(|| {
                    Error::MalformedItem(format!("missing range key attribute {}", range.name))
                })?;
            key.insert(range.name.clone(), range_value.clone());
        }

        Ok(key)
    }

    /// Build a [`Key`] from raw hash and range key values.
    ///
    /// # Errors
    /// * `Error::Schema` if the schema declares no hash key, or a range
    ///   value is supplied but the schema declares no range key.
    pub fn key_from_values(&self, hash: Value, range: Option<Value>) -> Result<Key> {
        let hash_def = self.hash_key().ok_or_else(|| {
            Error::Schema(format!("no hash key defined for table {}", self.table_name))
        })?;

        let mut key = Key::new();
        key.insert(hash_def.name.clone(), hash);

        if let Some(range_value) = range {
            let range_def = self.range_key().ok_or_else(|| {
                Error::Schema(format!(
                    "range key value supplied but no range key defined for table {}",
                    self.table_name
                ))
            })?;
            key.insert(range_def.name.clone(), range_value);
        }

        Ok(key)
    }

    /// Whether saving `item` under this schema would need a key value to
    /// be synthesized: true iff some auto-generatable key attribute has
    /// no assigned value in the item.
    pub fn needs_generated_key(&self, item: &Item) -> bool {
        self.attributes.iter().any(|a| {
            a.is_key()
                && a.auto_generate
                && item.get(&a.name).filter(|v| !v.is_null()).is_none()
        })
    }
}

/// Builder for [`Schema`].
///
/// Attributes are recorded in call order, which is the order the save
/// traversal visits them in.
pub struct SchemaBuilder {
    table_name: String,
    attributes: Vec<AttributeDef>,
}

impl SchemaBuilder {
    fn new(table_name: impl Into<String>) -> Self {
        Self {
            table_name: table_name.into(),
            attributes: Vec::new(),
        }
    }

    fn push(mut self, name: impl Into<String>, role: KeyRole, version: bool, auto: bool) -> Self {
        self.attributes.push(AttributeDef {
            name: name.into(),
            role,
            version,
            auto_generate: auto,
        });
        self
    }

    /// Declare the hash key attribute.
    pub fn hash_key(self, name: impl Into<String>) -> Self {
        self.push(name, KeyRole::Hash, false, false)
    }

    /// Declare a hash key attribute whose value may be auto-generated on
    /// save when unset.
    pub fn auto_generated_hash_key(self, name: impl Into<String>) -> Self {
        self.push(name, KeyRole::Hash, false, true)
    }

    /// Declare the range key attribute.
    pub fn range_key(self, name: impl Into<String>) -> Self {
        self.push(name, KeyRole::Range, false, false)
    }

    /// Declare a plain attribute.
    pub fn attribute(self, name: impl Into<String>) -> Self {
        self.push(name, KeyRole::NonKey, false, false)
    }

    /// Declare the optimistic-lock version attribute.
    pub fn version(self, name: impl Into<String>) -> Self {
        self.push(name, KeyRole::NonKey, true, false)
    }

    /// Finish the schema.
    pub fn build(self) -> Schema {
        Schema {
            table_name: self.table_name,
            attributes: self.attributes,
        }
    }
}

/// Ties a concrete Rust type to its schema and its item codec.
///
/// `to_item` is the attribute-value encoder: it produces the encoded
/// attribute map for an instance, omitting unset attributes (an omitted
/// or explicit-null attribute reads as "no value" to the save
/// traversal). `from_item` is the matching decoder. The mapping
/// components are agnostic to the encoding rules themselves.
pub trait Mapped: Sized {
    /// The schema describing this type.
    fn schema() -> Schema;

    /// A per-instance physical table name override, if any.
    fn table_override(&self) -> Option<String> {
        None
    }

    /// Encode this instance into an attribute map.
    fn to_item(&self) -> Item;

    /// Decode an attribute map back into an instance.
    fn from_item(item: &Item) -> Result<Self>;
}
