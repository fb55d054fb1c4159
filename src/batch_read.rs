//!
//! Batch-read coordination: grouped key lookups with unprocessed-key
//! carry-over between rounds, and a typed result mapping.

use crate::config::MapperConfig;
use crate::request::{KeysAndAttributes, ReadBatch};
use crate::schema::{Mapped, Schema};
use crate::store::Store;
use crate::value::{Item, Key};
use crate::Result;
use std::collections::HashMap;
use tracing::debug;

/// Addresses a single item to fetch: the schema of the concrete type to
/// materialize, an optional per-instance table override, and the key.
#[derive(Clone, Debug)]
pub struct KeyTemplate {
    schema: Schema,
    table_override: Option<String>,
    key: Key,
}

impl KeyTemplate {
    /// A template for the given schema and key.
    pub fn new(schema: Schema, key: Key) -> Self {
        Self {
            schema,
            table_override: None,
            key,
        }
    }

    /// Route this template to a different physical table.
    pub fn with_table_override(mut self, table: impl Into<String>) -> Self {
        self.table_override = Some(table.into());
        self
    }

    /// Build a template from a key-bearing object: the object's key
    /// attributes address the item to fetch, everything else is ignored.
    pub fn from_object<T: Mapped>(object: &T) -> Result<Self> {
        let schema = T::schema();
        let key = schema.key_of(&object.to_item())?;
        Ok(Self {
            schema,
            table_override: object.table_override(),
            key,
        })
    }

    /// The physical table this template resolves to.
    ///
    /// Uses the same naming function as the request construction, so a
    /// response table name always correlates back to the caller type
    /// that requested it.
    pub fn table_name(&self, config: &MapperConfig) -> String {
        self.schema
            .resolve_table_name(self.table_override.as_deref(), config)
    }

    /// The key addressing the item.
    pub fn key(&self) -> &Key {
        &self.key
    }
}

/// The merged outcome of a batch load: physical table name to the items
/// fetched from it.
#[derive(Debug, Default)]
pub struct LoadResult {
    items: HashMap<String, Vec<Item>>,
}

impl LoadResult {
    /// Whether nothing was fetched.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of physical tables with a response entry.
    pub fn table_count(&self) -> usize {
        self.items.len()
    }

    /// The raw items fetched from a physical table. Empty for unknown
    /// tables.
    pub fn items(&self, table: &str) -> &[Item] {
        self.items.get(table).map_or(&[], Vec::as_slice)
    }

    /// Materialize and remove the items belonging to type `T`.
    ///
    /// Resolves `T`'s physical table through the same naming function
    /// used to build the request, then decodes each of that table's
    /// items with `T`'s codec. Requesting a type with no fetched items
    /// yields an empty vector.
    pub fn take<T: Mapped>(&mut self, config: &MapperConfig) -> Result<Vec<T>> {
        let table = T::schema().resolve_table_name(None, config);
        self.take_from::<T>(&table)
    }

    /// Like [`take`](Self::take), but against an explicit physical table
    /// name, for types fetched through a per-instance table override.
    pub fn take_from<T: Mapped>(&mut self, table: &str) -> Result<Vec<T>> {
        self.items
            .remove(table)
            .unwrap_or_default()
            .iter()
            .map(T::from_item)
            .collect()
    }
}

/// Issue batched key lookups for the given templates, merging
/// unprocessed keys from one round into the next.
///
/// Templates are grouped by physical table name into one batch-get call
/// per round. Every round appends the backend's responses to the result
/// and re-issues exactly the keys the backend reported unprocessed,
/// terminating when none remain. An empty template list yields an empty
/// result without issuing any store call.
pub fn load_batches(
    store: &mut dyn Store,
    templates: &[KeyTemplate],
    config: &MapperConfig,
) -> Result<LoadResult> {
    let mut result = LoadResult::default();
    if templates.is_empty() {
        return Ok(result);
    }

    // First round: group every template's key by physical table.
    let mut pending = ReadBatch::new();
    for template in templates {
        let entry = pending
            .entry(template.table_name(config))
            .or_insert_with(|| KeysAndAttributes {
                consistent_read: config.consistent_reads(),
                ..KeysAndAttributes::default()
            });
        entry.keys.push(template.key.clone());
    }

    while !pending.is_empty() {
        let output = store.batch_get(&pending)?;

        for (table, items) in output.responses {
            result.items.entry(table).or_default().extend(items);
        }

        // Subsequent rounds carry only what the backend did not process.
        pending = output.unprocessed_keys;
        if !pending.is_empty() {
            debug!(
                tables = pending.len(),
                "retrying unprocessed read keys"
            );
        }
    }

    Ok(result)
}
