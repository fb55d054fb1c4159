//!
//! The mapper facade: owns a store handle and a configuration, and wires
//! the schema, save, batch, and scan components together behind one
//! object-level API.

use crate::batch_read::{load_batches, KeyTemplate, LoadResult};
use crate::batch_write::write_batches;
use crate::config::MapperConfig;
use crate::request::{FailedBatch, WriteBatch, WriteRequest};
use crate::save::{SaveHandler, SaveOperation, SaveRequest};
use crate::scan::{parallel_scan_requests, scan_request, ScanExpression, ScanRequest};
use crate::schema::{Mapped, Schema};
use crate::store::Store;
use crate::transform::{transform_updates, AttributeTransformer, TransformContext};
use crate::value::{Item, Key, Value};
use crate::Result;

/// Object-mapping facade over a [`Store`].
///
/// A mapper is cheap state: a store handle, a configuration, and an
/// optional attribute transformer. All object semantics come from the
/// [`Mapped`] implementations of the types passed through it.
pub struct Mapper {
    store: Box<dyn Store>,
    config: MapperConfig,
    transformer: Option<Box<dyn AttributeTransformer>>,
}

impl Mapper {
    /// A mapper over `store` with the default configuration.
    pub fn new(store: Box<dyn Store>) -> Self {
        Self::with_config(store, MapperConfig::new())
    }

    /// A mapper over `store` with an explicit configuration.
    pub fn with_config(store: Box<dyn Store>, config: MapperConfig) -> Self {
        Self {
            store,
            config,
            transformer: None,
        }
    }

    /// Install an attribute transformer, applied to values on their way
    /// into the store.
    pub fn with_transformer(mut self, transformer: Box<dyn AttributeTransformer>) -> Self {
        self.transformer = Some(transformer);
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &MapperConfig {
        &self.config
    }

    /// The underlying store.
    pub fn store(&self) -> &dyn Store {
        self.store.as_ref()
    }

    /// The physical table name for type `T` under this configuration.
    pub fn table_name<T: Mapped>(&self) -> String {
        T::schema().resolve_table_name(None, &self.config)
    }

    /// The physical table name for a specific instance, honoring its
    /// per-instance override.
    pub fn table_name_for<T: Mapped>(&self, object: &T) -> String {
        T::schema().resolve_table_name(object.table_override().as_deref(), &self.config)
    }

    /// Build a [`Key`] for type `T` from raw hash and range values.
    pub fn key_from_values<T: Mapped>(&self, hash: Value, range: Option<Value>) -> Result<Key> {
        T::schema().key_from_values(hash, range)
    }

    /// Run the save protocol for `object`, committing through `handler`.
    ///
    /// If a transformer is installed, the handler's commit sees the
    /// transformed update map.
    pub fn save<T: Mapped>(&self, object: &T, handler: &mut dyn SaveHandler) -> Result<()> {
        let schema = T::schema();
        let operation = SaveOperation::new(
            &schema,
            object.to_item(),
            object.table_override().as_deref(),
            &self.config,
        )?;

        match &self.transformer {
            Some(transformer) => {
                let mut transforming = TransformingHandler {
                    inner: handler,
                    schema: &schema,
                    transformer: transformer.as_ref(),
                };
                operation.execute(&mut transforming)?;
            }
            None => {
                operation.execute(handler)?;
            }
        }
        Ok(())
    }

    /// Batch-put the given objects, grouped by physical table.
    ///
    /// Version attributes and save hooks do not participate here; each
    /// object is encoded wholesale into a put request. Store-level
    /// failures come back as [`FailedBatch`] records.
    ///
    /// # Errors
    /// `Error::Schema` / `Error::MalformedItem` if an object cannot
    /// produce a complete key.
    pub fn batch_save<T: Mapped>(&mut self, objects: &[T]) -> Result<Vec<FailedBatch>> {
        let schema = T::schema();
        let mut batch = WriteBatch::new();
        for object in objects {
            let mut item = object.to_item();
            // Validates the key is addressable before anything is sent
            schema.key_of(&item)?;
            if let Some(transformer) = &self.transformer {
                item = self.transform_item(&schema, object, item, transformer.as_ref());
            }
            batch
                .entry(self.table_name_for(object))
                .or_default()
                .push(WriteRequest::Put(item));
        }
        Ok(write_batches(self.store.as_mut(), batch))
    }

    /// Batch-delete the items addressed by the given objects' keys.
    pub fn batch_delete<T: Mapped>(&mut self, objects: &[T]) -> Result<Vec<FailedBatch>> {
        let schema = T::schema();
        let mut batch = WriteBatch::new();
        for object in objects {
            let key = schema.key_of(&object.to_item())?;
            batch
                .entry(self.table_name_for(object))
                .or_default()
                .push(WriteRequest::Delete(key));
        }
        Ok(write_batches(self.store.as_mut(), batch))
    }

    /// Issue a raw write batch through the coordinator.
    pub fn write_batches(&mut self, batch: WriteBatch) -> Vec<FailedBatch> {
        write_batches(self.store.as_mut(), batch)
    }

    /// Batch-load the items addressed by the given templates.
    pub fn batch_load(&mut self, templates: &[KeyTemplate]) -> Result<LoadResult> {
        load_batches(self.store.as_mut(), templates, &self.config)
    }

    /// Batch-load using key-bearing objects as templates.
    pub fn batch_load_objects<T: Mapped>(&mut self, objects: &[T]) -> Result<LoadResult> {
        let templates = objects
            .iter()
            .map(KeyTemplate::from_object)
            .collect::<Result<Vec<_>>>()?;
        self.batch_load(&templates)
    }

    /// Build the scan request for type `T` from an expression.
    pub fn scan_request<T: Mapped>(&self, expression: &ScanExpression) -> ScanRequest {
        scan_request(&T::schema(), expression, &self.config)
    }

    /// Build the parallel-scan segment requests for type `T`.
    pub fn parallel_scan_requests<T: Mapped>(
        &self,
        expression: &ScanExpression,
        total_segments: u32,
    ) -> Result<Vec<ScanRequest>> {
        parallel_scan_requests(&T::schema(), expression, total_segments, &self.config)
    }

    /// Apply the transformer to a full put item, leaving key attributes
    /// untouched so the item stays addressable.
    fn transform_item<T: Mapped>(
        &self,
        schema: &Schema,
        object: &T,
        item: Item,
        transformer: &dyn AttributeTransformer,
    ) -> Item {
        let table_name = self.table_name_for(object);
        let transformed = transformer.transform(&TransformContext {
            schema,
            table_name: &table_name,
            values: &item,
        });

        let mut result = item;
        for (name, value) in transformed {
            let is_key = schema.attribute(&name).is_some_and(|attr| attr.is_key());
            if !is_key {
                result.insert(name, value);
            }
        }
        result
    }
}

/// Wraps a caller handler so the commit step sees transformed updates.
struct TransformingHandler<'a> {
    inner: &'a mut dyn SaveHandler,
    schema: &'a Schema,
    transformer: &'a dyn AttributeTransformer,
}

impl SaveHandler for TransformingHandler<'_> {
    fn on_key_attribute(&mut self, name: &str, value: &Value) -> Result<()> {
        self.inner.on_key_attribute(name, value)
    }

    fn on_null_attribute(&mut self, name: &str) -> Result<()> {
        self.inner.on_null_attribute(name)
    }

    fn commit(&mut self, request: &SaveRequest) -> Result<()> {
        let updates = transform_updates(
            self.schema,
            &request.table_name,
            self.transformer,
            &request.key,
            &request.updates,
        );
        let transformed = SaveRequest {
            updates,
            ..request.clone()
        };
        self.inner.commit(&transformed)
    }
}
