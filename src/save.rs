//!
//! The save protocol: a phased traversal of a schema's attributes
//! against an encoded object, building an update request and notifying
//! a capability handler before the final commit step.
//!
//! The traversal walks attributes in schema order. Key attributes are
//! announced through `on_key_attribute` and recorded into the request
//! key, never into the update map; a missing value for an
//! auto-generatable key is synthesized before the hook fires. Non-key
//! attributes with no value are announced through `on_null_attribute`
//! and produce no update entry, which models a clear-on-save semantic.
//! Version attributes are engine-managed: they are incremented (or
//! initialized) and their previous state becomes an internal condition
//! for the commit. `commit` runs exactly once, after every attribute has
//! been visited.

use crate::condition::{ConditionMap, ExpectedCondition};
use crate::config::MapperConfig;
use crate::schema::Schema;
use crate::value::{AttributeUpdate, Item, Key, Value};
use crate::{Error, Result};
use std::collections::HashMap;
use tracing::trace;
use uuid::Uuid;

/// The lifecycle of a save operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SavePhase {
    NotStarted,
    Traversing,
    ReadyToCommit,
    Committed,
}

/// The request a save traversal accumulates and hands to `commit`.
#[derive(Clone, Debug, Default)]
pub struct SaveRequest {
    /// The resolved physical table name.
    pub table_name: String,
    /// The key attributes of the object being saved, including any
    /// synthesized values.
    pub key: Key,
    /// The update entries for non-key attributes with values.
    pub updates: HashMap<String, AttributeUpdate>,
    /// Engine-derived conditions (e.g. optimistic-lock checks), to be
    /// merged with any user-supplied conditions by the committer.
    pub internal_conditions: ConditionMap,
}

/// Capability interface notified during a save traversal.
///
/// The two observation hooks default to no-ops; `commit` is the one
/// required extension point and executes the low-level request.
pub trait SaveHandler {
    /// A key attribute was visited, with its (possibly synthesized)
    /// encoded value.
    fn on_key_attribute(&mut self, _name: &str, _value: &Value) -> Result<()> {
        Ok(())
    }

    /// A non-key attribute was visited with no value; no update entry
    /// was recorded for it.
    fn on_null_attribute(&mut self, _name: &str) -> Result<()> {
        Ok(())
    }

    /// Execute the low-level request. Called exactly once per traversal,
    /// after all attributes have been visited.
    fn commit(&mut self, request: &SaveRequest) -> Result<()>;
}

/// A single save traversal over one object.
///
/// Built from a schema and the object's encoded attribute map, consumed
/// by [`execute`](Self::execute). Consuming the operation is what
/// guarantees the commit step cannot run twice.
pub struct SaveOperation<'a> {
    schema: &'a Schema,
    object: Item,
    phase: SavePhase,
    request: SaveRequest,
}

impl<'a> SaveOperation<'a> {
    /// Prepare a save of `object` (an encoded attribute map) under
    /// `schema`.
    ///
    /// # Errors
    /// `Error::Schema` if the schema declares no hash key; a save can
    /// never address an item without one.
    pub fn new(
        schema: &'a Schema,
        object: Item,
        instance_override: Option<&str>,
        config: &MapperConfig,
    ) -> Result<Self> {
        if schema.hash_key().is_none() {
            return Err(Error::Schema(format!(
                "no hash key defined for table {}",
                schema.table_name()
            )));
        }

        let table_name = schema.resolve_table_name(instance_override, config);
        Ok(Self {
            schema,
            object,
            phase: SavePhase::NotStarted,
            request: SaveRequest {
                table_name,
                ..SaveRequest::default()
            },
        })
    }

    /// The current lifecycle phase.
    pub fn phase(&self) -> SavePhase {
        self.phase
    }

    /// The resolved physical table name this save targets.
    pub fn table_name(&self) -> &str {
        &self.request.table_name
    }

    /// Run the traversal and commit through `handler`.
    ///
    /// Returns the accumulated request after a successful commit. Any
    /// error from a hook, from the traversal itself, or from the commit
    /// aborts the whole operation.
    pub fn execute(mut self, handler: &mut dyn SaveHandler) -> Result<SaveRequest> {
        self.phase = SavePhase::Traversing;

        for attr in self.schema.attributes() {
            let name = attr.name();
            let value = self.object.get(name).filter(|v| !v.is_null()).cloned();

            if attr.is_key() {
                let value = match value {
                    Some(value) => value,
                    None if attr.is_auto_generated() => {
                        let generated = Value::s(Uuid::new_v4().to_string());
                        trace!(attribute = name, "generated key value");
                        generated
                    }
                    None => {
                        return Err(Error::MalformedItem(format!(
                            "no value for key attribute {name}"
                        )));
                    }
                };
                handler.on_key_attribute(name, &value)?;
                self.request.key.insert(name.to_string(), value);
            } else if attr.is_version() {
                let (next, condition) = next_version(name, value)?;
                self.request
                    .internal_conditions
                    .insert(name.to_string(), condition);
                self.request
                    .updates
                    .insert(name.to_string(), AttributeUpdate::put(next));
            } else {
                match value {
                    Some(value) => {
                        self.request
                            .updates
                            .insert(name.to_string(), AttributeUpdate::put(value));
                    }
                    None => handler.on_null_attribute(name)?,
                }
            }
        }

        self.phase = SavePhase::ReadyToCommit;
        handler.commit(&self.request)?;
        self.phase = SavePhase::Committed;

        Ok(self.request)
    }
}

/// Compute the next version value and the condition guarding the
/// transition: absent versions initialize to 1 guarded by a not-exists
/// check, present versions increment guarded by equality on the old
/// value.
fn next_version(name: &str, current: Option<Value>) -> Result<(Value, ExpectedCondition)> {
    match current {
        None => Ok((Value::n("1"), ExpectedCondition::not_exists())),
        Some(value) => {
            let number: i64 = value
                .as_n()
                .and_then(|n| n.parse().ok())
                .ok_or_else(|| {
                    Error::MalformedItem(format!("version attribute {name} is not numeric"))
                })?;
            Ok((
                Value::n((number + 1).to_string()),
                ExpectedCondition::eq(value),
            ))
        }
    }
}
