//!
//! The attribute-transformation seam: a hook for rewriting encoded
//! attribute values on their way into and out of the store, e.g. for
//! field-level encryption or normalization.

use crate::schema::Schema;
use crate::value::{AttributeUpdate, Item, Key, UpdateAction};
use std::collections::HashMap;

/// What a transformer sees: the schema and table being written, and the
/// full encoded attribute map (key attributes included, so transforms
/// can derive from them).
pub struct TransformContext<'a> {
    pub schema: &'a Schema,
    pub table_name: &'a str,
    pub values: &'a Item,
}

/// Rewrites encoded attribute values.
///
/// `transform` runs on the way into the store, `untransform` on the way
/// out; the two should be inverses for attributes they touch.
/// Attributes absent from the returned map pass through unchanged.
pub trait AttributeTransformer {
    fn transform(&self, context: &TransformContext<'_>) -> Item;
    fn untransform(&self, context: &TransformContext<'_>) -> Item;
}

/// Apply a transformer to an update map.
///
/// The transformer sees the key attributes alongside the update values,
/// but the returned update map never contains an entry for a key
/// attribute: keys address the item and are not updatable. Delete
/// entries pass through untouched; put entries take the transformed
/// value when the transformer produced one.
pub fn transform_updates(
    schema: &Schema,
    table_name: &str,
    transformer: &dyn AttributeTransformer,
    key: &Key,
    updates: &HashMap<String, AttributeUpdate>,
) -> HashMap<String, AttributeUpdate> {
    let mut values: Item = key.clone();
    for (name, update) in updates {
        if update.action == UpdateAction::Put {
            values.insert(name.clone(), update.value.clone());
        }
    }

    let transformed = transformer.transform(&TransformContext {
        schema,
        table_name,
        values: &values,
    });

    updates
        .iter()
        .filter(|(name, _)| {
            schema
                .attribute(name)
                .map_or(true, |attr| !attr.is_key())
                && !key.contains_key(*name)
        })
        .map(|(name, update)| {
            let update = match (update.action, transformed.get(name)) {
                (UpdateAction::Put, Some(value)) => AttributeUpdate::put(value.clone()),
                _ => update.clone(),
            };
            (name.clone(), update)
        })
        .collect()
}
