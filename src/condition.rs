//!
//! Attribute-existence conditions and the merge rules for combining
//! engine-derived conditions with caller-supplied ones.

use crate::value::Value;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// A map from attribute name to the condition asserted on it.
pub type ConditionMap = HashMap<String, ExpectedCondition>;

/// An existence/value assertion on a single attribute.
///
/// Whether a condition is internal (engine-derived, e.g. an
/// optimistic-lock version check) or user-supplied is a property of the
/// map it travels in, not of the condition itself.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExpectedCondition {
    value: Option<Value>,
    exists: Option<bool>,
}

impl ExpectedCondition {
    /// Assert the attribute equals `value`.
    pub fn eq(value: Value) -> Self {
        Self {
            value: Some(value),
            exists: None,
        }
    }

    /// Assert the attribute is present.
    pub fn exists() -> Self {
        Self {
            value: None,
            exists: Some(true),
        }
    }

    /// Assert the attribute is absent.
    pub fn not_exists() -> Self {
        Self {
            value: None,
            exists: Some(false),
        }
    }

    /// The comparison value, if this is an equality assertion.
    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// The existence assertion, if any.
    pub fn existence(&self) -> Option<bool> {
        self.exists
    }
}

/// The logical combinator joining the conditions of a merged map.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConditionalOperator {
    And,
    Or,
}

impl fmt::Display for ConditionalOperator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConditionalOperator::And => write!(f, "AND"),
            ConditionalOperator::Or => write!(f, "OR"),
        }
    }
}

impl FromStr for ConditionalOperator {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "AND" => Ok(ConditionalOperator::And),
            "OR" => Ok(ConditionalOperator::Or),
            other => Err(Error::Configuration(format!(
                "unknown conditional operator: {other}"
            ))),
        }
    }
}

/// Merge an internal condition map with a user-supplied one under
/// `operator`.
///
/// Only [`ConditionalOperator::And`] is supported; any other combinator
/// is a configuration error. The merge starts from the internal
/// conditions (or an empty map if absent) and overlays the user
/// conditions, so where both maps assert on the same attribute the
/// user-supplied condition wins. A user-supplied condition is never
/// silently dropped. The result is always a concrete map.
pub fn merge_conditions(
    internal: Option<&ConditionMap>,
    user: Option<&ConditionMap>,
    operator: ConditionalOperator,
) -> Result<ConditionMap> {
    if operator != ConditionalOperator::And {
        return Err(Error::Configuration(format!(
            "unsupported conditional operator: {operator}"
        )));
    }

    let mut merged = internal.cloned().unwrap_or_default();
    if let Some(user) = user {
        merged.extend(user.iter().map(|(k, v)| (k.clone(), v.clone())));
    }

    Ok(merged)
}
