//!
//! Scan request construction.
//!
//! Pure translation from a caller-supplied [`ScanExpression`] to the store's
//! scan request shape, including splitting one logical scan into
//! parallel segment requests. No scan call exists on the [`Store`]
//! surface; issuing the requests is the caller's concern.
//!
//! [`Store`]: crate::store::Store

use crate::condition::{ConditionMap, ConditionalOperator};
use crate::config::MapperConfig;
use crate::schema::Schema;
use crate::value::{Key, Value};
use crate::{Error, Result};
use std::collections::HashMap;

/// A caller-facing description of a table scan.
#[derive(Clone, Debug, Default)]
pub struct ScanExpression {
    filter_expression: Option<String>,
    expression_attribute_names: Option<HashMap<String, String>>,
    expression_attribute_values: Option<HashMap<String, Value>>,
    scan_filter: Option<ConditionMap>,
    conditional_operator: Option<ConditionalOperator>,
    exclusive_start_key: Option<Key>,
    limit: Option<u32>,
    segment: Option<u32>,
    total_segments: Option<u32>,
}

impl ScanExpression {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter expression applied server-side to scanned items.
    pub fn with_filter_expression(mut self, expression: impl Into<String>) -> Self {
        self.filter_expression = Some(expression.into());
        self
    }

    /// Substitution names used by the filter expression.
    pub fn with_expression_attribute_names(mut self, names: HashMap<String, String>) -> Self {
        self.expression_attribute_names = Some(names);
        self
    }

    /// Substitution values used by the filter expression.
    pub fn with_expression_attribute_values(mut self, values: HashMap<String, Value>) -> Self {
        self.expression_attribute_values = Some(values);
        self
    }

    /// Legacy per-attribute scan filter.
    pub fn with_scan_filter(mut self, filter: ConditionMap) -> Self {
        self.scan_filter = Some(filter);
        self
    }

    /// Combinator joining the scan filter's conditions.
    pub fn with_conditional_operator(mut self, operator: ConditionalOperator) -> Self {
        self.conditional_operator = Some(operator);
        self
    }

    /// Resume the scan after this key.
    pub fn with_exclusive_start_key(mut self, key: Key) -> Self {
        self.exclusive_start_key = Some(key);
        self
    }

    /// Maximum number of items evaluated per page.
    pub fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Address one segment of a parallel scan directly.
    pub fn with_segment(mut self, segment: u32, total_segments: u32) -> Self {
        self.segment = Some(segment);
        self.total_segments = Some(total_segments);
        self
    }
}

/// The fully resolved scan request for one physical table.
#[derive(Clone, Debug)]
pub struct ScanRequest {
    pub table_name: String,
    pub filter_expression: Option<String>,
    pub expression_attribute_names: Option<HashMap<String, String>>,
    pub expression_attribute_values: Option<HashMap<String, Value>>,
    pub scan_filter: Option<ConditionMap>,
    pub conditional_operator: Option<ConditionalOperator>,
    pub exclusive_start_key: Option<Key>,
    pub limit: Option<u32>,
    pub segment: Option<u32>,
    pub total_segments: Option<u32>,
}

/// Build the scan request for `schema`'s table from an expression.
///
/// Every expression field passes through unchanged; only the physical table
/// name is resolved here.
pub fn scan_request(schema: &Schema, expression: &ScanExpression, config: &MapperConfig) -> ScanRequest {
    ScanRequest {
        table_name: schema.resolve_table_name(None, config),
        filter_expression: expression.filter_expression.clone(),
        expression_attribute_names: expression.expression_attribute_names.clone(),
        expression_attribute_values: expression.expression_attribute_values.clone(),
        scan_filter: expression.scan_filter.clone(),
        conditional_operator: expression.conditional_operator,
        exclusive_start_key: expression.exclusive_start_key.clone(),
        limit: expression.limit,
        segment: expression.segment,
        total_segments: expression.total_segments,
    }
}

/// Build the segment requests for a parallel scan of `schema`'s table.
///
/// Produces `total_segments` requests sharing the expression's filters and
/// limit, one per segment index. Segment assignments from the expression and
/// any exclusive start key are discarded: each segment starts from the
/// beginning of its own partition space.
///
/// # Errors
/// `Error::Configuration` if `total_segments` is zero.
pub fn parallel_scan_requests(
    schema: &Schema,
    expression: &ScanExpression,
    total_segments: u32,
    config: &MapperConfig,
) -> Result<Vec<ScanRequest>> {
    if total_segments == 0 {
        return Err(Error::Configuration(
            "a parallel scan needs at least one segment".to_string(),
        ));
    }

    let requests = (0..total_segments)
        .map(|segment| {
            let mut request = scan_request(schema, expression, config);
            request.exclusive_start_key = None;
            request.segment = Some(segment);
            request.total_segments = Some(total_segments);
            request
        })
        .collect();

    Ok(requests)
}
