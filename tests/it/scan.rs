use crate::helpers::*;
use itemmap::condition::{ConditionMap, ConditionalOperator, ExpectedCondition};
use itemmap::config::MapperConfig;
use itemmap::scan::{parallel_scan_requests, scan_request, ScanExpression};
use itemmap::schema::Mapped;
use itemmap::value::Value;
use std::collections::HashMap;

fn full_expression() -> ScanExpression {
    let mut names = HashMap::new();
    names.insert("#fv".to_string(), "firstValue".to_string());
    let mut values = HashMap::new();
    values.insert(":v".to_string(), Value::s("wanted"));
    let mut filter = ConditionMap::new();
    filter.insert("secondValue".to_string(), ExpectedCondition::exists());

    ScanExpression::new()
        .with_filter_expression("#fv = :v")
        .with_expression_attribute_names(names)
        .with_expression_attribute_values(values)
        .with_scan_filter(filter)
        .with_conditional_operator(ConditionalOperator::And)
        .with_exclusive_start_key(string_item(&[("id", "resume-after")]))
        .with_limit(5)
}

#[test]
fn test_scan_request_passes_expression_through() {
    let schema = VersionedRecord::schema();
    let request = scan_request(&schema, &full_expression(), &MapperConfig::new());

    assert_eq!(request.table_name, "mapper-test");
    assert_eq!(request.filter_expression.as_deref(), Some("#fv = :v"));
    assert_eq!(
        request.expression_attribute_names.as_ref().expect("names")["#fv"],
        "firstValue"
    );
    assert_eq!(
        request.expression_attribute_values.as_ref().expect("values")[":v"],
        Value::s("wanted")
    );
    assert_eq!(
        request.scan_filter.as_ref().expect("filter")["secondValue"],
        ExpectedCondition::exists()
    );
    assert_eq!(request.conditional_operator, Some(ConditionalOperator::And));
    assert_eq!(
        request.exclusive_start_key,
        Some(string_item(&[("id", "resume-after")]))
    );
    assert_eq!(request.limit, Some(5));
    assert_eq!(request.segment, None);
    assert_eq!(request.total_segments, None);
}

#[test]
fn test_scan_request_applies_table_prefix() {
    let schema = VersionedRecord::schema();
    let config = MapperConfig::new().with_table_name_prefix("staging-");
    let request = scan_request(&schema, &ScanExpression::new(), &config);
    assert_eq!(request.table_name, "staging-mapper-test");
}

#[test]
fn test_parallel_scan_requests_segment_the_table() {
    let schema = VersionedRecord::schema();
    let requests = parallel_scan_requests(&schema, &full_expression(), 2, &MapperConfig::new())
        .expect("parallel scan");

    assert_eq!(requests.len(), 2);
    for (segment, request) in requests.iter().enumerate() {
        assert_eq!(request.table_name, "mapper-test");
        assert_eq!(request.segment, Some(segment as u32));
        assert_eq!(request.total_segments, Some(2));
        // Segments share the filters but never inherit a start key
        assert_eq!(request.exclusive_start_key, None);
        assert_eq!(request.filter_expression.as_deref(), Some("#fv = :v"));
        assert_eq!(request.limit, Some(5));
        assert_eq!(request.conditional_operator, Some(ConditionalOperator::And));
    }
}
