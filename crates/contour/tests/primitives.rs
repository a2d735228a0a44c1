//! Leaf schemas: kinds, constraint chaining and fail-fast reporting.

use contour::prelude::*;
use pretty_assertions::assert_eq;
use rstest::rstest;
use serde_json::{Value, json};

// ============================================================================
// IDENTITY: an unconstrained leaf returns its input unchanged
// ============================================================================

#[rstest]
#[case(string().into_schema(), json!("hello"))]
#[case(string().into_schema(), json!(""))]
#[case(number().into_schema(), json!(42))]
#[case(number().into_schema(), json!(-1.5))]
#[case(boolean().into_schema(), json!(false))]
#[case(null().into_schema(), json!(null))]
#[case(any().into_schema(), json!({ "a": [1, 2] }))]
#[case(unknown().into_schema(), json!([null]))]
fn test_unconstrained_leaf_is_identity(#[case] schema: Schema, #[case] input: Value) {
    assert_eq!(schema.parse(&input).unwrap(), input);
}

// ============================================================================
// KIND MISMATCH: invalid_type with both kinds recorded
// ============================================================================

#[rstest]
#[case(string().into_schema(), json!(1), "string", "number")]
#[case(number().into_schema(), json!("1"), "number", "string")]
#[case(boolean().into_schema(), json!(0), "boolean", "number")]
#[case(null().into_schema(), json!(false), "null", "boolean")]
#[case(never().into_schema(), json!("x"), "never", "string")]
#[case(number().into_schema(), json!([1]), "number", "array")]
#[case(string().into_schema(), json!({}), "string", "object")]
fn test_kind_mismatch(
    #[case] schema: Schema,
    #[case] input: Value,
    #[case] expected: &str,
    #[case] received: &str,
) {
    let error = schema.parse(&input).unwrap_err();
    assert_eq!(error.len(), 1);

    let issue = &error.issues()[0];
    assert_eq!(issue.code, IssueCode::InvalidType);
    assert_eq!(issue.expected.as_deref(), Some(expected));
    assert_eq!(issue.received.as_deref(), Some(received));
    assert!(issue.path.is_empty());
}

#[rstest]
#[case(string().into_schema())]
#[case(number().into_schema())]
#[case(boolean().into_schema())]
#[case(null().into_schema())]
fn test_undefined_rejected_by_plain_leaves(#[case] schema: Schema) {
    let error = schema.parse_opt(None).unwrap_err();
    assert_eq!(error.issues()[0].received.as_deref(), Some("undefined"));
}

// ============================================================================
// CONSTRAINTS
// ============================================================================

#[rstest]
#[case(string().email(), "ada@example.com", None)]
#[case(string().email(), "ada", Some("Invalid email"))]
#[case(string().url(), "https://example.com", None)]
#[case(string().uuid(), "not-a-uuid", Some("Invalid uuid"))]
#[case(string().ip(), "::1", None)]
#[case(string().datetime(), "2024-01-01", Some("Invalid datetime"))]
#[case(string().date(), "2024-01-01", None)]
#[case(string().date(), "2023-02-31", Some("Invalid date"))]
#[case(string().nonempty(), "", Some("String must contain at least 1 character(s)"))]
#[case(string().length(2), "abc", Some("String must contain exactly 2 character(s)"))]
#[case(string().includes("@"), "user", Some("Invalid input: must include \"@\""))]
fn test_string_constraints(
    #[case] schema: StringSchema,
    #[case] input: &str,
    #[case] message: Option<&str>,
) {
    let result = schema.safe_parse(&json!(input));
    assert_eq!(
        result.error().map(|error| error.issues()[0].message.to_string()),
        message.map(str::to_owned)
    );
}

#[test]
fn test_primitive_constraints_fail_fast() {
    let schema = string().min(8).regex(regex::Regex::new("[0-9]").unwrap()).email();
    let error = schema.parse(&json!("abc")).unwrap_err();
    assert_eq!(error.len(), 1);
    assert_eq!(error.issues()[0].code, IssueCode::TooSmall);
}

#[test]
fn test_gt_lt_are_exclusive() {
    let schema = number().gt(0.0).lt(1.0);
    assert!(schema.parse(&json!(0)).is_err());
    assert!(schema.parse(&json!(1)).is_err());
    assert!(schema.parse(&json!(f64::MIN_POSITIVE)).is_ok());
    assert!(schema.parse(&json!(0.999_999_999)).is_ok());
}

#[test]
fn test_number_message_override() {
    let schema = number().int().message("Whole numbers only");
    let error = schema.parse(&json!(1.5)).unwrap_err();
    assert_eq!(error.issues()[0].message, "Whole numbers only");
}

#[test]
fn test_union_of_literals() {
    let schema = union([literal("a").into_schema(), literal("b").into_schema()]);
    assert_eq!(schema.parse(&json!("b")).unwrap(), json!("b"));
    assert!(schema.safe_parse(&json!("c")).is_failure());
}

#[test]
fn test_enumeration_options() {
    let colors = enumeration(["red", "green", "blue"]);
    assert_eq!(colors.options().len(), 3);
    assert!(colors.parse(&json!("green")).is_ok());
    assert_eq!(
        colors.parse(&json!("pink")).unwrap_err().issues()[0].code,
        IssueCode::InvalidEnumValue
    );
}
