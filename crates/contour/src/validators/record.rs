//! Record schema: any set of keys, one value schema

use serde_json::{Map, Value};

use super::{collect, finish};
use crate::foundation::{
    Failure, Outcome, PathSegment, SchemaDefinition, Validate, ValidationIssue, kind,
};
use crate::schema::{Node, Schema};

/// Validates every own key of an object against one shared value schema.
///
/// # Examples
///
/// ```
/// use contour::prelude::*;
/// use serde_json::json;
///
/// let scores = record(number().int());
/// assert!(scores.parse(&json!({ "ada": 3, "bob": 4 })).is_ok());
///
/// let error = scores.parse(&json!({ "ada": 3, "bob": 4.5 })).unwrap_err();
/// assert_eq!(error.issues()[0].path.to_string(), "bob");
/// ```
#[derive(Debug, Clone)]
pub struct RecordSchema {
    key: Option<Schema>,
    value: Schema,
}

impl RecordSchema {
    pub fn new(value: impl Validate) -> Self {
        Self {
            key: None,
            value: value.into_schema(),
        }
    }

    /// Validates each key too; the key schema must produce a string.
    ///
    /// Two keys that transform to the same output key are reported at the
    /// later key instead of overwriting the earlier value.
    #[must_use = "builder methods must be chained or built"]
    pub fn keys(mut self, key: impl Validate) -> Self {
        self.key = Some(key.into_schema());
        self
    }

    pub fn value_schema(&self) -> &Schema {
        &self.value
    }

    fn validate_key(
        &self,
        key: &str,
        issues: &mut Vec<ValidationIssue>,
    ) -> Result<Option<String>, Failure> {
        let Some(schema) = &self.key else {
            return Ok(Some(key.to_owned()));
        };

        let input = Value::String(key.to_owned());
        let segment = || PathSegment::key(key);
        match collect(issues, schema.validate(Some(&input)), segment)? {
            Some(Value::String(out)) => Ok(Some(out)),
            Some(other) => {
                issues.push(
                    ValidationIssue::invalid_type("string", Some(&other)).prefixed(segment()),
                );
                Ok(None)
            }
            None => Ok(None),
        }
    }
}

impl Validate for RecordSchema {
    fn validate(&self, input: Option<&Value>) -> Outcome {
        let Some(object) = kind::as_plain_object(input) else {
            return Err(ValidationIssue::invalid_type("object", input).into());
        };

        let mut issues = Vec::new();
        let mut output = Map::with_capacity(object.len());

        for (key, value) in object {
            let out_key = self.validate_key(key, &mut issues)?;
            let outcome = self.value.validate(Some(value));
            let out = collect(&mut issues, outcome, || PathSegment::key(key.as_str()))?;
            let Some(out_key) = out_key else {
                continue;
            };
            if output.contains_key(&out_key) {
                issues.push(
                    ValidationIssue::custom("Duplicate key after transform")
                        .with_param("key", out_key)
                        .prefixed(PathSegment::key(key.as_str())),
                );
            } else if let Some(out) = out {
                output.insert(out_key, out);
            }
        }

        finish(issues, Value::Object(output))
    }

    fn definition(&self) -> SchemaDefinition {
        SchemaDefinition::Record {
            key: self.key.as_ref().map(|key| Box::new(key.definition())),
            value: Box::new(self.value.definition()),
        }
    }

    fn into_schema(self) -> Schema {
        Schema::new(Node::Record(self))
    }
}

/// Creates a record schema whose values match `value`.
pub fn record(value: impl Validate) -> RecordSchema {
    RecordSchema::new(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::{IssueCode, ValidateExt};
    use crate::validators::{number, string};
    use serde_json::json;

    #[test]
    fn test_aggregates_across_keys() {
        let error = record(number())
            .parse(&json!({ "a": "x", "b": 1, "c": null }))
            .unwrap_err();
        let paths: Vec<_> = error.issues().iter().map(|i| i.path.to_string()).collect();
        assert_eq!(paths, ["a", "c"]);
    }

    #[test]
    fn test_rejects_arrays_and_null() {
        for input in [json!([1]), json!(null)] {
            let error = record(number()).parse(&input).unwrap_err();
            assert_eq!(error.issues()[0].code, IssueCode::InvalidType);
        }
    }

    #[test]
    fn test_key_schema() {
        let schema = record(number()).keys(string().min(2));
        assert!(schema.parse(&json!({ "ab": 1 })).is_ok());

        let error = schema.parse(&json!({ "a": 1, "bc": "x" })).unwrap_err();
        assert_eq!(error.len(), 2);
        assert_eq!(error.issues()[0].code, IssueCode::TooSmall);
        assert_eq!(error.issues()[0].path.to_string(), "a");
        assert_eq!(error.issues()[1].path.to_string(), "bc");
    }

    #[test]
    fn test_key_transform_renames_output() {
        let schema = record(number()).keys(string().to_uppercase());
        assert_eq!(schema.parse(&json!({ "a": 1 })).unwrap(), json!({ "A": 1 }));
    }

    #[test]
    fn test_key_transform_collision_is_reported() {
        let schema = record(number()).keys(string().to_lowercase());
        let error = schema.parse(&json!({ "A": 1, "a": 2 })).unwrap_err();

        assert_eq!(error.len(), 1);
        let issue = &error.issues()[0];
        assert_eq!(issue.code, IssueCode::Custom);
        assert_eq!(issue.message, "Duplicate key after transform");
        assert_eq!(issue.path.to_string(), "a");
        assert_eq!(issue.param("key"), Some("a"));
    }

    #[test]
    fn test_collision_with_invalid_value_reports_both() {
        let schema = record(number()).keys(string().to_lowercase());
        let error = schema.parse(&json!({ "A": 1, "a": "x" })).unwrap_err();
        let codes: Vec<_> = error.issues().iter().map(|i| i.code).collect();
        assert_eq!(codes, [IssueCode::InvalidType, IssueCode::Custom]);
    }

    #[test]
    fn test_non_string_key_output() {
        let schema = record(number()).keys(string().transform(|_| json!(1)));
        let error = schema.parse(&json!({ "a": 1 })).unwrap_err();
        assert_eq!(error.issues()[0].code, IssueCode::InvalidType);
        assert_eq!(error.issues()[0].path.to_string(), "a");
    }
}
