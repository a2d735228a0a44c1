//! Array schema

use std::borrow::Cow;

use serde_json::Value;

use super::{collect, finish};
use crate::foundation::definition::{ArrayCheck, Constraint};
use crate::foundation::{
    IssueCode, Outcome, PathSegment, SchemaDefinition, Validate, ValidationIssue, kind,
};
use crate::schema::{Node, Schema};

/// Builder and validator for sequences of one element schema.
///
/// Length checks run once on the whole sequence, then every element is
/// validated; all issues are reported together.
///
/// # Examples
///
/// ```
/// use contour::prelude::*;
/// use serde_json::json;
///
/// let error = array(number()).parse(&json!([1, "x", 3, "y"])).unwrap_err();
/// let paths: Vec<_> = error.issues().iter().map(|i| i.path.to_string()).collect();
/// assert_eq!(paths, ["1", "3"]);
/// ```
#[derive(Debug, Clone)]
pub struct ArraySchema {
    element: Schema,
    checks: Vec<Constraint<ArrayCheck>>,
}

impl ArraySchema {
    pub fn new(element: impl Validate) -> Self {
        Self {
            element: element.into_schema(),
            checks: Vec::new(),
        }
    }

    pub fn element(&self) -> &Schema {
        &self.element
    }

    /// Same checks around a different element schema.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_element(mut self, element: impl Validate) -> Self {
        self.element = element.into_schema();
        self
    }

    fn check(mut self, check: ArrayCheck) -> Self {
        self.checks.push(Constraint::new(check));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn min(self, min: usize) -> Self {
        self.check(ArrayCheck::Min { value: min })
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn max(self, max: usize) -> Self {
        self.check(ArrayCheck::Max { value: max })
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn length(self, length: usize) -> Self {
        self.check(ArrayCheck::Length { value: length })
    }

    /// Rejects sequences holding two equal items.
    ///
    /// Reports one `not_unique` issue at the array's path with the index of
    /// the first repeated item.
    #[must_use = "builder methods must be chained or built"]
    pub fn unique(self) -> Self {
        self.check(ArrayCheck::Unique)
    }

    /// Shorthand for `min(1)`.
    #[must_use = "builder methods must be chained or built"]
    pub fn nonempty(self) -> Self {
        self.min(1)
    }

    /// Replaces the message of the most recently added check.
    #[must_use = "builder methods must be chained or built"]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        if let Some(check) = self.checks.last_mut() {
            check.message = Some(message.into());
        }
        self
    }
}

fn first_repeat(items: &[Value]) -> Option<usize> {
    (1..items.len()).find(|&index| items[..index].contains(&items[index]))
}

fn evaluate(check: &ArrayCheck, items: &[Value]) -> Option<ValidationIssue> {
    let len = items.len();
    let (code, message, key, bound) = match *check {
        ArrayCheck::Min { value } if len < value => (
            IssueCode::TooSmall,
            format!("Array must contain at least {value} element(s)"),
            "minimum",
            value,
        ),
        ArrayCheck::Max { value } if len > value => (
            IssueCode::TooBig,
            format!("Array must contain at most {value} element(s)"),
            "maximum",
            value,
        ),
        ArrayCheck::Length { value } if len != value => {
            let (code, key) = if len < value {
                (IssueCode::TooSmall, "minimum")
            } else {
                (IssueCode::TooBig, "maximum")
            };
            (
                code,
                format!("Array must contain exactly {value} element(s)"),
                key,
                value,
            )
        }
        ArrayCheck::Unique => {
            return first_repeat(items).map(|index| {
                ValidationIssue::new(IssueCode::NotUnique, "Array items must be unique")
                    .with_param("index", index.to_string())
            });
        }
        _ => return None,
    };

    Some(
        ValidationIssue::new(code, message)
            .with_param(key, bound.to_string())
            .with_param("type", "array"),
    )
}

impl Validate for ArraySchema {
    fn validate(&self, input: Option<&Value>) -> Outcome {
        let Some(items) = kind::as_sequence(input) else {
            return Err(ValidationIssue::invalid_type("array", input).into());
        };

        let mut issues: Vec<ValidationIssue> = self
            .checks
            .iter()
            .filter_map(|check| {
                evaluate(&check.kind, items)
                    .map(|issue| issue.with_message_override(check.message.as_ref()))
            })
            .collect();

        let mut output = Vec::with_capacity(items.len());
        for (index, item) in items.iter().enumerate() {
            let outcome = self.element.validate(Some(item));
            let out = collect(&mut issues, outcome, || PathSegment::Index(index))?;
            output.push(out.unwrap_or(Value::Null));
        }

        finish(issues, Value::Array(output))
    }

    fn definition(&self) -> SchemaDefinition {
        SchemaDefinition::Array {
            element: Box::new(self.element.definition()),
            checks: self.checks.clone(),
        }
    }

    fn into_schema(self) -> Schema {
        Schema::new(Node::Array(self))
    }
}

/// Creates an array schema over `element`.
pub fn array(element: impl Validate) -> ArraySchema {
    ArraySchema::new(element)
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::ValidateExt;
    use crate::validators::{number, string};
    use serde_json::json;

    #[test]
    fn test_valid_array_round_trips() {
        let input = json!(["a", "b"]);
        assert_eq!(array(string()).parse(&input).unwrap(), input);
    }

    #[test]
    fn test_length_issue_reported_with_element_issues() {
        let schema = array(number()).min(3);
        let error = schema.parse(&json!(["x"])).unwrap_err();
        assert_eq!(error.len(), 2);
        assert_eq!(error.issues()[0].code, IssueCode::TooSmall);
        assert!(error.issues()[0].path.is_empty());
        assert_eq!(error.issues()[1].path.to_string(), "0");
    }

    #[test]
    fn test_bounds_and_messages() {
        let schema = array(number()).nonempty().message("Pick one").max(2);
        assert_eq!(
            schema.parse(&json!([])).unwrap_err().issues()[0].message,
            "Pick one"
        );
        assert_eq!(
            schema.parse(&json!([1, 2, 3])).unwrap_err().issues()[0].message,
            "Array must contain at most 2 element(s)"
        );
        assert!(array(number()).length(2).parse(&json!([1])).is_err());
    }

    #[test]
    fn test_unique_reports_first_repeat() {
        let schema = array(number()).unique();
        assert!(schema.parse(&json!([1, 2, 3])).is_ok());

        let error = schema.parse(&json!([1, 2, 1, 2])).unwrap_err();
        assert_eq!(error.len(), 1);
        let issue = &error.issues()[0];
        assert_eq!(issue.code, IssueCode::NotUnique);
        assert_eq!(issue.message, "Array items must be unique");
        assert_eq!(issue.param("index"), Some("2"));
        assert!(issue.path.is_empty());
    }

    #[test]
    fn test_unique_compares_whole_items() {
        let schema = array(crate::validators::any()).unique();
        assert!(schema.parse(&json!([{ "a": 1 }, { "a": 2 }])).is_ok());
        assert!(schema.parse(&json!([[1], [1]])).is_err());
        assert!(schema.parse(&json!([])).is_ok());
    }

    #[test]
    fn test_rejects_objects() {
        let error = array(number()).parse(&json!({ "0": 1 })).unwrap_err();
        assert_eq!(error.issues()[0].expected.as_deref(), Some("array"));
    }

    #[test]
    fn test_element_outputs_are_collected() {
        let schema = array(string().trim());
        assert_eq!(
            schema.parse(&json!([" a ", "b "])).unwrap(),
            json!(["a", "b"])
        );
    }
}
