//! Union schema: the first variant that accepts wins

use serde_json::Value;

use crate::foundation::{
    Failure, IssueCode, Outcome, SchemaDefinition, Validate, ValidationIssue, ValueKind,
};
use crate::schema::{Node, Schema};

/// Tries each variant in declaration order.
///
/// When every variant fails, one `invalid_union` issue is reported at the
/// union's own path. Its `nested` list holds every variant's issues, each
/// tagged with a `variant` param.
///
/// # Examples
///
/// ```
/// use contour::prelude::*;
/// use serde_json::json;
///
/// let ab = union([literal("a").into_schema(), literal("b").into_schema()]);
/// assert_eq!(ab.parse(&json!("b")).unwrap(), json!("b"));
///
/// let error = ab.parse(&json!("c")).unwrap_err();
/// assert_eq!(error.issues()[0].code, IssueCode::InvalidUnion);
/// assert_eq!(error.issues()[0].nested.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct UnionSchema {
    options: Vec<Schema>,
}

impl UnionSchema {
    pub fn options(&self) -> &[Schema] {
        &self.options
    }

    /// Appends another variant.
    #[must_use = "builder methods must be chained or built"]
    pub fn or(mut self, other: impl Validate) -> Self {
        self.options.push(other.into_schema());
        self
    }
}

impl Validate for UnionSchema {
    fn validate(&self, input: Option<&Value>) -> Outcome {
        let mut nested = Vec::new();

        for (variant, option) in self.options.iter().enumerate() {
            match option.validate(input) {
                Ok(output) => return Ok(output),
                Err(Failure::Invalid(issues)) => nested.extend(
                    issues
                        .into_iter()
                        .map(|issue| issue.with_param("variant", variant.to_string())),
                ),
                Err(aborted @ Failure::Aborted(_)) => return Err(aborted),
            }
        }

        Err(ValidationIssue::new(IssueCode::InvalidUnion, "Invalid input")
            .with_received(ValueKind::of(input).as_str())
            .with_nested(nested)
            .into())
    }

    fn definition(&self) -> SchemaDefinition {
        SchemaDefinition::Union {
            options: self.options.iter().map(Schema::definition).collect(),
        }
    }

    fn into_schema(self) -> Schema {
        Schema::new(Node::Union(self))
    }

    fn accepts_missing(&self) -> bool {
        self.options.iter().any(Schema::accepts_missing)
    }
}

/// Creates a union of `options`.
pub fn union<I>(options: I) -> UnionSchema
where
    I: IntoIterator<Item = Schema>,
{
    UnionSchema {
        options: options.into_iter().collect(),
    }
}
