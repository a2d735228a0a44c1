//! Intersection schema: every member must accept

use serde_json::Value;

use crate::foundation::{
    Failure, IssueCode, Outcome, Path, PathSegment, SchemaDefinition, Validate, ValidationIssue,
};
use crate::schema::{Node, Schema};

/// Validates the same input against every member.
///
/// All members run even after one fails, and their issues are reported
/// together in member order. When every member accepts, the outputs are
/// merged: objects key by key, arrays of equal length item by item, and
/// anything else only when equal. Outputs that cannot be merged produce one
/// `invalid_intersection_types` issue at the path of the conflict.
///
/// # Examples
///
/// ```
/// use contour::prelude::*;
/// use serde_json::json;
///
/// let named = object! { name: string() };
/// let aged = object! { age: number() };
/// let person = named.and(aged);
///
/// let input = json!({ "name": "Ada", "age": 36 });
/// assert_eq!(person.parse(&input).unwrap(), input);
///
/// let error = person.parse(&json!({})).unwrap_err();
/// assert_eq!(error.len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct IntersectionSchema {
    members: Vec<Schema>,
}

impl IntersectionSchema {
    pub fn members(&self) -> &[Schema] {
        &self.members
    }

    /// Adds another member.
    #[must_use = "builder methods must be chained or built"]
    pub fn and(mut self, other: impl Validate) -> Self {
        self.members.push(other.into_schema());
        self
    }
}

/// Where two member outputs disagree.
struct Conflict(Path);

fn merge(left: Value, right: Value) -> Result<Value, Conflict> {
    match (left, right) {
        (Value::Object(mut left), Value::Object(right)) => {
            for (key, value) in right {
                match left.get_mut(&key) {
                    Some(existing) => {
                        *existing = merge(std::mem::take(existing), value).map_err(
                            |Conflict(mut path)| {
                                path.prepend(PathSegment::Key(key.clone()));
                                Conflict(path)
                            },
                        )?;
                    }
                    None => {
                        left.insert(key, value);
                    }
                }
            }
            Ok(Value::Object(left))
        }
        (Value::Array(left), Value::Array(right)) if left.len() == right.len() => left
            .into_iter()
            .zip(right)
            .enumerate()
            .map(|(index, (left, right))| {
                merge(left, right).map_err(|Conflict(mut path)| {
                    path.prepend(PathSegment::Index(index));
                    Conflict(path)
                })
            })
            .collect::<Result<Vec<_>, _>>()
            .map(Value::Array),
        (left, right) if left == right => Ok(left),
        _ => Err(Conflict(Path::root())),
    }
}

fn merge_outputs(outputs: Vec<Option<Value>>) -> Result<Option<Value>, Conflict> {
    let mut outputs = outputs.into_iter();
    let Some(first) = outputs.next() else {
        return Ok(None);
    };

    outputs.try_fold(first, |merged, output| match (merged, output) {
        (None, None) => Ok(None),
        (Some(left), Some(right)) => merge(left, right).map(Some),
        _ => Err(Conflict(Path::root())),
    })
}

impl Validate for IntersectionSchema {
    fn validate(&self, input: Option<&Value>) -> Outcome {
        let mut issues = Vec::new();
        let mut outputs = Vec::with_capacity(self.members.len());

        for member in &self.members {
            match member.validate(input) {
                Ok(output) => outputs.push(output),
                Err(Failure::Invalid(member_issues)) => issues.extend(member_issues),
                Err(aborted @ Failure::Aborted(_)) => return Err(aborted),
            }
        }

        if !issues.is_empty() {
            return Err(Failure::Invalid(issues));
        }

        merge_outputs(outputs).map_err(|Conflict(path)| {
            ValidationIssue::new(
                IssueCode::InvalidIntersectionTypes,
                "Intersection results could not be merged",
            )
            .with_path(path)
            .into()
        })
    }

    fn definition(&self) -> SchemaDefinition {
        SchemaDefinition::Intersection {
            members: self.members.iter().map(Schema::definition).collect(),
        }
    }

    fn into_schema(self) -> Schema {
        Schema::new(Node::Intersection(self))
    }

    fn accepts_missing(&self) -> bool {
        self.members.iter().all(Schema::accepts_missing)
    }
}

/// Creates an intersection of `members`.
pub fn intersection<I>(members: I) -> IntersectionSchema
where
    I: IntoIterator<Item = Schema>,
{
    IntersectionSchema {
        members: members.into_iter().collect(),
    }
}
