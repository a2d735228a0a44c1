//! Object schema
//!
//! Every declared field is visited in shape order and every issue is kept;
//! a failing field never hides the fields after it.

use indexmap::IndexMap;
use serde_json::{Map, Value};

use super::simple::{EnumSchema, enumeration};
use super::{collect, finish};
use crate::foundation::{
    IssueCode, Outcome, PathSegment, SchemaDefinition, UnknownKeysDefinition, Validate,
    ValidateExt, ValidationIssue, kind,
};
use crate::schema::{Node, Schema};

// ============================================================================
// UNKNOWN KEYS
// ============================================================================

/// What to do with keys the shape does not declare.
#[derive(Debug, Clone, Default)]
pub enum UnknownKeys {
    /// Drop them silently.
    #[default]
    Strip,
    /// Report one `unrecognized_key` issue per key.
    Strict,
    /// Copy them to the output unchanged.
    Passthrough,
    /// Validate them against a schema.
    Catchall(Schema),
}

impl UnknownKeys {
    fn definition(&self) -> UnknownKeysDefinition {
        match self {
            Self::Strip => UnknownKeysDefinition::Strip,
            Self::Strict => UnknownKeysDefinition::Strict,
            Self::Passthrough => UnknownKeysDefinition::Passthrough,
            Self::Catchall(schema) => UnknownKeysDefinition::Catchall {
                schema: Box::new(schema.definition()),
            },
        }
    }
}

// ============================================================================
// OBJECT SCHEMA
// ============================================================================

/// Builder and validator for objects with a fixed shape.
///
/// # Examples
///
/// ```
/// use contour::prelude::*;
/// use serde_json::json;
///
/// let schema = object! { a: object! { b: string() } };
/// let error = schema.parse(&json!({ "a": { "b": 123 } })).unwrap_err();
///
/// let issue = &error.issues()[0];
/// assert_eq!(issue.code, IssueCode::InvalidType);
/// assert_eq!(
///     issue.path.segments(),
///     &[PathSegment::key("a"), PathSegment::key("b")]
/// );
/// ```
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    shape: IndexMap<String, Schema>,
    unknown_keys: UnknownKeys,
}

impl ObjectSchema {
    #[must_use]
    pub fn new() -> Self {
        Self {
            shape: IndexMap::new(),
            unknown_keys: UnknownKeys::Strip,
        }
    }

    /// Adds (or replaces) a field.
    #[must_use = "builder methods must be chained or built"]
    pub fn field(mut self, name: impl Into<String>, schema: impl Validate) -> Self {
        self.shape.insert(name.into(), schema.into_schema());
        self
    }

    pub fn shape(&self) -> &IndexMap<String, Schema> {
        &self.shape
    }

    pub fn get(&self, name: &str) -> Option<&Schema> {
        self.shape.get(name)
    }

    pub fn unknown_keys(&self) -> &UnknownKeys {
        &self.unknown_keys
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn strip(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Strip;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn strict(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Strict;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn passthrough(mut self) -> Self {
        self.unknown_keys = UnknownKeys::Passthrough;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn catchall(mut self, schema: impl Validate) -> Self {
        self.unknown_keys = UnknownKeys::Catchall(schema.into_schema());
        self
    }

    /// Keeps only the named fields; unknown names are ignored.
    #[must_use = "builder methods must be chained or built"]
    pub fn pick(mut self, names: &[&str]) -> Self {
        self.shape.retain(|name, _| names.contains(&name.as_str()));
        self
    }

    /// Drops the named fields.
    #[must_use = "builder methods must be chained or built"]
    pub fn omit(mut self, names: &[&str]) -> Self {
        self.shape.retain(|name, _| !names.contains(&name.as_str()));
        self
    }

    /// Makes every field optional.
    #[must_use = "builder methods must be chained or built"]
    pub fn partial(self) -> Self {
        self.map_fields(|_, schema| make_optional(schema))
    }

    /// Makes the named fields optional.
    #[must_use = "builder methods must be chained or built"]
    pub fn partial_fields(self, names: &[&str]) -> Self {
        self.map_fields(|name, schema| {
            if names.contains(&name) {
                make_optional(schema)
            } else {
                schema
            }
        })
    }

    /// Removes the outer `optional` wrapper from every field.
    #[must_use = "builder methods must be chained or built"]
    pub fn required(self) -> Self {
        self.map_fields(|_, schema| schema.unwrap_optional())
    }

    /// Makes every field optional, descending into nested objects and arrays.
    #[must_use = "builder methods must be chained or built"]
    pub fn deep_partial(self) -> Self {
        self.map_fields(|_, schema| make_optional(schema.deep_partial()))
    }

    /// Adds the fields of `other`; its fields win on conflict.
    #[must_use = "builder methods must be chained or built"]
    pub fn extend(mut self, other: Self) -> Self {
        self.shape.extend(other.shape);
        self
    }

    /// [`extend`](Self::extend) that also takes the unknown-key policy of `other`.
    #[must_use = "builder methods must be chained or built"]
    pub fn merge(mut self, other: Self) -> Self {
        self.shape.extend(other.shape);
        self.unknown_keys = other.unknown_keys;
        self
    }

    /// An enum of the field names.
    pub fn keyof(&self) -> EnumSchema {
        enumeration(self.shape.keys().cloned())
    }

    fn map_fields(mut self, mut map: impl FnMut(&str, Schema) -> Schema) -> Self {
        self.shape = self
            .shape
            .into_iter()
            .map(|(name, schema)| {
                let schema = map(&name, schema);
                (name, schema)
            })
            .collect();
        self
    }
}

fn make_optional(schema: Schema) -> Schema {
    if schema.is_optional() {
        schema
    } else {
        schema.optional()
    }
}

impl Validate for ObjectSchema {
    fn validate(&self, input: Option<&Value>) -> Outcome {
        let Some(object) = kind::as_plain_object(input) else {
            return Err(ValidationIssue::invalid_type("object", input).into());
        };

        let mut issues = Vec::new();
        let mut output = Map::with_capacity(object.len());

        for (name, schema) in &self.shape {
            let value = object.get(name);
            if value.is_none() && !schema.accepts_missing() {
                issues.push(ValidationIssue::required(name.as_str()));
                continue;
            }
            let outcome = schema.validate(value);
            let segment = || PathSegment::key(name.as_str());
            if let Some(out) = collect(&mut issues, outcome, segment)? {
                output.insert(name.clone(), out);
            }
        }

        for (key, value) in object {
            if self.shape.contains_key(key) {
                continue;
            }
            match &self.unknown_keys {
                UnknownKeys::Strip => {}
                UnknownKeys::Strict => issues.push(
                    ValidationIssue::new(
                        IssueCode::UnrecognizedKey,
                        format!("Unrecognized key: '{key}'"),
                    )
                    .with_param("key", key.clone()),
                ),
                UnknownKeys::Passthrough => {
                    output.insert(key.clone(), value.clone());
                }
                UnknownKeys::Catchall(schema) => {
                    let outcome = schema.validate(Some(value));
                    let segment = || PathSegment::key(key.as_str());
                    if let Some(out) = collect(&mut issues, outcome, segment)? {
                        output.insert(key.clone(), out);
                    }
                }
            }
        }

        finish(issues, Value::Object(output))
    }

    fn definition(&self) -> SchemaDefinition {
        SchemaDefinition::Object {
            shape: self
                .shape
                .iter()
                .map(|(name, schema)| (name.clone(), schema.definition()))
                .collect(),
            unknown_keys: self.unknown_keys.definition(),
        }
    }

    fn into_schema(self) -> Schema {
        Schema::new(Node::Object(self))
    }
}

/// Creates an empty object schema; add fields with [`ObjectSchema::field`]
/// or use the [`object!`](crate::object) macro.
#[must_use]
pub fn object() -> ObjectSchema {
    ObjectSchema::new()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validators::{array, number, string};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn user() -> ObjectSchema {
        object()
            .field("name", string())
            .field("age", number())
            .field("nickname", string().optional())
    }

    #[test]
    fn test_missing_required_field() {
        let error = user().parse(&json!({ "age": 3 })).unwrap_err();
        assert_eq!(error.len(), 1);
        assert_eq!(error.issues()[0].code, IssueCode::Required);
        assert_eq!(error.issues()[0].path.to_string(), "name");
    }

    #[test]
    fn test_aggregates_every_field() {
        let error = user()
            .parse(&json!({ "name": 1, "age": "x", "nickname": false }))
            .unwrap_err();
        let paths: Vec<_> = error.issues().iter().map(|i| i.path.to_string()).collect();
        assert_eq!(paths, vec!["name", "age", "nickname"]);
    }

    #[test]
    fn test_rejects_arrays_and_null() {
        for input in [json!([]), json!(null)] {
            let error = user().parse(&input).unwrap_err();
            assert_eq!(error.len(), 1);
            assert_eq!(error.issues()[0].code, IssueCode::InvalidType);
            assert!(error.issues()[0].path.is_empty());
        }
    }

    #[test]
    fn test_unknown_key_policies() {
        let input = json!({ "name": "a", "age": 1, "extra": 1 });

        assert_eq!(
            user().parse(&input).unwrap(),
            json!({ "name": "a", "age": 1 })
        );
        let error = user().strict().parse(&input).unwrap_err();
        assert_eq!(error.issues()[0].param("key"), Some("extra"));
        assert_eq!(user().passthrough().parse(&input).unwrap(), input);

        let error = user().catchall(string()).parse(&input).unwrap_err();
        assert_eq!(error.issues()[0].path.to_string(), "extra");
        assert_eq!(user().catchall(number()).parse(&input).unwrap(), input);
    }

    #[test]
    fn test_strict_reports_each_key() {
        let error = object()
            .strict()
            .parse(&json!({ "a": 1, "b": 2 }))
            .unwrap_err();
        assert_eq!(error.len(), 2);
        assert!(error.issues().iter().all(|i| i.code == IssueCode::UnrecognizedKey));
        assert_eq!(error.issues()[1].message, "Unrecognized key: 'b'");
    }

    #[test]
    fn test_output_omits_undefined_optional() {
        assert_eq!(
            user().parse(&json!({ "name": "a", "age": 1 })).unwrap(),
            json!({ "name": "a", "age": 1 })
        );
    }

    #[test]
    fn test_default_field_fills_in() {
        let schema = object().field("role", string().default("user"));
        assert_eq!(schema.parse(&json!({})).unwrap(), json!({ "role": "user" }));
    }

    #[test]
    fn test_pick_omit_keyof() {
        let picked = user().pick(&["name"]);
        assert_eq!(picked.shape().keys().collect::<Vec<_>>(), vec!["name"]);

        let omitted = user().omit(&["name", "age"]);
        assert_eq!(omitted.shape().keys().collect::<Vec<_>>(), vec!["nickname"]);

        let keys = user().keyof();
        assert_eq!(keys.options(), &["name", "age", "nickname"]);
    }

    #[test]
    fn test_partial_and_required() {
        let partial = user().partial();
        assert_eq!(partial.parse(&json!({})).unwrap(), json!({}));

        let some = user().partial_fields(&["age"]);
        let error = some.parse(&json!({})).unwrap_err();
        assert_eq!(error.len(), 1);
        assert_eq!(error.issues()[0].path.to_string(), "name");

        let required = user().partial().required();
        assert_eq!(required.parse(&json!({})).unwrap_err().len(), 3);
    }

    #[test]
    fn test_extend_and_merge() {
        let base = object().field("id", number());
        let extended = base.clone().extend(object().field("id", string()).field("tag", string()));
        assert!(extended.parse(&json!({ "id": "x", "tag": "t" })).is_ok());

        let merged = base.merge(object().field("tag", string()).strict());
        assert!(merged.parse(&json!({ "id": 1, "tag": "t", "x": 0 })).is_err());
    }

    #[test]
    fn test_deep_partial_reaches_nested_objects() {
        let schema = object()
            .field("profile", object().field("bio", string()))
            .field("posts", array(object().field("title", string())))
            .deep_partial();

        assert!(schema.parse(&json!({})).is_ok());
        assert!(schema.parse(&json!({ "profile": {} })).is_ok());
        assert!(schema.parse(&json!({ "posts": [{}] })).is_ok());
        assert!(schema.parse(&json!({ "profile": { "bio": 1 } })).is_err());
    }

    #[test]
    fn test_nested_path_prefixing() {
        let schema = object().field("a", object().field("b", object().field("c", number())));
        let error = schema.parse(&json!({ "a": { "b": { "c": "x" } } })).unwrap_err();
        assert_eq!(error.issues()[0].path.to_string(), "a.b.c");
    }
}
