//! Serializable schema descriptions
//!
//! [`SchemaDefinition`] is what [`Validate::definition`](super::Validate::definition)
//! returns. It describes a node and its children but never the callbacks,
//! and validation never reads it.

use std::borrow::Cow;

use indexmap::IndexMap;
use serde::Serialize;
use serde_json::Value;

// ============================================================================
// CONSTRAINTS
// ============================================================================

/// A check plus its optional message override.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Constraint<K> {
    #[serde(flatten)]
    pub kind: K,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<Cow<'static, str>>,
}

impl<K> Constraint<K> {
    pub const fn new(kind: K) -> Self {
        Self {
            kind,
            message: None,
        }
    }
}

/// A numeric bound, open or closed.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Bound {
    pub value: f64,
    pub inclusive: bool,
}

impl Bound {
    #[must_use]
    pub const fn inclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    #[must_use]
    pub const fn exclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }
}

/// Built-in string formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StringFormat {
    Email,
    Url,
    Uuid,
    Ipv4,
    Ipv6,
    Ip,
    Datetime,
    Date,
    Time,
    Base64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum StringCheck {
    Min { value: usize },
    Max { value: usize },
    Length { value: usize },
    Regex { pattern: String },
    Format { format: StringFormat },
    StartsWith { value: String },
    EndsWith { value: String },
    Includes { value: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TextTransform {
    Trim,
    ToLowercase,
    ToUppercase,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum NumberCheck {
    Min(Bound),
    Max(Bound),
    Int,
    Finite,
    MultipleOf { value: f64 },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "check", rename_all = "snake_case")]
pub enum ArrayCheck {
    Min { value: usize },
    Max { value: usize },
    Length { value: usize },
    Unique,
}

// ============================================================================
// SCHEMA DEFINITION
// ============================================================================

/// Unknown-key policy of an object node.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "policy", rename_all = "snake_case")]
pub enum UnknownKeysDefinition {
    Strip,
    Strict,
    Passthrough,
    Catchall { schema: Box<SchemaDefinition> },
}

/// Introspection tree of a schema.
///
/// # Examples
///
/// ```
/// use contour::prelude::*;
/// use serde_json::json;
///
/// let schema = string().min(2).optional();
/// assert_eq!(
///     serde_json::to_value(schema.definition()).unwrap(),
///     json!({
///         "type": "optional",
///         "inner": {
///             "type": "string",
///             "checks": [{ "check": "min", "value": 2 }],
///             "transforms": []
///         }
///     })
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum SchemaDefinition {
    String {
        checks: Vec<Constraint<StringCheck>>,
        transforms: Vec<TextTransform>,
    },
    Number {
        checks: Vec<Constraint<NumberCheck>>,
    },
    Boolean,
    Null,
    Undefined,
    Any,
    Unknown,
    Never,
    Literal {
        value: Value,
    },
    Enum {
        values: Vec<String>,
    },
    Custom {
        message: Cow<'static, str>,
    },
    Object {
        shape: IndexMap<String, SchemaDefinition>,
        unknown_keys: UnknownKeysDefinition,
    },
    Array {
        element: Box<SchemaDefinition>,
        checks: Vec<Constraint<ArrayCheck>>,
    },
    Record {
        #[serde(skip_serializing_if = "Option::is_none")]
        key: Option<Box<SchemaDefinition>>,
        value: Box<SchemaDefinition>,
    },
    Union {
        options: Vec<SchemaDefinition>,
    },
    Intersection {
        members: Vec<SchemaDefinition>,
    },
    Optional {
        inner: Box<SchemaDefinition>,
    },
    Nullable {
        inner: Box<SchemaDefinition>,
    },
    Default {
        inner: Box<SchemaDefinition>,
        value: Value,
    },
    Catch {
        inner: Box<SchemaDefinition>,
        fallback: Value,
    },
    Refine {
        inner: Box<SchemaDefinition>,
        #[serde(skip_serializing_if = "Option::is_none")]
        message: Option<Cow<'static, str>>,
    },
    Transform {
        inner: Box<SchemaDefinition>,
    },
    Pipe {
        input: Box<SchemaDefinition>,
        output: Box<SchemaDefinition>,
    },
    Brand {
        inner: Box<SchemaDefinition>,
        brand: Cow<'static, str>,
    },
    /// Not expanded, so recursive schemas stay finite.
    Lazy,
}

impl SchemaDefinition {
    /// The `type` tag of this node.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::String { .. } => "string",
            Self::Number { .. } => "number",
            Self::Boolean => "boolean",
            Self::Null => "null",
            Self::Undefined => "undefined",
            Self::Any => "any",
            Self::Unknown => "unknown",
            Self::Never => "never",
            Self::Literal { .. } => "literal",
            Self::Enum { .. } => "enum",
            Self::Custom { .. } => "custom",
            Self::Object { .. } => "object",
            Self::Array { .. } => "array",
            Self::Record { .. } => "record",
            Self::Union { .. } => "union",
            Self::Intersection { .. } => "intersection",
            Self::Optional { .. } => "optional",
            Self::Nullable { .. } => "nullable",
            Self::Default { .. } => "default",
            Self::Catch { .. } => "catch",
            Self::Refine { .. } => "refine",
            Self::Transform { .. } => "transform",
            Self::Pipe { .. } => "pipe",
            Self::Brand { .. } => "brand",
            Self::Lazy => "lazy",
        }
    }
}
