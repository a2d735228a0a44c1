//! Leaf schemas without configuration: primitives, literals, enums, custom

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;

use crate::foundation::{
    IssueCode, Outcome, SchemaDefinition, Validate, ValidationIssue, ValueKind, kind,
};
use crate::schema::{Node, Schema};

// ============================================================================
// PRIMITIVES
// ============================================================================

/// Kind-only leaf schemas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Primitive {
    Boolean,
    Null,
    Undefined,
    /// Accepts everything, including undefined.
    Any,
    /// Accepts everything, including undefined.
    Unknown,
    /// Accepts nothing.
    Never,
}

impl Validate for Primitive {
    fn validate(&self, input: Option<&Value>) -> Outcome {
        let ok = match self {
            Self::Boolean => matches!(input, Some(Value::Bool(_))),
            Self::Null => matches!(input, Some(Value::Null)),
            Self::Undefined => input.is_none(),
            Self::Any | Self::Unknown => true,
            Self::Never => false,
        };

        if ok {
            Ok(input.cloned())
        } else {
            let expected = match self {
                Self::Boolean => "boolean",
                Self::Null => "null",
                Self::Undefined => "undefined",
                Self::Any => "any",
                Self::Unknown => "unknown",
                Self::Never => "never",
            };
            Err(ValidationIssue::invalid_type(expected, input).into())
        }
    }

    fn definition(&self) -> SchemaDefinition {
        match self {
            Self::Boolean => SchemaDefinition::Boolean,
            Self::Null => SchemaDefinition::Null,
            Self::Undefined => SchemaDefinition::Undefined,
            Self::Any => SchemaDefinition::Any,
            Self::Unknown => SchemaDefinition::Unknown,
            Self::Never => SchemaDefinition::Never,
        }
    }

    fn into_schema(self) -> Schema {
        Schema::new(Node::Primitive(self))
    }

    fn accepts_missing(&self) -> bool {
        matches!(self, Self::Any | Self::Unknown | Self::Undefined)
    }
}

#[must_use]
pub const fn boolean() -> Primitive {
    Primitive::Boolean
}

#[must_use]
pub const fn null() -> Primitive {
    Primitive::Null
}

#[must_use]
pub const fn undefined() -> Primitive {
    Primitive::Undefined
}

#[must_use]
pub const fn any() -> Primitive {
    Primitive::Any
}

#[must_use]
pub const fn unknown() -> Primitive {
    Primitive::Unknown
}

#[must_use]
pub const fn never() -> Primitive {
    Primitive::Never
}

// ============================================================================
// LITERAL
// ============================================================================

/// Accepts exactly one value.
#[derive(Debug, Clone, PartialEq)]
pub struct LiteralSchema {
    value: Value,
}

impl LiteralSchema {
    pub fn value(&self) -> &Value {
        &self.value
    }
}

impl Validate for LiteralSchema {
    fn validate(&self, input: Option<&Value>) -> Outcome {
        if input == Some(&self.value) {
            return Ok(input.cloned());
        }

        let received = input.map_or_else(|| ValueKind::Undefined.to_string(), Value::to_string);
        Err(ValidationIssue::new(
            IssueCode::InvalidLiteral,
            format!("Invalid literal value, expected {}", self.value),
        )
        .with_expected(self.value.to_string())
        .with_received(received)
        .into())
    }

    fn definition(&self) -> SchemaDefinition {
        SchemaDefinition::Literal {
            value: self.value.clone(),
        }
    }

    fn into_schema(self) -> Schema {
        Schema::new(Node::Literal(self))
    }
}

/// Creates a schema that accepts only `value`.
pub fn literal(value: impl Into<Value>) -> LiteralSchema {
    LiteralSchema {
        value: value.into(),
    }
}

// ============================================================================
// ENUM
// ============================================================================

/// Accepts one string out of a fixed set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumSchema {
    values: Vec<String>,
}

impl EnumSchema {
    /// Allowed values in declaration order.
    pub fn options(&self) -> &[String] {
        &self.values
    }

    fn expected(&self) -> String {
        self.values
            .iter()
            .map(|value| format!("'{value}'"))
            .collect::<Vec<_>>()
            .join(" | ")
    }
}

impl Validate for EnumSchema {
    fn validate(&self, input: Option<&Value>) -> Outcome {
        let Some(text) = kind::as_string(input) else {
            return Err(ValidationIssue::invalid_type(self.expected(), input).into());
        };

        if self.values.iter().any(|value| value == text) {
            return Ok(input.cloned());
        }

        let expected = self.expected();
        Err(ValidationIssue::new(
            IssueCode::InvalidEnumValue,
            format!("Invalid enum value. Expected {expected}, received '{text}'"),
        )
        .with_param("options", self.values.join(", "))
        .with_expected(expected)
        .with_received(text.to_owned())
        .into())
    }

    fn definition(&self) -> SchemaDefinition {
        SchemaDefinition::Enum {
            values: self.values.clone(),
        }
    }

    fn into_schema(self) -> Schema {
        Schema::new(Node::Enum(self))
    }
}

/// Creates a string enum schema.
pub fn enumeration<I, S>(values: I) -> EnumSchema
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    EnumSchema {
        values: values.into_iter().map(Into::into).collect(),
    }
}

// ============================================================================
// CUSTOM
// ============================================================================

/// Accepts any defined value that satisfies a predicate.
pub struct CustomSchema {
    predicate: Box<dyn Fn(&Value) -> bool + Send + Sync>,
    message: Cow<'static, str>,
}

impl CustomSchema {
    #[must_use = "builder methods must be chained or built"]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        self.message = message.into();
        self
    }
}

impl fmt::Debug for CustomSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CustomSchema")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

impl Validate for CustomSchema {
    fn validate(&self, input: Option<&Value>) -> Outcome {
        match input {
            Some(value) if (self.predicate)(value) => Ok(input.cloned()),
            _ => Err(ValidationIssue::custom(self.message.clone())
                .with_received(ValueKind::of(input).as_str())
                .into()),
        }
    }

    fn definition(&self) -> SchemaDefinition {
        SchemaDefinition::Custom {
            message: self.message.clone(),
        }
    }

    fn into_schema(self) -> Schema {
        Schema::new(Node::Custom(self))
    }
}

/// Creates a leaf that passes any value accepted by `predicate`.
pub fn custom<F>(predicate: F) -> CustomSchema
where
    F: Fn(&Value) -> bool + Send + Sync + 'static,
{
    CustomSchema {
        predicate: Box::new(predicate),
        message: Cow::Borrowed("Invalid input"),
    }
}

// ============================================================================
// TESTS
// ============================================================================
