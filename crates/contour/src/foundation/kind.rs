//! Runtime kind inspection
//!
//! The closed set of discriminants every validator uses to look at an input.

use serde_json::{Map, Value};

/// Runtime kind of an input, as reported in `received` / `expected`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Undefined,
    Null,
    Boolean,
    Number,
    /// A number with no usable `f64` value.
    Nan,
    String,
    Array,
    Object,
}

impl ValueKind {
    /// Classifies an input; `None` is undefined.
    #[must_use]
    pub fn of(input: Option<&Value>) -> Self {
        match input {
            None => Self::Undefined,
            Some(Value::Null) => Self::Null,
            Some(Value::Bool(_)) => Self::Boolean,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(f) if !f.is_nan() => Self::Number,
                _ => Self::Nan,
            },
            Some(Value::String(_)) => Self::String,
            Some(Value::Array(_)) => Self::Array,
            Some(Value::Object(_)) => Self::Object,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Undefined => "undefined",
            Self::Null => "null",
            Self::Boolean => "boolean",
            Self::Number => "number",
            Self::Nan => "nan",
            Self::String => "string",
            Self::Array => "array",
            Self::Object => "object",
        }
    }
}

impl std::fmt::Display for ValueKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The input as a string slice.
#[must_use]
pub fn as_string(input: Option<&Value>) -> Option<&str> {
    input.and_then(Value::as_str)
}

/// The input as an `f64`; `None` for non-numbers and NaN.
#[must_use]
pub fn as_number(input: Option<&Value>) -> Option<f64> {
    match input {
        Some(Value::Number(n)) => n.as_f64().filter(|f| !f.is_nan()),
        _ => None,
    }
}

/// The input as a plain object; arrays and `null` are not objects.
#[must_use]
pub fn as_plain_object(input: Option<&Value>) -> Option<&Map<String, Value>> {
    input.and_then(Value::as_object)
}

/// The input as an ordered sequence.
#[must_use]
pub fn as_sequence(input: Option<&Value>) -> Option<&[Value]> {
    input.and_then(Value::as_array).map(Vec::as_slice)
}
