//! Number schema
//!
//! Bounds are tracked as open or closed [`Bound`]s, so `gt(5.0)` rejects
//! exactly `5` and nothing else near it.

use std::borrow::Cow;

use serde_json::Value;

use crate::foundation::definition::{Bound, Constraint, NumberCheck};
use crate::foundation::{IssueCode, Outcome, SchemaDefinition, Validate, ValidationIssue, kind};
use crate::schema::{Node, Schema};

/// Largest integer an `f64` represents exactly.
pub const MAX_SAFE_INTEGER: f64 = 9_007_199_254_740_991.0;

/// Builder and validator for numeric inputs.
///
/// # Examples
///
/// ```
/// use contour::prelude::*;
/// use serde_json::json;
///
/// let port = number().int().gte(1.0).lte(65535.0);
/// assert!(port.parse(&json!(8080)).is_ok());
/// assert_eq!(
///     port.parse(&json!(0)).unwrap_err().issues()[0].message,
///     "Number must be greater than or equal to 1"
/// );
/// ```
#[derive(Debug, Clone)]
pub struct NumberSchema {
    checks: Vec<Constraint<NumberCheck>>,
}

impl NumberSchema {
    #[must_use]
    pub const fn new() -> Self {
        Self { checks: Vec::new() }
    }

    fn check(mut self, check: NumberCheck) -> Self {
        self.checks.push(Constraint::new(check));
        self
    }

    /// `>= min`.
    #[must_use = "builder methods must be chained or built"]
    pub fn min(self, min: f64) -> Self {
        self.check(NumberCheck::Min(Bound::inclusive(min)))
    }

    /// `<= max`.
    #[must_use = "builder methods must be chained or built"]
    pub fn max(self, max: f64) -> Self {
        self.check(NumberCheck::Max(Bound::inclusive(max)))
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn gte(self, min: f64) -> Self {
        self.min(min)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn lte(self, max: f64) -> Self {
        self.max(max)
    }

    /// `> min`.
    #[must_use = "builder methods must be chained or built"]
    pub fn gt(self, min: f64) -> Self {
        self.check(NumberCheck::Min(Bound::exclusive(min)))
    }

    /// `< max`.
    #[must_use = "builder methods must be chained or built"]
    pub fn lt(self, max: f64) -> Self {
        self.check(NumberCheck::Max(Bound::exclusive(max)))
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn positive(self) -> Self {
        self.gt(0.0)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn negative(self) -> Self {
        self.lt(0.0)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn nonnegative(self) -> Self {
        self.gte(0.0)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn nonpositive(self) -> Self {
        self.lte(0.0)
    }

    /// No fractional part.
    #[must_use = "builder methods must be chained or built"]
    pub fn int(self) -> Self {
        self.check(NumberCheck::Int)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn finite(self) -> Self {
        self.check(NumberCheck::Finite)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn multiple_of(self, step: f64) -> Self {
        self.check(NumberCheck::MultipleOf { value: step })
    }

    /// Alias of [`multiple_of`](Self::multiple_of).
    #[must_use = "builder methods must be chained or built"]
    pub fn step(self, step: f64) -> Self {
        self.multiple_of(step)
    }

    /// Within `±MAX_SAFE_INTEGER`.
    #[must_use = "builder methods must be chained or built"]
    pub fn safe(self) -> Self {
        self.gte(-MAX_SAFE_INTEGER).lte(MAX_SAFE_INTEGER)
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

fn evaluate(check: &NumberCheck, value: f64) -> Option<ValidationIssue> {
    match check {
        NumberCheck::Min(bound) => {
            let ok = if bound.inclusive {
                value >= bound.value
            } else {
                value > bound.value
            };
            (!ok).then(|| {
                let relation = if bound.inclusive {
                    "greater than or equal to"
                } else {
                    "greater than"
                };
                ValidationIssue::new(
                    IssueCode::TooSmall,
                    format!("Number must be {relation} {}", bound.value),
                )
                .with_param("minimum", bound.value.to_string())
                .with_param("inclusive", bound.inclusive.to_string())
                .with_param("type", "number")
            })
        }
        NumberCheck::Max(bound) => {
            let ok = if bound.inclusive {
                value <= bound.value
            } else {
                value < bound.value
            };
            (!ok).then(|| {
                let relation = if bound.inclusive {
                    "less than or equal to"
                } else {
                    "less than"
                };
                ValidationIssue::new(
                    IssueCode::TooBig,
                    format!("Number must be {relation} {}", bound.value),
                )
                .with_param("maximum", bound.value.to_string())
                .with_param("inclusive", bound.inclusive.to_string())
                .with_param("type", "number")
            })
        }
        NumberCheck::Int => (value.fract() != 0.0).then(|| {
            ValidationIssue::new(IssueCode::InvalidType, "Expected integer, received float")
                .with_expected("integer")
                .with_received("float")
        }),
        NumberCheck::Finite => (!value.is_finite())
            .then(|| ValidationIssue::new(IssueCode::NotFinite, "Number must be finite")),
        NumberCheck::MultipleOf { value: step } => (float_safe_remainder(value, *step) != 0.0)
            .then(|| {
                ValidationIssue::new(
                    IssueCode::NotMultipleOf,
                    format!("Number must be a multiple of {step}"),
                )
                .with_param("multiple_of", step.to_string())
            }),
    }
}

fn decimals(value: f64) -> i32 {
    value
        .to_string()
        .split_once('.')
        .map_or(0, |(_, fraction)| fraction.len() as i32)
}

/// Remainder after scaling both operands to integers, so `0.3 % 0.1` is zero.
///
/// Falls back to plain `%` when scaling overflows (subnormal or huge operands).
fn float_safe_remainder(value: f64, step: f64) -> f64 {
    let scale = 10f64.powi(decimals(value).max(decimals(step)));
    let scaled_value = (value * scale).round();
    let scaled_step = (step * scale).round();
    if !(scaled_value.is_finite() && scaled_step.is_finite()) {
        return value % step;
    }
    (scaled_value % scaled_step) / scale
}

impl Validate for NumberSchema {
    fn validate(&self, input: Option<&Value>) -> Outcome {
        let Some(value) = kind::as_number(input) else {
            return Err(ValidationIssue::invalid_type("number", input).into());
        };

        for check in &self.checks {
            if let Some(issue) = evaluate(&check.kind, value) {
                return Err(issue.with_message_override(check.message.as_ref()).into());
            }
        }

        Ok(input.cloned())
    }

    fn definition(&self) -> SchemaDefinition {
        SchemaDefinition::Number {
            checks: self.checks.clone(),
        }
    }

    fn into_schema(self) -> Schema {
        Schema::new(Node::Number(self))
    }
}

/// Creates a number schema.
#[must_use]
pub const fn number() -> NumberSchema {
    NumberSchema::new()
}

// ============================================================================
// TESTS
// ============================================================================
