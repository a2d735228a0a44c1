//! Core traits for the validation system
//!
//! [`Validate`] is the contract every schema node implements.
//! [`ValidateExt`] layers the `parse` boundary and every wrapper combinator
//! on top of it.

use std::any::Any;
use std::borrow::Cow;
use std::panic::{self, AssertUnwindSafe};

use serde_json::Value;

use super::definition::SchemaDefinition;
use super::error::{BoxError, Failure, ValidationError};
use super::options::ParseOptions;
use super::result::SafeParse;
use super::Outcome;
use crate::combinators::{RefineOptions, Refinement, RefinementCtx};
use crate::schema::Schema;

// ============================================================================
// CORE VALIDATE TRAIT
// ============================================================================

/// A schema node: maps an input to an output or a failure.
///
/// Undefined is `None`, both as input and as output.
///
/// # Examples
///
/// ```
/// use contour::prelude::*;
/// use serde_json::json;
///
/// let schema = number().int();
/// assert_eq!(schema.validate(Some(&json!(3))).unwrap(), Some(json!(3)));
/// assert!(schema.validate(Some(&json!(3.5))).is_err());
/// assert!(schema.validate(None).is_err());
/// ```
pub trait Validate {
    /// Validates one input.
    ///
    /// # Errors
    ///
    /// [`Failure::Invalid`] with every recorded issue, or
    /// [`Failure::Aborted`] when a user callback failed.
    fn validate(&self, input: Option<&Value>) -> Outcome;

    /// Describes this node and its children.
    fn definition(&self) -> SchemaDefinition;

    /// Seals this node into a shareable [`Schema`].
    fn into_schema(self) -> Schema
    where
        Self: Sized;

    /// Whether an object may omit a field holding this node.
    fn accepts_missing(&self) -> bool {
        false
    }
}

// ============================================================================
// VALIDATE EXTENSION TRAIT
// ============================================================================

/// Parse boundary and combinators, available on every [`Validate`] type.
pub trait ValidateExt: Validate + Sized {
    /// Validates `input` and returns the output.
    ///
    /// A panic inside a user callback propagates unchanged.
    ///
    /// # Errors
    ///
    /// Returns every recorded issue; a failed fallible callback becomes a
    /// single `unknown_error` issue.
    fn parse(&self, input: &Value) -> Result<Value, ValidationError> {
        self.parse_opt(Some(input)).map(Option::unwrap_or_default)
    }

    /// [`parse`](Self::parse) for an input that may be undefined.
    ///
    /// # Errors
    ///
    /// Same as [`parse`](Self::parse).
    fn parse_opt(&self, input: Option<&Value>) -> Result<Option<Value>, ValidationError> {
        settle(self, self.validate(input))
    }

    /// [`parse`](Self::parse) with per-call options.
    ///
    /// # Errors
    ///
    /// Same as [`parse`](Self::parse), after `options` are applied.
    fn parse_with(&self, input: &Value, options: &ParseOptions) -> Result<Value, ValidationError> {
        self.parse(input).map_err(|error| options.apply(error))
    }

    /// Validates `input` without ever failing abruptly.
    ///
    /// Panics raised by user callbacks are caught and reported as a single
    /// `unknown_error` issue at the root.
    fn safe_parse(&self, input: &Value) -> SafeParse {
        self.safe_parse_opt(Some(input)).map(Option::unwrap_or_default)
    }

    /// [`safe_parse`](Self::safe_parse) for an input that may be undefined.
    fn safe_parse_opt(&self, input: Option<&Value>) -> SafeParse<Option<Value>> {
        let outcome = guarded(|| self.validate(input));
        settle(self, outcome).into()
    }

    /// [`safe_parse`](Self::safe_parse) with per-call options.
    fn safe_parse_with(&self, input: &Value, options: &ParseOptions) -> SafeParse {
        match self.safe_parse(input) {
            SafeParse::Failure(error) => SafeParse::Failure(options.apply(error)),
            success => success,
        }
    }

    /// Accepts undefined without invoking `self`.
    fn optional(self) -> Schema {
        Schema::optional_of(self.into_schema())
    }

    /// Accepts `null` without invoking `self`.
    fn nullable(self) -> Schema {
        Schema::nullable_of(self.into_schema())
    }

    /// Replaces undefined with `value`.
    fn default(self, value: impl Into<Value>) -> Schema {
        Schema::with_default(self.into_schema(), value.into())
    }

    /// Fails with one `custom` issue when `predicate` rejects the output.
    fn refine<F>(self, predicate: F, message: impl Into<Cow<'static, str>>) -> Schema
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        self.refine_with(predicate, RefineOptions::new(message))
    }

    /// [`refine`](Self::refine) with a path and params for the issue.
    fn refine_with<F>(self, predicate: F, options: RefineOptions) -> Schema
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Schema::refined(self.into_schema(), Refinement::check(predicate, options))
    }

    /// [`refine`](Self::refine) whose predicate may fail; the failure
    /// aborts the whole call.
    fn try_refine<F>(self, predicate: F, message: impl Into<Cow<'static, str>>) -> Schema
    where
        F: Fn(&Value) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        Schema::refined(
            self.into_schema(),
            Refinement::fallible(predicate, RefineOptions::new(message)),
        )
    }

    /// Lets `refinement` add any number of issues.
    fn super_refine<F>(self, refinement: F) -> Schema
    where
        F: Fn(&Value, &mut RefinementCtx) + Send + Sync + 'static,
    {
        Schema::refined(self.into_schema(), Refinement::collect(refinement))
    }

    /// Maps the validated output. Not idempotent.
    fn transform<F>(self, transform: F) -> Schema
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Schema::transformed(self.into_schema(), transform)
    }

    /// Feeds the output of `self` into `next`.
    fn pipe(self, next: impl Validate) -> Schema {
        Schema::piped(self.into_schema(), next.into_schema())
    }

    /// Replaces any failure with `fallback`.
    fn catch(self, fallback: impl Into<Value>) -> Schema {
        Schema::catch_of(self.into_schema(), fallback.into())
    }

    /// Nominal tag; no runtime effect.
    fn brand(self, name: impl Into<Cow<'static, str>>) -> Schema {
        Schema::branded(self.into_schema(), name.into())
    }

    /// An array of `self`.
    fn array(self) -> crate::validators::ArraySchema {
        crate::validators::array(self)
    }

    /// A union of `self` and `other`, tried in that order.
    fn or(self, other: impl Validate) -> crate::validators::UnionSchema {
        crate::validators::union([self.into_schema(), other.into_schema()])
    }

    /// An intersection of `self` and `other`; both must accept.
    fn and(self, other: impl Validate) -> crate::validators::IntersectionSchema {
        crate::validators::intersection([self.into_schema(), other.into_schema()])
    }
}

impl<T: Validate> ValidateExt for T {}

// ============================================================================
// BOUNDARY
// ============================================================================

fn settle<V: Validate + ?Sized>(
    schema: &V,
    outcome: Outcome,
) -> Result<Option<Value>, ValidationError> {
    outcome.map_err(|failure| {
        let error = failure.into_error();
        tracing::trace!(
            kind = schema.definition().type_name(),
            issues = error.len(),
            "validation failed"
        );
        error
    })
}

pub(crate) fn guarded(run: impl FnOnce() -> Outcome) -> Outcome {
    panic::catch_unwind(AssertUnwindSafe(run)).unwrap_or_else(|payload| {
        let message = panic_message(payload.as_ref());
        tracing::warn!(%message, "caught panic in validation callback");
        Err(Failure::Aborted(message.into()))
    })
}

fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(message) = payload.downcast_ref::<&str>() {
        (*message).to_owned()
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message.clone()
    } else {
        "validation callback panicked".to_owned()
    }
}
