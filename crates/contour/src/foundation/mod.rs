//! Core validation types and traits
//!
//! This module contains the building blocks every schema node shares:
//!
//! - **Traits**: [`Validate`], [`ValidateExt`]
//! - **Errors**: [`ValidationIssue`], [`ValidationError`], [`Failure`], [`SchemaError`]
//! - **Paths**: [`Path`], [`PathSegment`]
//! - **Kinds**: [`ValueKind`] and the discriminant functions in [`kind`]
//! - **Reporting**: [`FlattenedErrors`] via [`ValidationError::flatten`]
//! - **Introspection**: [`SchemaDefinition`]
//! - **Configuration**: [`ParseOptions`], [`ErrorMap`]
//!
//! # Architecture
//!
//! ## 1. Outcomes, not booleans
//!
//! A node maps an input to an [`Outcome`]: either the (possibly transformed)
//! output or a [`Failure`]. Undefined is `None` on both sides.
//!
//! ```rust,ignore
//! fn validate(&self, input: Option<&Value>) -> Outcome;
//! ```
//!
//! ## 2. Path composition is prefixing
//!
//! Children report issues relative to themselves. A composite prepends its
//! key or index with [`Failure::prefixed`] and never rewrites a path any
//! other way.
//!
//! ## 3. Two failure channels
//!
//! [`Failure::Invalid`] carries recorded issues and is recovered by
//! composites. [`Failure::Aborted`] carries an error raised by a user
//! callback and runs straight to the `parse` boundary, where it is
//! normalized into one `unknown_error` issue.

pub mod definition;
pub mod error;
pub mod kind;
pub mod options;
pub mod path;
pub mod report;
pub mod result;
pub mod traits;

pub use definition::{Constraint, SchemaDefinition, UnknownKeysDefinition};
pub use error::{
    BoxError, EmptyIssues, Failure, IssueCode, SchemaError, ValidationError, ValidationIssue,
};
pub use kind::ValueKind;
pub use options::{ErrorMap, ParseOptions};
pub use path::{Path, PathSegment};
pub use report::{FORM_ERRORS_KEY, FlattenedErrors};
pub use result::SafeParse;
pub use traits::{Validate, ValidateExt};

/// The result of running one node: the output (`None` = undefined) or a failure.
pub type Outcome = Result<Option<serde_json::Value>, Failure>;
