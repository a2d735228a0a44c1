//! Prelude module for convenient imports.
//!
//! `use contour::prelude::*;` brings in the traits, every builder function
//! and the [`object!`](crate::object) macro.

// ============================================================================
// FOUNDATION: Core traits, errors, paths, options
// ============================================================================

pub use crate::foundation::{
    ErrorMap, FlattenedErrors, IssueCode, ParseOptions, Path, PathSegment, SafeParse,
    SchemaDefinition, Validate, ValidateExt, ValidationError, ValidationIssue,
};

// ============================================================================
// VALIDATORS: Builders and their schema types
// ============================================================================

#[allow(clippy::wildcard_imports)]
pub use crate::validators::*;

// ============================================================================
// COMBINATORS
// ============================================================================

pub use crate::combinators::{RefineOptions, RefinementCtx, lazy};

pub use crate::object;
pub use crate::schema::Schema;
