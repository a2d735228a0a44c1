//! # contour
//!
//! Composable schemas that validate, and optionally transform, values of
//! unknown shape.
//!
//! ## Quick Start
//!
//! ```
//! use contour::prelude::*;
//! use serde_json::json;
//!
//! let user = object! {
//!     name: string().min(1),
//!     age: number().int().nonnegative(),
//!     email: string().email().optional(),
//! };
//!
//! let parsed = user.parse(&json!({ "name": "Ada", "age": 36 })).unwrap();
//! assert_eq!(parsed, json!({ "name": "Ada", "age": 36 }));
//!
//! let error = user.parse(&json!({ "name": "", "age": -1 })).unwrap_err();
//! assert_eq!(error.len(), 2);
//! assert_eq!(error.issues()[0].path.to_string(), "name");
//! ```
//!
//! ## Building Schemas
//!
//! Leaf builders ([`string`](validators::string), [`number`](validators::number),
//! [`boolean`](validators::boolean), ...) collect constraints fluently and
//! seal into an immutable [`Schema`] on first wrap or on
//! [`into_schema`](foundation::Validate::into_schema). Every wrapper in
//! [`ValidateExt`](foundation::ValidateExt) returns a new node around the old
//! one.
//!
//! ## Failure Policy
//!
//! - **Primitives** fail fast: the first broken constraint is the only issue.
//! - **Composites** (object, array, record) aggregate: every field, element
//!   and key is checked and each issue is reported with its full path.
//! - **Unions** report one `invalid_union` issue that nests every variant's
//!   issues.
//! - **Intersections** run every member and report all of their issues.

// ValidationIssue carries path, params and nested issues inline.
#![allow(clippy::result_large_err)]

pub mod combinators;
pub mod extension;
pub mod foundation;
mod macros;
pub mod prelude;
mod schema;
pub mod validators;

pub use foundation::{
    IssueCode, ParseOptions, PathSegment, SafeParse, SchemaDefinition, Validate, ValidateExt,
    ValidationError, ValidationIssue,
};
pub use schema::Schema;
