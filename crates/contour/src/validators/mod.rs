//! Built-in schema nodes
//!
//! # Leaves
//!
//! - [`string`], [`number`]: fluent constraint builders, fail fast
//! - [`boolean`], [`null`], [`undefined`], [`any`], [`unknown`], [`never`]
//! - [`literal`], [`enumeration`], [`custom`]
//!
//! # Composites
//!
//! - [`object`], [`array`], [`record`]: visit every child and aggregate
//! - [`union`]: first accepting variant wins
//! - [`intersection`]: every member must accept; outputs are merged

mod array;
mod formats;
mod intersection;
mod number;
mod object;
mod record;
mod simple;
mod string;
mod union;

pub use array::{ArraySchema, array};
pub use intersection::{IntersectionSchema, intersection};
pub use number::{MAX_SAFE_INTEGER, NumberSchema, number};
pub use object::{ObjectSchema, UnknownKeys, object};
pub use record::{RecordSchema, record};
pub use simple::{
    CustomSchema, EnumSchema, LiteralSchema, Primitive, any, boolean, custom, enumeration,
    literal, never, null, undefined, unknown,
};
pub use string::{StringSchema, string};
pub use union::{UnionSchema, union};

pub use crate::foundation::definition::StringFormat;

use serde_json::Value;

use crate::foundation::{Failure, Outcome, PathSegment, ValidationIssue};

/// Records a child's issues under `segment` and hands back its output.
///
/// A failed child yields `Ok(None)`; an aborted child is returned as the error.
pub(crate) fn collect(
    issues: &mut Vec<ValidationIssue>,
    outcome: Outcome,
    segment: impl FnOnce() -> PathSegment,
) -> Result<Option<Value>, Failure> {
    match outcome {
        Ok(output) => Ok(output),
        Err(Failure::Invalid(child)) => {
            let segment = segment();
            issues.extend(child.into_iter().map(|issue| issue.prefixed(segment.clone())));
            Ok(None)
        }
        Err(aborted @ Failure::Aborted(_)) => Err(aborted),
    }
}

/// The composite's output when nothing was recorded.
pub(crate) fn finish(issues: Vec<ValidationIssue>, output: Value) -> Outcome {
    if issues.is_empty() {
        Ok(Some(output))
    } else {
        Err(Failure::Invalid(issues))
    }
}
