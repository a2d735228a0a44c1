//! Wrapper combinators
//!
//! Most wrappers are plain [`Schema`](crate::Schema) nodes built through
//! [`ValidateExt`](crate::ValidateExt): `optional`, `nullable`, `default`,
//! `catch`, `pipe` and `brand` need no state beyond their child. The ones
//! that carry user callbacks or caches live here.

mod lazy;
mod refine;
mod transform;

pub use lazy::{Lazy, lazy};
pub use refine::{RefineOptions, Refinement, RefinementCtx};
pub use transform::Transform;
