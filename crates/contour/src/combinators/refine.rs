//! REFINE combinator - predicates over an already validated output
//!
//! Three flavours share one node:
//!
//! - [`refine`](crate::ValidateExt::refine): `Fn(&Value) -> bool`, one issue.
//! - [`try_refine`](crate::ValidateExt::try_refine): may return an error,
//!   which aborts the whole call.
//! - [`super_refine`](crate::ValidateExt::super_refine): pushes any number
//!   of issues into a [`RefinementCtx`].
//!
//! # Examples
//!
//! ```
//! use contour::prelude::*;
//! use serde_json::json;
//!
//! let signup = object! {
//!     password: string(),
//!     confirm: string(),
//! }
//! .refine_with(
//!     |v| v["password"] == v["confirm"],
//!     RefineOptions::new("Passwords don't match").with_path(["confirm"]),
//! );
//!
//! let error = signup
//!     .parse(&json!({ "password": "a", "confirm": "b" }))
//!     .unwrap_err();
//! assert_eq!(error.issues()[0].path.to_string(), "confirm");
//! ```

use std::borrow::Cow;
use std::fmt;

use serde_json::Value;
use smallvec::SmallVec;

use crate::foundation::error::Params;
use crate::foundation::{BoxError, Failure, Path, PathSegment, ValidationIssue};

// ============================================================================
// OPTIONS
// ============================================================================

/// Message, path and params of the issue a refinement reports.
#[derive(Debug, Clone, PartialEq)]
pub struct RefineOptions {
    message: Cow<'static, str>,
    path: Path,
    params: Params,
}

impl RefineOptions {
    pub fn new(message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            message: message.into(),
            path: Path::root(),
            params: SmallVec::new(),
        }
    }

    /// Path of the issue, relative to the refined value.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<PathSegment>,
    {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_param(
        mut self,
        key: impl Into<Cow<'static, str>>,
        value: impl Into<Cow<'static, str>>,
    ) -> Self {
        self.params.push((key.into(), value.into()));
        self
    }

    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    fn issue(&self) -> ValidationIssue {
        let mut issue = ValidationIssue::custom(self.message.clone()).with_path(self.path.clone());
        issue.params.clone_from(&self.params);
        issue
    }
}

impl From<&'static str> for RefineOptions {
    fn from(message: &'static str) -> Self {
        Self::new(message)
    }
}

impl From<String> for RefineOptions {
    fn from(message: String) -> Self {
        Self::new(message)
    }
}

// ============================================================================
// CONTEXT
// ============================================================================

/// Collects the issues raised by a [`super_refine`](crate::ValidateExt::super_refine) callback.
#[derive(Debug, Default)]
pub struct RefinementCtx {
    issues: Vec<ValidationIssue>,
}

impl RefinementCtx {
    /// Records `issue`; its path is relative to the refined value.
    pub fn add_issue(&mut self, issue: ValidationIssue) {
        self.issues.push(issue);
    }

    /// Records a `custom` issue at the refined value.
    pub fn custom(&mut self, message: impl Into<Cow<'static, str>>) {
        self.add_issue(ValidationIssue::custom(message));
    }

    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }
}

// ============================================================================
// REFINEMENT
// ============================================================================

type CheckFn = Box<dyn Fn(&Value) -> bool + Send + Sync>;
type FallibleFn = Box<dyn Fn(&Value) -> Result<bool, BoxError> + Send + Sync>;
type CollectFn = Box<dyn Fn(&Value, &mut RefinementCtx) + Send + Sync>;

enum Predicate {
    Check(CheckFn, RefineOptions),
    Fallible(FallibleFn, RefineOptions),
    Collect(CollectFn),
}

/// A predicate attached by one of the refine methods.
pub struct Refinement {
    predicate: Predicate,
}

impl Refinement {
    pub(crate) fn check<F>(predicate: F, options: RefineOptions) -> Self
    where
        F: Fn(&Value) -> bool + Send + Sync + 'static,
    {
        Self {
            predicate: Predicate::Check(Box::new(predicate), options),
        }
    }

    pub(crate) fn fallible<F>(predicate: F, options: RefineOptions) -> Self
    where
        F: Fn(&Value) -> Result<bool, BoxError> + Send + Sync + 'static,
    {
        Self {
            predicate: Predicate::Fallible(Box::new(predicate), options),
        }
    }

    pub(crate) fn collect<F>(refinement: F) -> Self
    where
        F: Fn(&Value, &mut RefinementCtx) + Send + Sync + 'static,
    {
        Self {
            predicate: Predicate::Collect(Box::new(refinement)),
        }
    }

    /// The fixed message, if this refinement has one.
    pub(crate) fn message(&self) -> Option<Cow<'static, str>> {
        match &self.predicate {
            Predicate::Check(_, options) | Predicate::Fallible(_, options) => {
                Some(options.message.clone())
            }
            Predicate::Collect(_) => None,
        }
    }

    /// Runs the predicate against an output that already passed validation.
    pub(crate) fn apply(&self, value: &Value) -> Result<(), Failure> {
        match &self.predicate {
            Predicate::Check(check, options) => {
                if check(value) {
                    Ok(())
                } else {
                    Err(options.issue().into())
                }
            }
            Predicate::Fallible(check, options) => match check(value) {
                Ok(true) => Ok(()),
                Ok(false) => Err(options.issue().into()),
                Err(error) => Err(Failure::Aborted(error)),
            },
            Predicate::Collect(refine) => {
                let mut ctx = RefinementCtx::default();
                refine(value, &mut ctx);
                if ctx.issues.is_empty() {
                    Ok(())
                } else {
                    Err(Failure::Invalid(ctx.issues))
                }
            }
        }
    }
}

impl fmt::Debug for Refinement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match &self.predicate {
            Predicate::Check(..) => "check",
            Predicate::Fallible(..) => "fallible",
            Predicate::Collect(_) => "collect",
        };
        f.debug_struct("Refinement")
            .field("kind", &kind)
            .field("message", &self.message())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================
