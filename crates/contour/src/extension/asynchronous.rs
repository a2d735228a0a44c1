//! Async refinement contract
//!
//! Validation itself is synchronous. A check that genuinely needs to await
//! (a uniqueness lookup, a remote policy) implements [`AsyncRefinement`] and
//! is attached with [`Schema::with_async_refinement`]. Scheduling, caching,
//! retries and timeouts all belong to the implementor.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use crate::foundation::{
    BoxError, ParseOptions, Path, SafeParse, ValidateExt, ValidationError, ValidationIssue,
};
use crate::schema::Schema;

/// A predicate that runs after synchronous validation and may await.
///
/// # Examples
///
/// ```
/// use async_trait::async_trait;
/// use contour::extension::AsyncRefinement;
/// use contour::foundation::{BoxError, Path};
/// use contour::prelude::*;
/// use serde_json::{Value, json};
/// use std::borrow::Cow;
///
/// struct NotTaken;
///
/// #[async_trait]
/// impl AsyncRefinement for NotTaken {
///     async fn check(&self, value: &Value) -> Result<bool, BoxError> {
///         Ok(value["name"] != "admin")
///     }
///
///     fn message(&self) -> Cow<'static, str> {
///         "Name is taken".into()
///     }
///
///     fn path(&self) -> Path {
///         Path::from("name")
///     }
/// }
///
/// # tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(async {
/// let schema = object! { name: string() }
///     .into_schema()
///     .with_async_refinement(NotTaken);
///
/// let error = schema.parse_async(&json!({ "name": "admin" })).await.unwrap_err();
/// assert_eq!(error.issues()[0].path.to_string(), "name");
/// # });
/// ```
#[async_trait]
pub trait AsyncRefinement: Send + Sync {
    /// `Ok(false)` records a `custom` issue; `Err` aborts the call.
    async fn check(&self, value: &Value) -> Result<bool, BoxError>;

    /// Message of the recorded issue.
    fn message(&self) -> Cow<'static, str>;

    /// Path of the recorded issue, relative to the validated value.
    fn path(&self) -> Path {
        Path::root()
    }
}

/// A schema plus the async refinements that run after it.
#[derive(Clone)]
pub struct AsyncSchema {
    schema: Schema,
    refinements: Vec<Arc<dyn AsyncRefinement>>,
}

impl AsyncSchema {
    pub fn new(schema: Schema) -> Self {
        Self {
            schema,
            refinements: Vec::new(),
        }
    }

    /// Appends a refinement; refinements run in the order they were added.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_async_refinement(mut self, refinement: impl AsyncRefinement + 'static) -> Self {
        self.refinements.push(Arc::new(refinement));
        self
    }

    /// The synchronous part.
    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// Validates synchronously, then awaits every refinement on the output.
    ///
    /// Refinement issues are aggregated; a refinement error becomes a single
    /// `unknown_error` issue.
    pub async fn parse_async(&self, input: &Value) -> Result<Value, ValidationError> {
        let output = self.schema.parse(input)?;
        self.refine(output).await
    }

    /// [`parse_async`](Self::parse_async) with per-call options.
    pub async fn parse_async_with(
        &self,
        input: &Value,
        options: &ParseOptions,
    ) -> Result<Value, ValidationError> {
        self.parse_async(input)
            .await
            .map_err(|error| options.apply(error))
    }

    /// Never fails abruptly for the synchronous part; panics inside the
    /// synchronous callbacks are reported as `unknown_error`.
    pub async fn safe_parse_async(&self, input: &Value) -> SafeParse {
        match self.schema.safe_parse(input) {
            SafeParse::Success(output) => self.refine(output).await.into(),
            failure => failure,
        }
    }

    async fn refine(&self, output: Value) -> Result<Value, ValidationError> {
        let mut issues = Vec::new();
        for refinement in &self.refinements {
            match refinement.check(&output).await {
                Ok(true) => {}
                Ok(false) => issues.push(
                    ValidationIssue::custom(refinement.message()).with_path(refinement.path()),
                ),
                Err(error) => {
                    tracing::debug!(%error, "async refinement aborted");
                    return Err(ValidationError::new(ValidationIssue::unknown_error(
                        error.to_string(),
                    )));
                }
            }
        }

        match ValidationError::from_issues(issues) {
            Some(error) => Err(error),
            None => Ok(output),
        }
    }
}

impl fmt::Debug for AsyncSchema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AsyncSchema")
            .field("schema", &self.schema)
            .field("refinements", &self.refinements.len())
            .finish()
    }
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::IssueCode;
    use crate::prelude::*;
    use serde_json::json;

    struct Reject(&'static str);

    #[async_trait]
    impl AsyncRefinement for Reject {
        async fn check(&self, _value: &Value) -> Result<bool, BoxError> {
            Ok(false)
        }

        fn message(&self) -> Cow<'static, str> {
            Cow::Borrowed(self.0)
        }
    }

    struct Offline;

    #[async_trait]
    impl AsyncRefinement for Offline {
        async fn check(&self, _value: &Value) -> Result<bool, BoxError> {
            Err("service unavailable".into())
        }

        fn message(&self) -> Cow<'static, str> {
            Cow::Borrowed("unused")
        }
    }

    #[tokio::test]
    async fn test_sync_failure_skips_async_refinements() {
        let schema = string().into_schema().with_async_refinement(Offline);
        let error = schema.parse_async(&json!(1)).await.unwrap_err();
        assert_eq!(error.issues()[0].code, IssueCode::InvalidType);
    }

    #[tokio::test]
    async fn test_refinement_issues_aggregate() {
        let schema = string()
            .into_schema()
            .with_async_refinement(Reject("first"))
            .with_async_refinement(Reject("second"));

        let error = schema.parse_async(&json!("x")).await.unwrap_err();
        let messages: Vec<_> = error.issues().iter().map(|i| i.message.as_ref()).collect();
        assert_eq!(messages, ["first", "second"]);
    }

    #[tokio::test]
    async fn test_error_becomes_unknown_error() {
        let schema = string().into_schema().with_async_refinement(Offline);
        let result = schema.safe_parse_async(&json!("x")).await;
        let error = result.error().unwrap();
        assert_eq!(error.issues()[0].code, IssueCode::UnknownError);
        assert_eq!(error.issues()[0].message, "service unavailable");
    }

    #[tokio::test]
    async fn test_base_path_prefixes_refinement_path() {
        let schema = string().into_schema().with_async_refinement(Reject("no"));
        let options = ParseOptions::new().with_path(["user", "name"]);
        let error = schema.parse_async_with(&json!("x"), &options).await.unwrap_err();
        assert_eq!(error.issues()[0].path.to_string(), "user.name");
    }
}
