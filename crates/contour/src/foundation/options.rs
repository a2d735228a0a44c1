//! Per-call parse configuration

use std::fmt;
use std::sync::Arc;

use serde::Deserialize;

use super::error::{ValidationError, ValidationIssue};
use super::path::Path;

// ============================================================================
// ERROR MAP
// ============================================================================

/// Rewrites issue messages at the `parse` boundary.
///
/// Returning `None` keeps the default message.
pub trait ErrorMap: Send + Sync {
    fn message(&self, issue: &ValidationIssue) -> Option<String>;
}

impl<F> ErrorMap for F
where
    F: Fn(&ValidationIssue) -> Option<String> + Send + Sync,
{
    fn message(&self, issue: &ValidationIssue) -> Option<String> {
        self(issue)
    }
}

// ============================================================================
// PARSE OPTIONS
// ============================================================================

/// Options applied by [`parse_with`](super::ValidateExt::parse_with) and
/// [`safe_parse_with`](super::ValidateExt::safe_parse_with).
///
/// Deserializable so applications can keep it next to their own settings;
/// the error map is code-only and always starts empty.
///
/// # Examples
///
/// ```
/// use contour::prelude::*;
/// use serde_json::json;
///
/// let options = ParseOptions::new()
///     .with_path(["form"])
///     .with_error_map(|issue: &ValidationIssue| {
///         (issue.code == IssueCode::InvalidType).then(|| "Wrong type".to_owned())
///     });
///
/// let error = string().parse_with(&json!(1), &options).unwrap_err();
/// assert_eq!(error.issues()[0].path.to_string(), "form");
/// assert_eq!(error.issues()[0].message, "Wrong type");
/// ```
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct ParseOptions {
    /// Prefixed to every reported issue path.
    pub path: Path,

    #[serde(skip)]
    pub error_map: Option<Arc<dyn ErrorMap>>,

    /// When false, `received` is removed from every issue.
    pub report_input: bool,
}

impl ParseOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_path<I, S>(mut self, path: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<super::PathSegment>,
    {
        self.path = path.into_iter().map(Into::into).collect();
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_error_map(mut self, map: impl ErrorMap + 'static) -> Self {
        self.error_map = Some(Arc::new(map));
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn report_input(mut self, report: bool) -> Self {
        self.report_input = report;
        self
    }

    /// Applies these options to an error produced by a schema.
    #[must_use]
    pub fn apply(&self, mut error: ValidationError) -> ValidationError {
        for issue in error.issues_mut() {
            self.apply_issue(issue);
        }
        error
    }

    fn apply_issue(&self, issue: &mut ValidationIssue) {
        issue.prepend(&self.path);
        self.finish_issue(issue);
    }

    // Nested issues were already prefixed by `prepend`.
    fn finish_issue(&self, issue: &mut ValidationIssue) {
        if let Some(map) = &self.error_map
            && let Some(message) = map.message(issue)
        {
            issue.message = message.into();
        }
        if !self.report_input {
            issue.received = None;
        }
        for nested in &mut issue.nested {
            self.finish_issue(nested);
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            path: Path::root(),
            error_map: None,
            report_input: true,
        }
    }
}

impl fmt::Debug for ParseOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseOptions")
            .field("path", &self.path)
            .field("error_map", &self.error_map.is_some())
            .field("report_input", &self.report_input)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::IssueCode;

    fn sample() -> ValidationError {
        ValidationError::new(
            ValidationIssue::new(IssueCode::InvalidUnion, "Invalid input")
                .with_received("number")
                .with_nested(vec![
                    ValidationIssue::new(IssueCode::InvalidType, "Expected string")
                        .with_received("number"),
                ]),
        )
    }

    #[test]
    fn test_default_changes_nothing() {
        let error = ParseOptions::default().apply(sample());
        assert_eq!(error, sample());
    }

    #[test]
    fn test_base_path_reaches_nested() {
        let error = ParseOptions::new().with_path(["a", "b"]).apply(sample());
        assert_eq!(error.issues()[0].path.to_string(), "a.b");
        assert_eq!(error.issues()[0].nested[0].path.to_string(), "a.b");
    }

    #[test]
    fn test_error_map_and_report_input() {
        let options = ParseOptions::new()
            .with_error_map(|_: &ValidationIssue| Some("nope".to_owned()))
            .report_input(false);

        let error = options.apply(sample());
        let issue = &error.issues()[0];
        assert_eq!(issue.message, "nope");
        assert_eq!(issue.received, None);
        assert_eq!(issue.nested[0].message, "nope");
        assert_eq!(issue.nested[0].received, None);
    }

    #[test]
    fn test_deserialize_with_defaults() {
        let options: ParseOptions =
            serde_json::from_value(serde_json::json!({ "path": ["form", 0] })).unwrap();
        assert_eq!(options.path.to_string(), "form.0");
        assert!(options.report_input);
        assert!(options.error_map.is_none());
    }
}
