//! Reporting projections over [`ValidationError`]

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::error::ValidationError;

/// Key under which [`ValidationError::format`] collects root-level messages.
pub const FORM_ERRORS_KEY: &str = "_errors";

/// Root-level messages split from per-field messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlattenedErrors {
    pub form_errors: Vec<String>,
    pub field_errors: IndexMap<String, Vec<String>>,
}

impl ValidationError {
    /// Messages grouped by dotted path, in issue order.
    ///
    /// Issues at the root path go under [`FORM_ERRORS_KEY`].
    ///
    /// Keys are not escaped: a field literally named `"a.b"` shares the key
    /// of the nested path `a` then `b`. Use [`ValidationError::issues`] when
    /// the segments must stay distinct.
    ///
    /// # Examples
    ///
    /// ```
    /// use contour::prelude::*;
    /// use serde_json::json;
    ///
    /// let schema = object! { items: array(number()) };
    /// let error = schema.parse(&json!({ "items": [1, "x"] })).unwrap_err();
    ///
    /// let formatted = error.format();
    /// assert_eq!(formatted["items.1"], vec!["Expected number, received string"]);
    /// ```
    #[must_use]
    pub fn format(&self) -> IndexMap<String, Vec<String>> {
        let mut out: IndexMap<String, Vec<String>> = IndexMap::new();
        for issue in self.issues() {
            let key = if issue.path.is_empty() {
                FORM_ERRORS_KEY.to_owned()
            } else {
                issue.path.to_string()
            };
            out.entry(key).or_default().push(issue.message.to_string());
        }
        out
    }

    /// Root-level messages and per-field messages.
    ///
    /// Field keys are dotted paths, with the same ambiguity as [`format`](Self::format).
    #[must_use]
    pub fn flatten(&self) -> FlattenedErrors {
        let mut flat = FlattenedErrors::default();
        for issue in self.issues() {
            if issue.path.is_empty() {
                flat.form_errors.push(issue.message.to_string());
            } else {
                flat.field_errors
                    .entry(issue.path.to_string())
                    .or_default()
                    .push(issue.message.to_string());
            }
        }
        flat
    }
}
