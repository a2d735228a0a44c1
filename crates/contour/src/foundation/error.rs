//! Error types for validation failures
//!
//! - [`ValidationIssue`]: one recorded failure with code, path and message.
//! - [`ValidationError`]: the ordered, non-empty issue list of one call.
//! - [`Failure`]: the internal outcome channel between nodes.
//! - [`SchemaError`]: construction-time errors (bad patterns).
//!
//! Message and param strings use `Cow<'static, str>` so static defaults do
//! not allocate.

use std::borrow::Cow;
use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use smallvec::SmallVec;

use super::kind::ValueKind;
use super::path::{Path, PathSegment};

/// Error type accepted from fallible user callbacks.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Ordered key/value parameters attached to an issue.
pub type Params = SmallVec<[(Cow<'static, str>, Cow<'static, str>); 2]>;

// ============================================================================
// ISSUE CODE
// ============================================================================

/// Machine-readable classification of an issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
#[non_exhaustive]
pub enum IssueCode {
    /// Input has the wrong runtime kind.
    InvalidType,
    /// Length or magnitude below the lower bound.
    TooSmall,
    /// Length or magnitude above the upper bound.
    TooBig,
    /// String failed a pattern, format or substring check.
    InvalidString,
    /// Declared object field is missing.
    Required,
    /// Object key not in the shape under the `strict` policy.
    UnrecognizedKey,
    /// Raised by `refine` and friends.
    Custom,
    /// A user callback failed or panicked.
    UnknownError,
    /// Input differs from the expected literal.
    InvalidLiteral,
    /// String is not one of the enum options.
    InvalidEnumValue,
    /// No union variant accepted the input.
    InvalidUnion,
    /// Number is not a multiple of the step.
    NotMultipleOf,
    /// Number is infinite.
    NotFinite,
    /// Array holds two equal items under `unique`.
    NotUnique,
    /// Intersection members produced outputs that cannot be merged.
    InvalidIntersectionTypes,
}

impl IssueCode {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidType => "invalid_type",
            Self::TooSmall => "too_small",
            Self::TooBig => "too_big",
            Self::InvalidString => "invalid_string",
            Self::Required => "required",
            Self::UnrecognizedKey => "unrecognized_key",
            Self::Custom => "custom",
            Self::UnknownError => "unknown_error",
            Self::InvalidLiteral => "invalid_literal",
            Self::InvalidEnumValue => "invalid_enum_value",
            Self::InvalidUnion => "invalid_union",
            Self::NotMultipleOf => "not_multiple_of",
            Self::NotFinite => "not_finite",
            Self::NotUnique => "not_unique",
            Self::InvalidIntersectionTypes => "invalid_intersection_types",
        }
    }
}

impl fmt::Display for IssueCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// VALIDATION ISSUE
// ============================================================================

/// One recorded validation failure.
///
/// # Examples
///
/// ```
/// use contour::foundation::{IssueCode, PathSegment, ValidationIssue};
///
/// let issue = ValidationIssue::new(IssueCode::TooSmall, "Too short")
///     .with_param("minimum", "3")
///     .prefixed(PathSegment::key("name"));
///
/// assert_eq!(issue.path.to_string(), "name");
/// assert_eq!(issue.param("minimum"), Some("3"));
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationIssue {
    pub code: IssueCode,

    /// Location of the failing sub-value, relative to where the issue is held.
    #[serde(default)]
    pub path: Path,

    pub message: Cow<'static, str>,

    /// Runtime kind (or value) actually seen.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub received: Option<Cow<'static, str>>,

    /// Kind (or value) the node wanted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected: Option<Cow<'static, str>>,

    /// Constraint parameters such as `minimum`, `inclusive` or `key`.
    #[serde(default, skip_serializing_if = "SmallVec::is_empty")]
    pub params: Params,

    /// Issues of every failed union variant.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub nested: Vec<ValidationIssue>,
}

impl ValidationIssue {
    /// Creates an issue at the root path.
    pub fn new(code: IssueCode, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            code,
            path: Path::root(),
            message: message.into(),
            received: None,
            expected: None,
            params: SmallVec::new(),
            nested: Vec::new(),
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_path(mut self, path: impl Into<Path>) -> Self {
        self.path = path.into();
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_received(mut self, received: impl Into<Cow<'static, str>>) -> Self {
        self.received = Some(received.into());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn with_expected(mut self, expected: impl Into<Cow<'static, str>>) -> Self {
        self.expected = Some(expected.into());
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

    #[must_use = "builder methods must be chained or built"]
    pub fn with_nested(mut self, nested: Vec<ValidationIssue>) -> Self {
        self.nested = nested;
        self
    }

    /// Replaces the message when `message` is set.
    #[must_use = "builder methods must be chained or built"]
    pub fn with_message_override(mut self, message: Option<&Cow<'static, str>>) -> Self {
        if let Some(message) = message {
            self.message = message.clone();
        }
        self
    }

    /// Prepends `segment` to this issue's path and to every nested issue.
    #[must_use = "builder methods must be chained or built"]
    pub fn prefixed(mut self, segment: PathSegment) -> Self {
        self.prepend(&Path::from(segment));
        self
    }

    pub(crate) fn prepend(&mut self, prefix: &Path) {
        self.path.prepend_path(prefix);
        for nested in &mut self.nested {
            nested.prepend(prefix);
        }
    }

    /// Looks up a parameter value by key.
    #[must_use]
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params
            .iter()
            .find(|(k, _)| k.as_ref() == key)
            .map(|(_, v)| v.as_ref())
    }
}

impl fmt::Display for ValidationIssue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.path.is_empty() {
            write!(f, "{}: {}", self.code, self.message)
        } else {
            write!(f, "[{}] {}: {}", self.path, self.code, self.message)
        }
    }
}

// ============================================================================
// CONVENIENCE CONSTRUCTORS
// ============================================================================

impl ValidationIssue {
    /// Creates an `invalid_type` issue for `input`.
    pub fn invalid_type(expected: impl Into<Cow<'static, str>>, input: Option<&Value>) -> Self {
        let expected = expected.into();
        let received = ValueKind::of(input).as_str();
        Self::new(
            IssueCode::InvalidType,
            format!("Expected {expected}, received {received}"),
        )
        .with_expected(expected)
        .with_received(received)
    }

    /// Creates a `required` issue for a missing field.
    pub fn required(field: impl Into<String>) -> Self {
        Self::new(IssueCode::Required, "Required")
            .with_path(PathSegment::Key(field.into()))
            .with_received(ValueKind::Undefined.as_str())
    }

    /// Creates a `custom` issue.
    pub fn custom(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(IssueCode::Custom, message)
    }

    /// Creates an `unknown_error` issue from a callback failure.
    pub fn unknown_error(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(IssueCode::UnknownError, message)
    }
}

// ============================================================================
// VALIDATION ERROR
// ============================================================================

/// Every issue recorded by one failed call, in discovery order.
///
/// Never empty; deserializing an empty issue list fails.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ValidationError {
    issues: Vec<ValidationIssue>,
}

/// Returned when an issue list is empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a validation error must hold at least one issue")]
pub struct EmptyIssues;

impl<'de> Deserialize<'de> for ValidationError {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        struct Raw {
            issues: Vec<ValidationIssue>,
        }

        let raw = Raw::deserialize(deserializer)?;
        Self::try_from(raw.issues).map_err(serde::de::Error::custom)
    }
}

impl TryFrom<Vec<ValidationIssue>> for ValidationError {
    type Error = EmptyIssues;

    fn try_from(issues: Vec<ValidationIssue>) -> Result<Self, Self::Error> {
        Self::from_issues(issues).ok_or(EmptyIssues)
    }
}

impl ValidationError {
    /// Creates an error holding a single issue.
    #[must_use]
    pub fn new(issue: ValidationIssue) -> Self {
        Self {
            issues: vec![issue],
        }
    }

    /// Creates an error from a list of issues; `None` when the list is empty.
    #[must_use]
    pub fn from_issues(issues: Vec<ValidationIssue>) -> Option<Self> {
        if issues.is_empty() {
            None
        } else {
            Some(Self { issues })
        }
    }

    #[must_use]
    pub fn issues(&self) -> &[ValidationIssue] {
        &self.issues
    }

    #[must_use]
    pub fn into_issues(self) -> Vec<ValidationIssue> {
        self.issues
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Always false for errors produced by a schema.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// The first recorded issue (the common single-issue case).
    #[must_use]
    pub fn first(&self) -> Option<&ValidationIssue> {
        self.issues.first()
    }

    /// Issues whose path renders as `path` (dotted form).
    #[must_use]
    pub fn issues_at(&self, path: &str) -> Vec<&ValidationIssue> {
        self.issues
            .iter()
            .filter(|issue| issue.path.to_string() == path)
            .collect()
    }

    pub(crate) fn issues_mut(&mut self) -> &mut [ValidationIssue] {
        &mut self.issues
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Validation failed with {} issue(s):", self.issues.len())?;
        for (i, issue) in self.issues.iter().enumerate() {
            writeln!(f, "  {}. {}", i + 1, issue)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationError {}

impl From<ValidationIssue> for ValidationError {
    fn from(issue: ValidationIssue) -> Self {
        Self::new(issue)
    }
}

// ============================================================================
// FAILURE
// ============================================================================

/// Why a node did not produce an output.
#[derive(Debug)]
pub enum Failure {
    /// Recorded issues; composites recover these and keep going.
    Invalid(Vec<ValidationIssue>),
    /// A user callback failed; propagates untouched to the boundary.
    Aborted(BoxError),
}

impl Failure {
    /// A failure holding one issue.
    #[must_use]
    pub fn issue(issue: ValidationIssue) -> Self {
        Self::Invalid(vec![issue])
    }

    /// Prepends `segment` to every recorded issue path.
    #[must_use]
    pub fn prefixed(self, segment: &PathSegment) -> Self {
        match self {
            Self::Invalid(issues) => Self::Invalid(
                issues
                    .into_iter()
                    .map(|issue| issue.prefixed(segment.clone()))
                    .collect(),
            ),
            aborted @ Self::Aborted(_) => aborted,
        }
    }

    /// Normalizes into the caller-facing error.
    ///
    /// An aborted callback becomes a single `unknown_error` issue at the root.
    #[must_use]
    pub fn into_error(self) -> ValidationError {
        match self {
            Self::Invalid(issues) => ValidationError::from_issues(issues).unwrap_or_else(|| {
                ValidationError::new(ValidationIssue::unknown_error(
                    "Validation failed without recording an issue",
                ))
            }),
            Self::Aborted(error) => {
                tracing::debug!(%error, "validation callback aborted");
                ValidationError::new(ValidationIssue::unknown_error(error.to_string()))
            }
        }
    }
}

impl From<ValidationIssue> for Failure {
    fn from(issue: ValidationIssue) -> Self {
        Self::issue(issue)
    }
}

// ============================================================================
// SCHEMA ERROR
// ============================================================================

/// Errors raised while building a schema.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SchemaError {
    /// A string pattern did not compile.
    #[error("invalid pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_invalid_type_records_both_kinds() {
        let issue = ValidationIssue::invalid_type("string", Some(&json!(42)));
        assert_eq!(issue.code, IssueCode::InvalidType);
        assert_eq!(issue.expected.as_deref(), Some("string"));
        assert_eq!(issue.received.as_deref(), Some("number"));
        assert_eq!(issue.message, "Expected string, received number");
    }

    #[test]
    fn test_invalid_type_on_undefined() {
        let issue = ValidationIssue::invalid_type("boolean", None);
        assert_eq!(issue.received.as_deref(), Some("undefined"));
    }

    #[test]
    fn test_prefix_reaches_nested_issues() {
        let issue = ValidationIssue::new(IssueCode::InvalidUnion, "Invalid input").with_nested(
            vec![ValidationIssue::custom("inner").with_path(PathSegment::key("x"))],
        );

        let issue = issue.prefixed(PathSegment::index(2));
        assert_eq!(issue.path.to_string(), "2");
        assert_eq!(issue.nested[0].path.to_string(), "2.x");
    }

    #[test]
    fn test_failure_prefix_leaves_aborted_alone() {
        let failure = Failure::Aborted("boom".into()).prefixed(&PathSegment::key("a"));
        let error = failure.into_error();
        assert_eq!(error.len(), 1);
        assert_eq!(error.issues()[0].code, IssueCode::UnknownError);
        assert_eq!(error.issues()[0].message, "boom");
        assert!(error.issues()[0].path.is_empty());
    }

    #[test]
    fn test_from_issues_rejects_empty() {
        assert!(ValidationError::from_issues(Vec::new()).is_none());
    }

    #[test]
    fn test_deserialize_rejects_empty_issue_list() {
        let result = serde_json::from_value::<ValidationError>(json!({ "issues": [] }));
        let message = result.unwrap_err().to_string();
        assert!(message.contains("at least one issue"), "{message}");
    }

    #[test]
    fn test_deserialize_keeps_issues() {
        let error = ValidationError::new(ValidationIssue::required("email"));
        let json = serde_json::to_value(&error).unwrap();
        let back: ValidationError = serde_json::from_value(json).unwrap();
        assert_eq!(back, error);
    }

    #[test]
    fn test_try_from_vec_rejects_empty() {
        assert_eq!(ValidationError::try_from(Vec::new()), Err(EmptyIssues));
    }

    #[test]
    fn test_display_lists_every_issue() {
        let error = ValidationError::from_issues(vec![
            ValidationIssue::required("email"),
            ValidationIssue::custom("Passwords differ"),
        ])
        .unwrap();

        let display = error.to_string();
        assert!(display.contains("2 issue(s)"));
        assert!(display.contains("1. [email] required: Required"));
        assert!(display.contains("2. custom: Passwords differ"));
    }

    #[test]
    fn test_issue_serializes_snake_case_code() {
        let issue = ValidationIssue::required("name");
        let json = serde_json::to_value(&issue).unwrap();
        assert_eq!(json["code"], "required");
        assert_eq!(json["path"], json!(["name"]));
        assert!(json.get("nested").is_none());
    }

    #[test]
    fn test_zero_alloc_static_message() {
        let issue = ValidationIssue::custom("static");
        assert!(matches!(issue.message, Cow::Borrowed(_)));
    }
}
