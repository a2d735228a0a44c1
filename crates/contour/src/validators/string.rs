//! String schema
//!
//! Checks run in declaration order and stop at the first failure. Text
//! transforms run only after every check has passed.

use std::borrow::Cow;

use serde_json::Value;

use crate::foundation::definition::{Constraint, StringCheck, StringFormat, TextTransform};
use crate::foundation::{
    IssueCode, Outcome, SchemaDefinition, SchemaError, Validate, ValidationIssue, kind,
};
use crate::schema::{Node, Schema};

#[derive(Debug, Clone)]
struct Rule {
    constraint: Constraint<StringCheck>,
    pattern: Option<regex::Regex>,
}

/// Builder and validator for string inputs.
///
/// Lengths are counted in Unicode scalar values.
///
/// # Examples
///
/// ```
/// use contour::prelude::*;
/// use serde_json::json;
///
/// let username = string().min(3).max(16).trim().to_lowercase();
/// assert_eq!(username.parse(&json!("  Ada  ")).unwrap(), json!("ada"));
///
/// let error = username.parse(&json!("ab")).unwrap_err();
/// assert_eq!(error.issues()[0].code, IssueCode::TooSmall);
/// ```
#[derive(Debug, Clone)]
pub struct StringSchema {
    rules: Vec<Rule>,
    transforms: Vec<TextTransform>,
}

impl StringSchema {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            rules: Vec::new(),
            transforms: Vec::new(),
        }
    }

    fn check(mut self, check: StringCheck) -> Self {
        self.rules.push(Rule {
            constraint: Constraint::new(check),
            pattern: None,
        });
        self
    }

    /// At least `min` characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn min(self, min: usize) -> Self {
        self.check(StringCheck::Min { value: min })
    }

    /// At most `max` characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn max(self, max: usize) -> Self {
        self.check(StringCheck::Max { value: max })
    }

    /// Exactly `length` characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn length(self, length: usize) -> Self {
        self.check(StringCheck::Length { value: length })
    }

    /// Shorthand for `min(1)`.
    #[must_use = "builder methods must be chained or built"]
    pub fn nonempty(self) -> Self {
        self.min(1)
    }

    /// Must match `regex` somewhere in the input.
    #[must_use = "builder methods must be chained or built"]
    pub fn regex(mut self, regex: regex::Regex) -> Self {
        self.rules.push(Rule {
            constraint: Constraint::new(StringCheck::Regex {
                pattern: regex.as_str().to_owned(),
            }),
            pattern: Some(regex),
        });
        self
    }

    /// Compiles `pattern` and adds it as a [`regex`](Self::regex) check.
    ///
    /// # Errors
    ///
    /// Returns [`SchemaError::InvalidPattern`] when `pattern` does not compile.
    pub fn pattern(self, pattern: &str) -> Result<Self, SchemaError> {
        Ok(self.regex(regex::Regex::new(pattern)?))
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn format(self, format: StringFormat) -> Self {
        self.check(StringCheck::Format { format })
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn email(self) -> Self {
        self.format(StringFormat::Email)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn url(self) -> Self {
        self.format(StringFormat::Url)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn uuid(self) -> Self {
        self.format(StringFormat::Uuid)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn ipv4(self) -> Self {
        self.format(StringFormat::Ipv4)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn ipv6(self) -> Self {
        self.format(StringFormat::Ipv6)
    }

    /// IPv4 or IPv6.
    #[must_use = "builder methods must be chained or built"]
    pub fn ip(self) -> Self {
        self.format(StringFormat::Ip)
    }

    /// ISO 8601 date-time with `Z` or a numeric offset.
    #[must_use = "builder methods must be chained or built"]
    pub fn datetime(self) -> Self {
        self.format(StringFormat::Datetime)
    }

    /// `YYYY-MM-DD`.
    #[must_use = "builder methods must be chained or built"]
    pub fn date(self) -> Self {
        self.format(StringFormat::Date)
    }

    /// `HH:MM[:SS[.fff]]`.
    #[must_use = "builder methods must be chained or built"]
    pub fn time(self) -> Self {
        self.format(StringFormat::Time)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn base64(self) -> Self {
        self.format(StringFormat::Base64)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn starts_with(self, prefix: impl Into<String>) -> Self {
        self.check(StringCheck::StartsWith {
            value: prefix.into(),
        })
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn ends_with(self, suffix: impl Into<String>) -> Self {
        self.check(StringCheck::EndsWith {
            value: suffix.into(),
        })
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn includes(self, needle: impl Into<String>) -> Self {
        self.check(StringCheck::Includes {
            value: needle.into(),
        })
    }

    /// Replaces the message of the most recently added check.
    #[must_use = "builder methods must be chained or built"]
    pub fn message(mut self, message: impl Into<Cow<'static, str>>) -> Self {
        if let Some(rule) = self.rules.last_mut() {
            rule.constraint.message = Some(message.into());
        }
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn trim(mut self) -> Self {
        self.transforms.push(TextTransform::Trim);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn to_lowercase(mut self) -> Self {
        self.transforms.push(TextTransform::ToLowercase);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn to_uppercase(mut self) -> Self {
        self.transforms.push(TextTransform::ToUppercase);
        self
    }

    fn apply_transforms(&self, input: &str) -> String {
        self.transforms
            .iter()
            .fold(input.to_owned(), |text, transform| match transform {
                TextTransform::Trim => text.trim().to_owned(),
                TextTransform::ToLowercase => text.to_lowercase(),
                TextTransform::ToUppercase => text.to_uppercase(),
            })
    }
}

impl Rule {
    fn evaluate(&self, input: &str) -> Result<(), ValidationIssue> {
        let issue = match &self.constraint.kind {
            StringCheck::Min { value } => {
                let len = input.chars().count();
                (len < *value).then(|| {
                    ValidationIssue::new(
                        IssueCode::TooSmall,
                        format!("String must contain at least {value} character(s)"),
                    )
                    .with_param("minimum", value.to_string())
                    .with_param("inclusive", "true")
                    .with_param("type", "string")
                })
            }
            StringCheck::Max { value } => {
                let len = input.chars().count();
                (len > *value).then(|| {
                    ValidationIssue::new(
                        IssueCode::TooBig,
                        format!("String must contain at most {value} character(s)"),
                    )
                    .with_param("maximum", value.to_string())
                    .with_param("inclusive", "true")
                    .with_param("type", "string")
                })
            }
            StringCheck::Length { value } => {
                let len = input.chars().count();
                let message = format!("String must contain exactly {value} character(s)");
                let issue = match len.cmp(value) {
                    std::cmp::Ordering::Less => Some(
                        ValidationIssue::new(IssueCode::TooSmall, message)
                            .with_param("minimum", value.to_string()),
                    ),
                    std::cmp::Ordering::Greater => Some(
                        ValidationIssue::new(IssueCode::TooBig, message)
                            .with_param("maximum", value.to_string()),
                    ),
                    std::cmp::Ordering::Equal => None,
                };
                issue.map(|issue| issue.with_param("exact", "true").with_param("type", "string"))
            }
            StringCheck::Regex { pattern } => {
                let matched = self.pattern.as_ref().is_some_and(|re| re.is_match(input));
                (!matched).then(|| {
                    ValidationIssue::new(IssueCode::InvalidString, "Invalid")
                        .with_param("validation", "regex")
                        .with_param("pattern", pattern.clone())
                })
            }
            StringCheck::Format { format } => (!format.matches(input)).then(|| {
                ValidationIssue::new(IssueCode::InvalidString, format.message())
                    .with_param("validation", format.as_str())
            }),
            StringCheck::StartsWith { value } => (!input.starts_with(value.as_str())).then(|| {
                ValidationIssue::new(
                    IssueCode::InvalidString,
                    format!("Invalid input: must start with \"{value}\""),
                )
                .with_param("validation", "starts_with")
                .with_param("value", value.clone())
            }),
            StringCheck::EndsWith { value } => (!input.ends_with(value.as_str())).then(|| {
                ValidationIssue::new(
                    IssueCode::InvalidString,
                    format!("Invalid input: must end with \"{value}\""),
                )
                .with_param("validation", "ends_with")
                .with_param("value", value.clone())
            }),
            StringCheck::Includes { value } => (!input.contains(value.as_str())).then(|| {
                ValidationIssue::new(
                    IssueCode::InvalidString,
                    format!("Invalid input: must include \"{value}\""),
                )
                .with_param("validation", "includes")
                .with_param("value", value.clone())
            }),
        };

        match issue {
            Some(issue) => Err(issue.with_message_override(self.constraint.message.as_ref())),
            None => Ok(()),
        }
    }
}

impl Validate for StringSchema {
    fn validate(&self, input: Option<&Value>) -> Outcome {
        let Some(text) = kind::as_string(input) else {
            return Err(ValidationIssue::invalid_type("string", input).into());
        };

        for rule in &self.rules {
            rule.evaluate(text)?;
        }

        if self.transforms.is_empty() {
            Ok(input.cloned())
        } else {
            Ok(Some(Value::String(self.apply_transforms(text))))
        }
    }

    fn definition(&self) -> SchemaDefinition {
        SchemaDefinition::String {
            checks: self.rules.iter().map(|rule| rule.constraint.clone()).collect(),
            transforms: self.transforms.clone(),
        }
    }

    fn into_schema(self) -> Schema {
        Schema::new(Node::String(self))
    }
}

/// Creates a string schema.
#[must_use]
pub const fn string() -> StringSchema {
    StringSchema::new()
}

// ============================================================================
// TESTS
// ============================================================================
