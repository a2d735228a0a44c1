//! Non-throwing parse result

use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};
use serde_json::Value;

use super::error::ValidationError;

/// Result of [`safe_parse`](super::ValidateExt::safe_parse).
///
/// Serializes as `{"success": true, "data": ...}` or
/// `{"success": false, "error": ...}`.
#[derive(Debug, Clone, PartialEq)]
#[must_use]
pub enum SafeParse<T = Value> {
    Success(T),
    Failure(ValidationError),
}

impl<T> SafeParse<T> {
    pub const fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub const fn is_failure(&self) -> bool {
        !self.is_success()
    }

    pub const fn data(&self) -> Option<&T> {
        match self {
            Self::Success(data) => Some(data),
            Self::Failure(_) => None,
        }
    }

    pub const fn error(&self) -> Option<&ValidationError> {
        match self {
            Self::Success(_) => None,
            Self::Failure(error) => Some(error),
        }
    }

    /// Converts into a standard `Result`.
    ///
    /// # Errors
    ///
    /// Returns the contained error on failure.
    pub fn into_result(self) -> Result<T, ValidationError> {
        match self {
            Self::Success(data) => Ok(data),
            Self::Failure(error) => Err(error),
        }
    }

    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> SafeParse<U> {
        match self {
            Self::Success(data) => SafeParse::Success(f(data)),
            Self::Failure(error) => SafeParse::Failure(error),
        }
    }
}

impl<T> From<Result<T, ValidationError>> for SafeParse<T> {
    fn from(result: Result<T, ValidationError>) -> Self {
        match result {
            Ok(data) => Self::Success(data),
            Err(error) => Self::Failure(error),
        }
    }
}

impl<T: Serialize> Serialize for SafeParse<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("SafeParse", 2)?;
        state.serialize_field("success", &self.is_success())?;
        match self {
            Self::Success(data) => state.serialize_field("data", data)?,
            Self::Failure(error) => state.serialize_field("error", error)?,
        }
        state.end()
    }
}
