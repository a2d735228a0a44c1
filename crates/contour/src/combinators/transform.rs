//! TRANSFORM combinator - maps a validated output

use std::fmt;

use serde_json::Value;

/// A total mapping applied after the inner node succeeds.
///
/// Transforms cannot fail; express failures with an earlier
/// [`refine`](crate::ValidateExt::refine). A panic inside the closure is
/// caught by `safe_parse` and propagates out of `parse`.
pub struct Transform(Box<dyn Fn(Value) -> Value + Send + Sync>);

impl Transform {
    pub(crate) fn new<F>(transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self(Box::new(transform))
    }

    pub(crate) fn apply(&self, value: Value) -> Value {
        (self.0)(value)
    }
}

impl fmt::Debug for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Transform")
    }
}

#[cfg(test)]
mod tests {
    use crate::prelude::*;
    use serde_json::json;

    #[test]
    fn test_transform_runs_after_validation() {
        let schema = string().transform(|v| json!(v.as_str().map_or(0, str::len)));
        assert_eq!(schema.parse(&json!("four")).unwrap(), json!(4));
        assert!(schema.parse(&json!(4)).is_err());
    }

    #[test]
    fn test_transform_skips_undefined() {
        let schema = string().optional().transform(|_| json!("touched"));
        assert_eq!(schema.parse_opt(None).unwrap(), None);
    }

    #[test]
    fn test_pipe_feeds_output_forward() {
        let schema = string()
            .transform(|v| json!(v.as_str().map_or(0, str::len)))
            .pipe(number().min(3.0));

        assert_eq!(schema.parse(&json!("abc")).unwrap(), json!(3));
        let error = schema.parse(&json!("ab")).unwrap_err();
        assert_eq!(error.issues()[0].code, IssueCode::TooSmall);
    }
}
