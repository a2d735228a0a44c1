//! Parse monitoring hooks
//!
//! [`ParseObserver`] receives the start, success and failure of every call
//! made through a [`Monitored`] schema. Observers never change the result.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde_json::Value;

use crate::foundation::{SafeParse, ValidateExt, ValidationError};
use crate::schema::Schema;

/// Receives lifecycle events of monitored parse calls.
///
/// Every method has an empty default.
pub trait ParseObserver: Send + Sync {
    fn on_start(&self, _input: &Value) {}

    fn on_success(&self, _output: &Value, _elapsed: Duration) {}

    fn on_error(&self, _error: &ValidationError, _elapsed: Duration) {}
}

/// Emits `tracing` events for each call.
#[derive(Debug, Clone)]
pub struct TracingObserver {
    name: Cow<'static, str>,
}

impl TracingObserver {
    /// `name` is attached to every event as the `schema` field.
    pub fn new(name: impl Into<Cow<'static, str>>) -> Self {
        Self { name: name.into() }
    }
}

impl ParseObserver for TracingObserver {
    fn on_start(&self, _input: &Value) {
        tracing::trace!(schema = %self.name, "parse started");
    }

    fn on_success(&self, _output: &Value, elapsed: Duration) {
        tracing::debug!(
            schema = %self.name,
            elapsed_us = elapsed.as_micros() as u64,
            "parse succeeded"
        );
    }

    fn on_error(&self, error: &ValidationError, elapsed: Duration) {
        tracing::info!(
            schema = %self.name,
            issues = error.len(),
            elapsed_us = elapsed.as_micros() as u64,
            "parse failed"
        );
    }
}

/// A schema whose parse calls are reported to an observer.
///
/// # Examples
///
/// ```
/// use contour::extension::TracingObserver;
/// use contour::prelude::*;
/// use serde_json::json;
///
/// let schema = number().into_schema().monitored(TracingObserver::new("age"));
/// assert_eq!(schema.parse(&json!(3)).unwrap(), json!(3));
/// assert!(schema.safe_parse(&json!("3")).is_failure());
/// ```
#[derive(Clone)]
pub struct Monitored {
    schema: Schema,
    observer: Arc<dyn ParseObserver>,
}

impl Monitored {
    pub fn new(schema: Schema, observer: impl ParseObserver + 'static) -> Self {
        Self {
            schema,
            observer: Arc::new(observer),
        }
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    /// [`ValidateExt::parse`] with observer callbacks.
    pub fn parse(&self, input: &Value) -> Result<Value, ValidationError> {
        let started = self.start(input);
        let result = self.schema.parse(input);
        self.finish(result.as_ref(), started);
        result
    }

    /// [`ValidateExt::safe_parse`] with observer callbacks.
    pub fn safe_parse(&self, input: &Value) -> SafeParse {
        let started = self.start(input);
        let result = self.schema.safe_parse(input);
        match &result {
            SafeParse::Success(output) => self.finish(Ok(output), started),
            SafeParse::Failure(error) => self.finish(Err(error), started),
        }
        result
    }

    fn start(&self, input: &Value) -> Instant {
        self.observer.on_start(input);
        Instant::now()
    }

    fn finish(&self, result: Result<&Value, &ValidationError>, started: Instant) {
        let elapsed = started.elapsed();
        match result {
            Ok(output) => self.observer.on_success(output, elapsed),
            Err(error) => self.observer.on_error(error, elapsed),
        }
    }
}

impl fmt::Debug for Monitored {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Monitored")
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}
