//! LAZY combinator - deferred schema construction
//!
//! Allows recursive schemas: the closure runs on first validation and the
//! built schema is cached for every later call.

use std::fmt;
use std::sync::OnceLock;

use crate::foundation::Validate;
use crate::schema::Schema;

// ============================================================================
// LAZY COMBINATOR
// ============================================================================

/// Defers schema creation until first use.
pub struct Lazy {
    init: Box<dyn Fn() -> Schema + Send + Sync>,
    schema: OnceLock<Schema>,
}

impl Lazy {
    /// Creates a new LAZY combinator.
    ///
    /// The `init` function is called once on first validation.
    pub fn new<V, F>(init: F) -> Self
    where
        V: Validate,
        F: Fn() -> V + Send + Sync + 'static,
    {
        Self {
            init: Box::new(move || init().into_schema()),
            schema: OnceLock::new(),
        }
    }

    /// Returns the built schema, if any.
    pub fn get(&self) -> Option<&Schema> {
        self.schema.get()
    }

    pub fn is_initialized(&self) -> bool {
        self.schema.get().is_some()
    }

    /// Forces initialization and returns the schema.
    pub fn force(&self) -> &Schema {
        self.schema.get_or_init(|| {
            tracing::debug!("building lazy schema");
            (self.init)()
        })
    }
}

impl fmt::Debug for Lazy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Lazy")
            .field("initialized", &self.is_initialized())
            .finish()
    }
}

/// Creates a LAZY schema.
///
/// # Examples
///
/// ```
/// use contour::prelude::*;
/// use serde_json::json;
///
/// fn category() -> ObjectSchema {
///     object! {
///         name: string(),
///         children: array(lazy(category)),
///     }
/// }
///
/// let tree = json!({
///     "name": "root",
///     "children": [{ "name": "leaf", "children": [] }]
/// });
/// assert!(category().parse(&tree).is_ok());
///
/// let bad = json!({ "name": "root", "children": [{ "name": 1, "children": [] }] });
/// let error = category().parse(&bad).unwrap_err();
/// assert_eq!(error.issues()[0].path.to_string(), "children.0.name");
/// ```
pub fn lazy<V, F>(init: F) -> Schema
where
    V: Validate,
    F: Fn() -> V + Send + Sync + 'static,
{
    Schema::from_lazy(Lazy::new(init))
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::*;
    use serde_json::json;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_builds_once() {
        let builds = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&builds);
        let schema = lazy(move || {
            counter.fetch_add(1, Ordering::SeqCst);
            string()
        });

        assert_eq!(builds.load(Ordering::SeqCst), 0);
        assert!(schema.parse(&json!("a")).is_ok());
        assert!(schema.parse(&json!(1)).is_err());
        assert_eq!(builds.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_definition_is_not_expanded() {
        let schema = lazy(string);
        assert_eq!(schema.definition(), SchemaDefinition::Lazy);
    }

    #[test]
    fn test_force_and_get() {
        let lazy = Lazy::new(number);
        assert!(lazy.get().is_none());
        let _ = lazy.force();
        assert!(lazy.is_initialized());
    }

    #[test]
    fn test_optional_inside_lazy_may_be_missing() {
        let schema = object! { next: lazy(|| number().optional()) };
        assert_eq!(schema.parse(&json!({})).unwrap(), json!({}));
    }
}
