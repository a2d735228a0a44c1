//! The shareable schema handle
//!
//! A [`Schema`] is an `Arc` over one immutable [`Node`]. Wrappers build a new
//! node around the old handle, so cloning and wrapping never copy a tree.

use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::combinators::{Lazy, Refinement, Transform};
use crate::extension::{AsyncRefinement, AsyncSchema, Monitored, ParseObserver};
use crate::foundation::{
    Outcome, SafeParse, SchemaDefinition, Validate, ValidateExt, ValidationError,
};
use crate::validators::{
    ArraySchema, CustomSchema, EnumSchema, IntersectionSchema, LiteralSchema, NumberSchema,
    ObjectSchema, Primitive, RecordSchema, StringSchema, UnionSchema,
};

/// Every kind of schema node.
pub(crate) enum Node {
    Primitive(Primitive),
    String(StringSchema),
    Number(NumberSchema),
    Literal(LiteralSchema),
    Enum(EnumSchema),
    Custom(CustomSchema),
    Object(ObjectSchema),
    Array(ArraySchema),
    Record(RecordSchema),
    Union(UnionSchema),
    Intersection(IntersectionSchema),
    Optional(Schema),
    Nullable(Schema),
    Default { inner: Schema, value: Value },
    Catch { inner: Schema, fallback: Value },
    Refine { inner: Schema, refinement: Refinement },
    Transform { inner: Schema, transform: Transform },
    Pipe { input: Schema, output: Schema },
    Brand { inner: Schema, name: Cow<'static, str> },
    Lazy(Lazy),
}

/// An immutable, cheaply cloneable schema.
///
/// `Send + Sync`: one schema may validate on many threads at once.
#[derive(Clone)]
pub struct Schema {
    node: Arc<Node>,
}

impl Schema {
    pub(crate) fn new(node: Node) -> Self {
        Self {
            node: Arc::new(node),
        }
    }

    pub(crate) fn optional_of(inner: Self) -> Self {
        Self::new(Node::Optional(inner))
    }

    pub(crate) fn nullable_of(inner: Self) -> Self {
        Self::new(Node::Nullable(inner))
    }

    pub(crate) fn with_default(inner: Self, value: Value) -> Self {
        Self::new(Node::Default { inner, value })
    }

    pub(crate) fn catch_of(inner: Self, fallback: Value) -> Self {
        Self::new(Node::Catch { inner, fallback })
    }

    pub(crate) fn refined(inner: Self, refinement: Refinement) -> Self {
        Self::new(Node::Refine { inner, refinement })
    }

    pub(crate) fn transformed<F>(inner: Self, transform: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Self::new(Node::Transform {
            inner,
            transform: Transform::new(transform),
        })
    }

    pub(crate) fn piped(input: Self, output: Self) -> Self {
        Self::new(Node::Pipe { input, output })
    }

    pub(crate) fn branded(inner: Self, name: Cow<'static, str>) -> Self {
        Self::new(Node::Brand { inner, name })
    }

    pub(crate) fn from_lazy(lazy: Lazy) -> Self {
        Self::new(Node::Lazy(lazy))
    }

    /// Whether the outermost node is `optional`.
    pub fn is_optional(&self) -> bool {
        matches!(*self.node, Node::Optional(_))
    }

    /// The wrapped schema when the outermost node is `optional`, else `self`.
    #[must_use]
    pub fn unwrap_optional(&self) -> Self {
        match &*self.node {
            Node::Optional(inner) => inner.clone(),
            _ => self.clone(),
        }
    }

    /// The object node, when this schema is one.
    pub fn as_object(&self) -> Option<&ObjectSchema> {
        match &*self.node {
            Node::Object(object) => Some(object),
            _ => None,
        }
    }

    /// The array node, when this schema is one.
    pub fn as_array(&self) -> Option<&ArraySchema> {
        match &*self.node {
            Node::Array(array) => Some(array),
            _ => None,
        }
    }

    /// Recursively relaxes nested objects for
    /// [`ObjectSchema::deep_partial`].
    pub(crate) fn deep_partial(&self) -> Self {
        match &*self.node {
            Node::Object(object) => object.clone().deep_partial().into_schema(),
            Node::Array(array) => {
                let element = array.element().deep_partial();
                array.clone().with_element(element).into_schema()
            }
            Node::Optional(inner) => inner.deep_partial().optional(),
            Node::Nullable(inner) => inner.deep_partial().nullable(),
            _ => self.clone(),
        }
    }

    /// Attaches an asynchronous refinement, run after synchronous validation.
    pub fn with_async_refinement(self, refinement: impl AsyncRefinement + 'static) -> AsyncSchema {
        AsyncSchema::new(self).with_async_refinement(refinement)
    }

    /// Reports every `parse` / `safe_parse` call to `observer`.
    pub fn monitored(self, observer: impl ParseObserver + 'static) -> Monitored {
        Monitored::new(self, observer)
    }

    /// Asynchronous form of [`parse`](ValidateExt::parse).
    ///
    /// Resolves immediately; validation itself never suspends.
    pub async fn parse_async(&self, input: &Value) -> Result<Value, ValidationError> {
        self.parse(input)
    }

    /// Asynchronous form of [`safe_parse`](ValidateExt::safe_parse).
    pub async fn safe_parse_async(&self, input: &Value) -> SafeParse {
        self.safe_parse(input)
    }
}

// ============================================================================
// EVALUATION
// ============================================================================

impl Validate for Schema {
    fn validate(&self, input: Option<&Value>) -> Outcome {
        match &*self.node {
            Node::Primitive(node) => node.validate(input),
            Node::String(node) => node.validate(input),
            Node::Number(node) => node.validate(input),
            Node::Literal(node) => node.validate(input),
            Node::Enum(node) => node.validate(input),
            Node::Custom(node) => node.validate(input),
            Node::Object(node) => node.validate(input),
            Node::Array(node) => node.validate(input),
            Node::Record(node) => node.validate(input),
            Node::Union(node) => node.validate(input),
            Node::Intersection(node) => node.validate(input),
            Node::Optional(inner) => match input {
                None => Ok(None),
                Some(_) => inner.validate(input),
            },
            Node::Nullable(inner) => match input {
                Some(Value::Null) => Ok(Some(Value::Null)),
                _ => inner.validate(input),
            },
            Node::Default { inner, value } => match input {
                None => Ok(Some(value.clone())),
                Some(_) => inner.validate(input),
            },
            Node::Catch { inner, fallback } => inner.validate(input).or_else(|failure| {
                tracing::trace!(?failure, "catch substituted fallback");
                Ok(Some(fallback.clone()))
            }),
            Node::Refine { inner, refinement } => {
                let output = inner.validate(input)?;
                if let Some(value) = &output {
                    refinement.apply(value)?;
                }
                Ok(output)
            }
            Node::Transform { inner, transform } => {
                Ok(inner.validate(input)?.map(|value| transform.apply(value)))
            }
            Node::Pipe { input: first, output: second } => {
                let middle = first.validate(input)?;
                second.validate(middle.as_ref())
            }
            Node::Brand { inner, .. } => inner.validate(input),
            Node::Lazy(lazy) => lazy.force().validate(input),
        }
    }

    fn definition(&self) -> SchemaDefinition {
        match &*self.node {
            Node::Primitive(node) => node.definition(),
            Node::String(node) => node.definition(),
            Node::Number(node) => node.definition(),
            Node::Literal(node) => node.definition(),
            Node::Enum(node) => node.definition(),
            Node::Custom(node) => node.definition(),
            Node::Object(node) => node.definition(),
            Node::Array(node) => node.definition(),
            Node::Record(node) => node.definition(),
            Node::Union(node) => node.definition(),
            Node::Intersection(node) => node.definition(),
            Node::Optional(inner) => SchemaDefinition::Optional {
                inner: Box::new(inner.definition()),
            },
            Node::Nullable(inner) => SchemaDefinition::Nullable {
                inner: Box::new(inner.definition()),
            },
            Node::Default { inner, value } => SchemaDefinition::Default {
                inner: Box::new(inner.definition()),
                value: value.clone(),
            },
            Node::Catch { inner, fallback } => SchemaDefinition::Catch {
                inner: Box::new(inner.definition()),
                fallback: fallback.clone(),
            },
            Node::Refine { inner, refinement } => SchemaDefinition::Refine {
                inner: Box::new(inner.definition()),
                message: refinement.message(),
            },
            Node::Transform { inner, .. } => SchemaDefinition::Transform {
                inner: Box::new(inner.definition()),
            },
            Node::Pipe { input, output } => SchemaDefinition::Pipe {
                input: Box::new(input.definition()),
                output: Box::new(output.definition()),
            },
            Node::Brand { inner, name } => SchemaDefinition::Brand {
                inner: Box::new(inner.definition()),
                brand: name.clone(),
            },
            Node::Lazy(_) => SchemaDefinition::Lazy,
        }
    }

    fn into_schema(self) -> Schema {
        self
    }

    fn accepts_missing(&self) -> bool {
        match &*self.node {
            Node::Optional(_) | Node::Default { .. } | Node::Catch { .. } => true,
            Node::Primitive(node) => node.accepts_missing(),
            Node::Union(node) => node.accepts_missing(),
            Node::Intersection(node) => node.accepts_missing(),
            Node::Nullable(inner)
            | Node::Refine { inner, .. }
            | Node::Transform { inner, .. }
            | Node::Brand { inner, .. }
            | Node::Pipe { input: inner, .. } => inner.accepts_missing(),
            Node::Lazy(lazy) => lazy.force().accepts_missing(),
            _ => false,
        }
    }
}

impl fmt::Debug for Schema {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Schema").field(&self.definition()).finish()
    }
}

macro_rules! impl_from_node {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl From<$ty> for Schema {
                fn from(node: $ty) -> Self {
                    node.into_schema()
                }
            }
        )+
    };
}

impl_from_node!(
    Primitive,
    StringSchema,
    NumberSchema,
    LiteralSchema,
    EnumSchema,
    CustomSchema,
    ObjectSchema,
    ArraySchema,
    RecordSchema,
    UnionSchema,
    IntersectionSchema,
);

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::IssueCode;
    use crate::validators::{any, array, number, object, string};
    use serde_json::json;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn assert_send_sync<T: Send + Sync>() {}

    #[test]
    fn test_schema_is_send_sync() {
        assert_send_sync::<Schema>();
    }

    #[test]
    fn test_optional_does_not_invoke_child() {
        static CALLS: AtomicUsize = AtomicUsize::new(0);
        let schema = any()
            .refine(
                |_| {
                    CALLS.fetch_add(1, Ordering::SeqCst);
                    true
                },
                "unused",
            )
            .optional();

        assert_eq!(schema.parse_opt(None).unwrap(), None);
        assert_eq!(CALLS.load(Ordering::SeqCst), 0);
        assert!(schema.parse(&json!(1)).is_ok());
        assert_eq!(CALLS.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_nullable_short_circuits_null() {
        let schema = string().nullable();
        assert_eq!(schema.parse(&json!(null)).unwrap(), json!(null));
        assert!(schema.parse(&json!(1)).is_err());
        assert!(schema.parse_opt(None).is_err());
    }

    #[test]
    fn test_default_only_replaces_undefined() {
        let schema = number().default(7);
        assert_eq!(schema.parse_opt(None).unwrap(), Some(json!(7)));
        assert_eq!(schema.parse(&json!(1)).unwrap(), json!(1));
        assert!(schema.parse(&json!(null)).is_err());
    }

    #[test]
    fn test_catch_replaces_failure_and_abort() {
        let schema = number().catch(0);
        assert_eq!(schema.parse(&json!("x")).unwrap(), json!(0));
        assert_eq!(schema.parse(&json!(5)).unwrap(), json!(5));

        let aborting = number()
            .try_refine(|_| Err("down".into()), "unused")
            .catch(-1);
        assert_eq!(aborting.parse(&json!(5)).unwrap(), json!(-1));
    }

    #[test]
    fn test_brand_is_identity() {
        let schema = string().brand("UserId");
        assert_eq!(schema.parse(&json!("u1")).unwrap(), json!("u1"));
        assert_eq!(
            schema.definition(),
            SchemaDefinition::Brand {
                inner: Box::new(string().definition()),
                brand: "UserId".into(),
            }
        );
    }

    #[test]
    fn test_accepts_missing_through_wrappers() {
        assert!(string().optional().nullable().accepts_missing());
        assert!(string().default("x").brand("B").accepts_missing());
        assert!(!string().nullable().accepts_missing());
        assert!(any().into_schema().accepts_missing());
    }

    #[test]
    fn test_unwrap_optional() {
        let schema = string().optional();
        assert!(schema.is_optional());
        assert!(!schema.unwrap_optional().is_optional());
    }

    #[test]
    fn test_deep_partial_keeps_array_checks() {
        let schema = object()
            .field("tags", array(object().field("name", string())).min(1))
            .deep_partial();
        let error = schema.parse(&json!({ "tags": [] })).unwrap_err();
        assert_eq!(error.issues()[0].code, IssueCode::TooSmall);
    }

    #[test]
    fn test_debug_uses_definition() {
        let rendered = format!("{:?}", number().optional());
        assert!(rendered.starts_with("Schema(Optional"));
    }

    #[tokio::test]
    async fn test_async_veneer_matches_sync() {
        let schema = number().int().into_schema();
        assert_eq!(schema.parse_async(&json!(2)).await.unwrap(), json!(2));
        assert!(schema.safe_parse_async(&json!(2.5)).await.is_failure());
    }
}
