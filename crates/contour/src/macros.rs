//! Declaration macros
//!
//! - [`object!`](crate::object): builds an [`ObjectSchema`](crate::validators::ObjectSchema)
//!   from `key: schema` pairs

// ============================================================================
// OBJECT MACRO
// ============================================================================

/// Builds an object schema from `key: schema` pairs, in declaration order.
///
/// Keys are identifiers or string literals.
///
/// # Examples
///
/// ```
/// use contour::prelude::*;
/// use serde_json::json;
///
/// let headers = object! {
///     host: string(),
///     "content-length": number().int().nonnegative(),
/// }
/// .strict();
///
/// assert!(headers.parse(&json!({ "host": "a", "content-length": 3 })).is_ok());
/// assert_eq!(object! {}.shape().len(), 0);
/// ```
#[macro_export]
macro_rules! object {
    () => {
        $crate::validators::ObjectSchema::new()
    };
    ($($key:tt : $schema:expr),+ $(,)?) => {
        $crate::validators::ObjectSchema::new()
            $(.field($crate::__object_key!($key), $schema))+
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __object_key {
    ($key:ident) => {
        ::core::stringify!($key)
    };
    ($key:literal) => {
        $key
    };
}
