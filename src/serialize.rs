//! Route instance to relative URL.
//!
//! Serialization walks the route's annotated fields, collects a path
//! parameter map and a query parameter map, fills the pattern from the first
//! and appends the second as an encoded query string.
//!
//! Fields are visited in declaration order and merged into shared maps, so a
//! later field writing a key an earlier field already wrote wins.

use crate::error::{Result, RouteError};
use crate::field::{
    encode_query, validate_fields, Binding, Field, ParamValue, PathParams, QueryParams,
    QueryValue, ValueKind,
};
use crate::pattern::{compile, substitute};
use crate::typed::Route;
use std::any::type_name;
use tracing::debug;

/// Collect the path and query parameter maps of `route`.
///
/// Null fields are skipped. Plain fields contribute their string form under
/// their external key; a Boolean-kind field contributes a bare query flag when
/// truthy and nothing at all to the path. Serde pairs contribute whatever
/// their serialize function returns.
///
/// # Errors
///
/// Returns [`RouteError::InvalidAnnotation`] for a broken field table and
/// [`RouteError::FieldConversion`] when a custom serializer fails.
pub fn collect_params<R: Route>(route: &R) -> Result<(PathParams, QueryParams)> {
    let fields = R::fields();
    validate_fields(&fields)?;

    let mut path = PathParams::new();
    let mut query = QueryParams::new();

    for field in &fields {
        let key = field.external_key();
        match &field.binding {
            Binding::PlainPath(slot) => {
                if field.value_kind() == ValueKind::Boolean || slot.is_null(route) {
                    continue;
                }
                if let Some(value) = slot.render(route) {
                    path.insert(key.to_string(), value.into_path_segment());
                }
            }
            Binding::PlainQuery(slot) => {
                if slot.is_null(route) {
                    continue;
                }
                if field.value_kind() == ValueKind::Boolean {
                    if slot.is_truthy(route) {
                        query.insert(key.to_string(), QueryValue::Flag);
                    }
                    continue;
                }
                match slot.render(route) {
                    Some(ParamValue::One(value)) => {
                        query.insert(key.to_string(), QueryValue::Single(value));
                    }
                    Some(ParamValue::Many(values)) => {
                        query.insert(key.to_string(), QueryValue::Multi(values));
                    }
                    None => {}
                }
            }
            Binding::SerdePath(slot) => {
                if let Some(result) = slot.serialize(route) {
                    path.extend(result.map_err(|source| conversion_error::<R>(field, source))?);
                }
            }
            Binding::SerdeQuery(slot) => {
                if let Some(result) = slot.serialize(route) {
                    query.extend(result.map_err(|source| conversion_error::<R>(field, source))?);
                }
            }
        }
    }

    Ok((path, query))
}

fn conversion_error<R>(field: &Field<R>, source: anyhow::Error) -> RouteError {
    RouteError::FieldConversion {
        route: type_name::<R>(),
        field: field.name(),
        source,
    }
}

/// Serialize `route` into a relative URL using an explicit `pattern`.
///
/// ```rust
/// use urlbind::{Field, Route};
///
/// #[derive(Default)]
/// struct Greeting {
///     x: Option<String>,
/// }
///
/// impl Route for Greeting {
///     fn fields() -> Vec<Field<Self>> {
///         vec![Field::path("x", |r: &Self| &r.x, |r: &mut Self, v| r.x = v)]
///     }
/// }
///
/// let greeting = Greeting { x: Some("hello world".to_string()) };
/// let url = urlbind::serialize::to_relative_url_with(&greeting, "/a/{x}/b").unwrap();
/// assert_eq!(url, "/a/hello%20world/b");
/// ```
///
/// # Errors
///
/// Returns [`RouteError::InvalidPattern`] for a malformed or over-long pattern,
/// [`RouteError::PatternUnfulfilled`] when a placeholder has no value, plus
/// the errors of [`collect_params`].
pub fn to_relative_url_with<R: Route>(route: &R, pattern: &str) -> Result<String> {
    compile(pattern)?;
    let (path, query) = collect_params(route)?;
    let mut url = substitute(pattern, &path)?;

    let query_string = encode_query(&query);
    if !query_string.is_empty() {
        url.push('?');
        url.push_str(&query_string);
    }

    debug!(
        route = type_name::<R>(),
        pattern = %pattern,
        url = %url,
        "Route serialized"
    );
    Ok(url)
}
