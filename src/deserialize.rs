//! Relative URL to route instance.
//!
//! Parsing always starts from a fresh `R::default()` and only hands that
//! instance back once every field has been filled; on any error the partially
//! built value is dropped.

use crate::error::{Result, RouteError};
use crate::field::{
    check_placeholders, validate_fields, Binding, PathCaptures, QueryString, ValueKind,
};
use crate::pattern::compile;
use crate::typed::Route;
use std::any::type_name;
use tracing::debug;

/// Parse `url` into a new `R`, matching it against an explicit `pattern`.
///
/// For each annotated field:
///
/// - plain path fields read their named capture group (percent-decoded)
/// - plain query fields read the first value of their key; Boolean-kind query
///   fields become `true`/`false` from key presence alone
/// - serde pairs receive every captured group, or the whole query string
///
/// A plain field without a source value keeps its default when the fresh
/// instance holds a non-null value for it, and is an error otherwise.
///
/// ```rust
/// use urlbind::{Field, Route};
///
/// #[derive(Debug, Default, PartialEq)]
/// struct Example {
///     name: Option<String>,
/// }
///
/// impl Route for Example {
///     fn fields() -> Vec<Field<Self>> {
///         vec![Field::path("name", |r: &Self| &r.name, |r: &mut Self, v| r.name = v)]
///     }
/// }
///
/// let parsed: Example = urlbind::deserialize::from_url_with("/example/Basic", "/example/{name}").unwrap();
/// assert_eq!(parsed.name.as_deref(), Some("Basic"));
/// assert!(urlbind::deserialize::from_url_with::<Example>("/example/", "/example/{name}").is_err());
/// ```
///
/// # Errors
///
/// - [`RouteError::Parse`] when the URL does not match the pattern at all
/// - [`RouteError::MissingPathField`] / [`RouteError::MissingQueryField`] for
///   a required field without a value, or a placeholder no path field reads
/// - [`RouteError::InvalidValue`] when a plain value does not parse
/// - [`RouteError::FieldConversion`] when a custom deserializer fails
/// - [`RouteError::InvalidPattern`] / [`RouteError::InvalidAnnotation`] for a
///   broken pattern or field table
pub fn from_url_with<R: Route>(url: &str, pattern: &str) -> Result<R> {
    let route_name = type_name::<R>();
    let mut route = R::default();
    let fields = R::fields();
    validate_fields(&fields)?;

    let compiled = compile(pattern)?;
    check_placeholders(&fields, compiled.placeholders())?;
    let matched = compiled.captures(url).ok_or_else(|| RouteError::Parse {
        url: url.to_string(),
        pattern: pattern.to_string(),
    })?;

    let mut captures = PathCaptures::new();
    for (name, raw) in matched.groups {
        let decoded = urlencoding::decode(&raw).map_err(|e| RouteError::InvalidValue {
            route: route_name,
            key: name.clone(),
            raw: raw.clone(),
            reason: e.to_string(),
        })?;
        captures.insert(name, decoded.into_owned());
    }
    let query = matched
        .query
        .as_deref()
        .map(QueryString::parse)
        .unwrap_or_default();

    for field in &fields {
        let key = field.external_key();
        match &field.binding {
            Binding::PlainPath(slot) => match captures.get(key) {
                Some(raw) => slot.assign(&mut route, raw).map_err(|reason| {
                    RouteError::InvalidValue {
                        route: route_name,
                        key: key.to_string(),
                        raw: raw.clone(),
                        reason,
                    }
                })?,
                None if slot.is_null(&route) => {
                    return Err(RouteError::MissingPathField {
                        route: route_name,
                        key: key.to_string(),
                    });
                }
                None => {}
            },
            Binding::PlainQuery(slot) if field.value_kind() == ValueKind::Boolean => {
                // Presence alone decides; `?happy=no` still means true.
                slot.assign_flag(&mut route, query.contains(key));
            }
            Binding::PlainQuery(slot) => match query.get(key) {
                Some(raw) => slot.assign(&mut route, raw).map_err(|reason| {
                    RouteError::InvalidValue {
                        route: route_name,
                        key: key.to_string(),
                        raw: raw.to_string(),
                        reason,
                    }
                })?,
                None if slot.is_null(&route) => {
                    return Err(RouteError::MissingQueryField {
                        route: route_name,
                        key: key.to_string(),
                    });
                }
                None => {}
            },
            Binding::SerdePath(slot) => {
                slot.deserialize(&mut route, &captures)
                    .map_err(|source| RouteError::FieldConversion {
                        route: route_name,
                        field: field.name(),
                        source,
                    })?;
            }
            Binding::SerdeQuery(slot) => {
                slot.deserialize(&mut route, &query)
                    .map_err(|source| RouteError::FieldConversion {
                        route: route_name,
                        field: field.name(),
                        source,
                    })?;
            }
        }
    }

    debug!(
        route = route_name,
        url = %url,
        pattern = %pattern,
        path_params = ?captures,
        "Route parsed"
    );
    Ok(route)
}
