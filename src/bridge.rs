//! Helpers for client-side routers with `[name]` path syntax.
//!
//! Such a framework hands over the current URL and its own native pattern
//! (e.g. `/posts/[id]`). The native pattern is translated to `{name}` form
//! and used as an explicit pattern, bypassing the registry.

use crate::deserialize::from_url_with;
use crate::error::Result;
use crate::pattern::translate_brackets;
use crate::serialize::to_relative_url_with;
use crate::typed::Route;
use url::Url;

/// Reduce an absolute URL to its path and query; relative input is kept.
fn relative_part(current_url: &str) -> String {
    match Url::parse(current_url) {
        Ok(url) if url.has_host() => match url.query() {
            Some(query) => format!("{}?{}", url.path(), query),
            None => url.path().to_string(),
        },
        _ => current_url.to_string(),
    }
}

/// Parse the router's current URL into `R` using its native pattern.
///
/// ```rust
/// use urlbind::{Field, Route};
///
/// #[derive(Default)]
/// struct Post {
///     id: Option<u32>,
/// }
///
/// impl Route for Post {
///     fn fields() -> Vec<Field<Self>> {
///         vec![Field::path("id", |r: &Self| &r.id, |r: &mut Self, v| r.id = v)]
///     }
/// }
///
/// let post: Post = urlbind::bridge::from_current_url("https://example.com/posts/42", "/posts/[id]").unwrap();
/// assert_eq!(post.id, Some(42));
/// ```
///
/// # Errors
///
/// Returns [`crate::RouteError::InvalidPattern`] for a native pattern that
/// cannot be translated, plus the errors of [`from_url_with`].
pub fn from_current_url<R: Route>(current_url: &str, native_pattern: &str) -> Result<R> {
    let pattern = translate_brackets(native_pattern)?;
    from_url_with(&relative_part(current_url), &pattern)
}

/// Build a link target for `route` from the router's native pattern.
///
/// # Errors
///
/// Returns [`crate::RouteError::InvalidPattern`] for a native pattern that
/// cannot be translated, plus the errors of [`to_relative_url_with`].
pub fn href<R: Route>(route: &R, native_pattern: &str) -> Result<String> {
    let pattern = translate_brackets(native_pattern)?;
    to_relative_url_with(route, &pattern)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relative_part_strips_origin() {
        assert_eq!(relative_part("https://example.com/a/b?x=1"), "/a/b?x=1");
        assert_eq!(relative_part("http://localhost:3000/"), "/");
    }

    #[test]
    fn test_relative_part_keeps_relative_input() {
        assert_eq!(relative_part("/a/b?x=1"), "/a/b?x=1");
    }
}
