use crate::field::Field;

/// A typed route: a struct whose annotated fields make up a URL.
///
/// `R::default()` is the fresh instance every parse starts from. Its field
/// values double as defaults: a field that is non-null on the fresh instance
/// may be left out of a URL, while a null (`Option::None`) field is required.
///
/// Usually derived:
///
/// ```rust
/// use urlbind::Route;
///
/// #[derive(Debug, Default, PartialEq, Route)]
/// #[route(name = "example", pattern = "/example/{name}")]
/// struct Example {
///     #[url_path]
///     name: Option<String>,
///     #[url_query(kind = "boolean")]
///     happy: bool,
/// }
///
/// urlbind::register_declared::<Example>().unwrap();
/// let url = urlbind::to_relative_url(&Example {
///     name: Some("Basic".to_string()),
///     happy: true,
/// })
/// .unwrap();
/// assert_eq!(url, "/example/Basic?happy");
/// ```
///
/// or written by hand:
///
/// ```rust
/// use urlbind::{Field, Route};
///
/// #[derive(Default)]
/// struct Example {
///     name: Option<String>,
/// }
///
/// impl Route for Example {
///     fn fields() -> Vec<Field<Self>> {
///         vec![Field::path("name", |r: &Self| &r.name, |r: &mut Self, v| r.name = v)]
///     }
/// }
/// ```
pub trait Route: Default + Send + 'static {
    /// Annotated fields, in declaration order.
    fn fields() -> Vec<Field<Self>>;

    /// Name, pattern and group declared alongside the type, if any.
    ///
    /// Used by [`crate::registry::Registry::register_declared`].
    fn declaration() -> Option<RouteDeclaration> {
        None
    }
}

/// Registration data declared on a route type, e.g. with
/// `#[route(name = "...", pattern = "...", group = "...")]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RouteDeclaration {
    /// Human readable route name
    pub name: &'static str,
    /// Default URL pattern
    pub pattern: &'static str,
    /// Registry group; `None` selects [`crate::registry::DEFAULT_GROUP`]
    pub group: Option<&'static str>,
}
