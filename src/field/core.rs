use super::params::{PathCaptures, PathParams, QueryParams, QueryString};
use super::value::{FieldValue, ParamValue};
use crate::error::{Result, RouteError};
use std::collections::HashSet;

/// Declared value kind of a plain field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValueKind {
    /// The value is written out through its string form
    #[default]
    Text,
    /// Presence-only encoding: a truthy value becomes a bare query flag and
    /// the field is left out of the path.
    Boolean,
}

/// Where a field lives in the URL.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Location {
    Path,
    Query,
}

/// Descriptive view of a field's annotation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Annotation {
    PlainPath { key: String, kind: ValueKind },
    SerdePath,
    PlainQuery { key: String, kind: ValueKind },
    SerdeQuery,
}

pub(crate) trait PlainSlot<R> {
    fn is_null(&self, route: &R) -> bool;
    fn is_truthy(&self, route: &R) -> bool;
    fn render(&self, route: &R) -> Option<ParamValue>;
    fn assign(&self, route: &mut R, raw: &str) -> std::result::Result<(), String>;
    fn assign_flag(&self, route: &mut R, present: bool) -> bool;
    fn accepts_flag(&self) -> bool;
}

struct PlainAccessor<R, F> {
    get: fn(&R) -> &F,
    set: fn(&mut R, F),
}

impl<R, F: FieldValue> PlainSlot<R> for PlainAccessor<R, F> {
    fn is_null(&self, route: &R) -> bool {
        (self.get)(route).is_null()
    }

    fn is_truthy(&self, route: &R) -> bool {
        (self.get)(route).is_truthy()
    }

    fn render(&self, route: &R) -> Option<ParamValue> {
        (self.get)(route).to_param()
    }

    fn assign(&self, route: &mut R, raw: &str) -> std::result::Result<(), String> {
        let value = F::from_param(raw)?;
        (self.set)(route, value);
        Ok(())
    }

    fn assign_flag(&self, route: &mut R, present: bool) -> bool {
        match F::from_flag(present) {
            Some(value) => {
                (self.set)(route, value);
                true
            }
            None => false,
        }
    }

    fn accepts_flag(&self) -> bool {
        F::accepts_flag()
    }
}

pub(crate) trait PathSerdeSlot<R> {
    fn serialize(&self, route: &R) -> Option<anyhow::Result<PathParams>>;
    fn deserialize(&self, route: &mut R, captures: &PathCaptures) -> anyhow::Result<()>;
}

struct PathSerde<R, F> {
    get: fn(&R) -> Option<&F>,
    set: fn(&mut R, F),
    serialize: fn(&F) -> anyhow::Result<PathParams>,
    deserialize: fn(&PathCaptures) -> anyhow::Result<F>,
}

impl<R, F> PathSerdeSlot<R> for PathSerde<R, F> {
    fn serialize(&self, route: &R) -> Option<anyhow::Result<PathParams>> {
        (self.get)(route).map(self.serialize)
    }

    fn deserialize(&self, route: &mut R, captures: &PathCaptures) -> anyhow::Result<()> {
        let value = (self.deserialize)(captures)?;
        (self.set)(route, value);
        Ok(())
    }
}

pub(crate) trait QuerySerdeSlot<R> {
    fn serialize(&self, route: &R) -> Option<anyhow::Result<QueryParams>>;
    fn deserialize(&self, route: &mut R, query: &QueryString) -> anyhow::Result<()>;
}

struct QuerySerde<R, F> {
    get: fn(&R) -> Option<&F>,
    set: fn(&mut R, F),
    serialize: fn(&F) -> anyhow::Result<QueryParams>,
    deserialize: fn(&QueryString) -> anyhow::Result<F>,
}

impl<R, F> QuerySerdeSlot<R> for QuerySerde<R, F> {
    fn serialize(&self, route: &R) -> Option<anyhow::Result<QueryParams>> {
        (self.get)(route).map(self.serialize)
    }

    fn deserialize(&self, route: &mut R, query: &QueryString) -> anyhow::Result<()> {
        let value = (self.deserialize)(query)?;
        (self.set)(route, value);
        Ok(())
    }
}

pub(crate) enum Binding<R> {
    PlainPath(Box<dyn PlainSlot<R>>),
    SerdePath(Box<dyn PathSerdeSlot<R>>),
    PlainQuery(Box<dyn PlainSlot<R>>),
    SerdeQuery(Box<dyn QuerySerdeSlot<R>>),
}

/// One annotated field of a route type.
///
/// Built with one of four constructors, one per annotation variant:
///
/// | constructor | variant |
/// |---|---|
/// | [`Field::path`] | plain path segment |
/// | [`Field::path_serde`] | custom path serialize/deserialize pair |
/// | [`Field::query`] | plain query parameter |
/// | [`Field::query_serde`] | custom query serialize/deserialize pair |
///
/// Plain fields can be refined with [`Field::key`] and [`Field::kind`].
///
/// ```rust
/// use urlbind::{Field, ValueKind};
///
/// #[derive(Default)]
/// struct Search {
///     term: Option<String>,
///     happy: bool,
/// }
///
/// let fields: Vec<Field<Search>> = vec![
///     Field::path("term", |r: &Search| &r.term, |r: &mut Search, v| r.term = v),
///     Field::query("happy", |r: &Search| &r.happy, |r: &mut Search, v| r.happy = v)
///         .kind(ValueKind::Boolean),
/// ];
/// assert_eq!(fields[0].external_key(), "term");
/// ```
pub struct Field<R> {
    name: &'static str,
    key: Option<String>,
    kind: ValueKind,
    pub(crate) binding: Binding<R>,
}

impl<R: 'static> Field<R> {
    /// A plain path field, filled from the placeholder named after the field.
    pub fn path<F: FieldValue + 'static>(
        name: &'static str,
        get: fn(&R) -> &F,
        set: fn(&mut R, F),
    ) -> Self {
        Self::with_binding(name, Binding::PlainPath(Box::new(PlainAccessor { get, set })))
    }

    /// A plain query field, filled from the query key named after the field.
    pub fn query<F: FieldValue + 'static>(
        name: &'static str,
        get: fn(&R) -> &F,
        set: fn(&mut R, F),
    ) -> Self {
        Self::with_binding(name, Binding::PlainQuery(Box::new(PlainAccessor { get, set })))
    }

    /// A path field converted by a custom function pair.
    ///
    /// `get` returns `None` when the field is null, which skips `serialize`.
    /// `deserialize` receives every captured path group.
    pub fn path_serde<F: 'static>(
        name: &'static str,
        get: fn(&R) -> Option<&F>,
        set: fn(&mut R, F),
        serialize: fn(&F) -> anyhow::Result<PathParams>,
        deserialize: fn(&PathCaptures) -> anyhow::Result<F>,
    ) -> Self {
        Self::with_binding(
            name,
            Binding::SerdePath(Box::new(PathSerde {
                get,
                set,
                serialize,
                deserialize,
            })),
        )
    }

    /// A query field converted by a custom function pair.
    ///
    /// `deserialize` receives the whole parsed query string.
    pub fn query_serde<F: 'static>(
        name: &'static str,
        get: fn(&R) -> Option<&F>,
        set: fn(&mut R, F),
        serialize: fn(&F) -> anyhow::Result<QueryParams>,
        deserialize: fn(&QueryString) -> anyhow::Result<F>,
    ) -> Self {
        Self::with_binding(
            name,
            Binding::SerdeQuery(Box::new(QuerySerde {
                get,
                set,
                serialize,
                deserialize,
            })),
        )
    }

    fn with_binding(name: &'static str, binding: Binding<R>) -> Self {
        Field {
            name,
            key: None,
            kind: ValueKind::Text,
            binding,
        }
    }
}

impl<R> Field<R> {
    /// Use `key` in the URL instead of the field name. Plain fields only.
    #[must_use]
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    /// Declare the value kind. Plain fields only.
    #[must_use]
    pub fn kind(mut self, kind: ValueKind) -> Self {
        self.kind = kind;
        self
    }

    /// Rust field name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Key used in the URL: the declared key, or the field name.
    #[must_use]
    pub fn external_key(&self) -> &str {
        self.key.as_deref().unwrap_or(self.name)
    }

    #[must_use]
    pub fn value_kind(&self) -> ValueKind {
        self.kind
    }

    #[must_use]
    pub fn location(&self) -> Location {
        match self.binding {
            Binding::PlainPath(_) | Binding::SerdePath(_) => Location::Path,
            Binding::PlainQuery(_) | Binding::SerdeQuery(_) => Location::Query,
        }
    }

    #[must_use]
    pub fn annotation(&self) -> Annotation {
        let key = self.external_key().to_string();
        match self.binding {
            Binding::PlainPath(_) => Annotation::PlainPath {
                key,
                kind: self.kind,
            },
            Binding::SerdePath(_) => Annotation::SerdePath,
            Binding::PlainQuery(_) => Annotation::PlainQuery {
                key,
                kind: self.kind,
            },
            Binding::SerdeQuery(_) => Annotation::SerdeQuery,
        }
    }

    fn check(&self, route: &'static str) -> Result<()> {
        let invalid = |reason: &str| RouteError::InvalidAnnotation {
            route,
            field: self.name,
            reason: reason.to_string(),
        };
        if self.name.is_empty() {
            return Err(invalid("field name must not be empty"));
        }
        match &self.binding {
            Binding::PlainPath(slot) | Binding::PlainQuery(slot) => {
                if self.key.as_deref() == Some("") {
                    return Err(invalid("external key must not be empty"));
                }
                if self.kind == ValueKind::Boolean && !slot.accepts_flag() {
                    return Err(invalid("Boolean kind requires a bool field"));
                }
            }
            Binding::SerdePath(_) | Binding::SerdeQuery(_) => {
                if self.key.is_some() || self.kind != ValueKind::Text {
                    return Err(invalid(
                        "a serialize/deserialize pair takes no key or value kind",
                    ));
                }
            }
        }
        Ok(())
    }
}

/// Check a route's field table before it is used.
///
/// Rejects a field annotated more than once, empty keys, a Boolean kind on a
/// field that cannot hold a flag, and key/kind modifiers on serde pairs.
///
/// # Errors
///
/// Returns [`RouteError::InvalidAnnotation`] naming the first offending field.
pub fn validate_fields<R>(fields: &[Field<R>]) -> Result<()> {
    let route = std::any::type_name::<R>();
    let mut seen = HashSet::with_capacity(fields.len());
    for field in fields {
        field.check(route)?;
        if !seen.insert(field.name) {
            return Err(RouteError::InvalidAnnotation {
                route,
                field: field.name,
                reason: "field carries more than one annotation".to_string(),
            });
        }
    }
    Ok(())
}

/// Check that every placeholder of a pattern is filled by a path field.
///
/// A route with a custom path pair is exempt: its deserializer sees every
/// captured group and may fill any of them.
///
/// # Errors
///
/// Returns [`RouteError::MissingPathField`] naming the first placeholder no
/// plain path field reads.
pub fn check_placeholders<R>(fields: &[Field<R>], placeholders: &[String]) -> Result<()> {
    if fields
        .iter()
        .any(|field| matches!(field.binding, Binding::SerdePath(_)))
    {
        return Ok(());
    }
    let covered: HashSet<&str> = fields
        .iter()
        .filter(|field| matches!(field.binding, Binding::PlainPath(_)))
        .map(Field::external_key)
        .collect();
    match placeholders
        .iter()
        .find(|name| !covered.contains(name.as_str()))
    {
        Some(name) => Err(RouteError::MissingPathField {
            route: std::any::type_name::<R>(),
            key: name.clone(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Sample {
        name: Option<String>,
        happy: bool,
        page: u32,
    }

    fn name_field() -> Field<Sample> {
        Field::path("name", |r: &Sample| &r.name, |r: &mut Sample, v| r.name = v)
    }

    #[test]
    fn test_external_key_defaults_to_field_name() {
        assert_eq!(name_field().external_key(), "name");
        assert_eq!(name_field().key("n").external_key(), "n");
    }

    #[test]
    fn test_annotation_view() {
        let field =
            Field::query("happy", |r: &Sample| &r.happy, |r: &mut Sample, v| r.happy = v)
                .kind(ValueKind::Boolean);
        assert_eq!(field.location(), Location::Query);
        assert_eq!(
            field.annotation(),
            Annotation::PlainQuery {
                key: "happy".to_string(),
                kind: ValueKind::Boolean
            }
        );
    }

    #[test]
    fn test_duplicate_annotation_rejected() {
        let fields = vec![
            name_field(),
            Field::query("name", |r: &Sample| &r.name, |r: &mut Sample, v| r.name = v),
        ];
        let err = validate_fields(&fields).unwrap_err();
        assert!(matches!(err, RouteError::InvalidAnnotation { field: "name", .. }));
    }

    #[test]
    fn test_boolean_kind_on_number_rejected() {
        let fields = vec![
            Field::query("page", |r: &Sample| &r.page, |r: &mut Sample, v| r.page = v)
                .kind(ValueKind::Boolean),
        ];
        assert!(validate_fields(&fields).is_err());
    }

    #[test]
    fn test_empty_key_rejected() {
        assert!(validate_fields(&[name_field().key("")]).is_err());
    }

    #[test]
    fn test_key_on_serde_pair_rejected() {
        fn ser(name: &Option<String>) -> anyhow::Result<PathParams> {
            Ok(name
                .iter()
                .map(|n| ("name".to_string(), n.clone()))
                .collect())
        }
        fn de(captures: &PathCaptures) -> anyhow::Result<Option<String>> {
            Ok(captures.get("name").cloned())
        }
        let field = Field::path_serde(
            "name",
            |r: &Sample| Some(&r.name),
            |r: &mut Sample, v| r.name = v,
            ser,
            de,
        )
        .key("other");
        assert!(validate_fields(&[field]).is_err());
    }

    #[test]
    fn test_uncovered_placeholder_rejected() {
        let placeholders = vec!["name".to_string(), "slug".to_string()];
        let err = check_placeholders(&[name_field()], &placeholders).unwrap_err();
        assert!(matches!(err, RouteError::MissingPathField { ref key, .. } if key == "slug"));
        assert!(check_placeholders(&[name_field()], &placeholders[..1]).is_ok());
        assert!(check_placeholders(&[name_field().key("slug")], &placeholders[1..]).is_ok());
    }

    #[test]
    fn test_plain_slot_assigns_values() {
        let field = Field::query("page", |r: &Sample| &r.page, |r: &mut Sample, v| r.page = v);
        let mut sample = Sample::default();
        if let Binding::PlainQuery(slot) = &field.binding {
            assert!(slot.assign(&mut sample, "12").is_ok());
            assert!(slot.assign(&mut sample, "twelve").is_err());
        }
        assert_eq!(sample.page, 12);
    }
}
