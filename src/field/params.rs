//! Parameter maps exchanged between fields, custom serde pairs and URLs.

use std::collections::BTreeMap;

/// Path parameters collected during serialization, keyed by placeholder name.
///
/// Custom path serializers return this map; entries from later fields replace
/// entries with the same key from earlier ones.
pub type PathParams = BTreeMap<String, String>;

/// Named groups captured from a URL path, percent-decoded.
///
/// Custom path deserializers receive every captured group, not only the ones
/// "belonging" to their field, so one field can be composed from several
/// placeholders.
pub type PathCaptures = BTreeMap<String, String>;

/// Query parameters collected during serialization.
///
/// Keys are emitted in sorted order.
pub type QueryParams = BTreeMap<String, QueryValue>;

/// One entry of a [`QueryParams`] map.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum QueryValue {
    /// Presence-only flag, rendered as a bare key (`?happy`)
    Flag,
    /// `key=value`
    Single(String),
    /// Repeated key, one `key=value` pair per element
    Multi(Vec<String>),
}

impl From<String> for QueryValue {
    fn from(value: String) -> Self {
        QueryValue::Single(value)
    }
}

impl From<&str> for QueryValue {
    fn from(value: &str) -> Self {
        QueryValue::Single(value.to_string())
    }
}

impl From<Vec<String>> for QueryValue {
    fn from(values: Vec<String>) -> Self {
        QueryValue::Multi(values)
    }
}

/// Encode a query map as `k=v&k2=v2` without the leading `?`.
///
/// Keys and values are percent-encoded; list values repeat their key and an
/// empty list contributes nothing.
#[must_use]
pub fn encode_query(params: &QueryParams) -> String {
    let mut pairs: Vec<String> = Vec::with_capacity(params.len());
    for (key, value) in params {
        let key = urlencoding::encode(key);
        match value {
            QueryValue::Flag => pairs.push(key.into_owned()),
            QueryValue::Single(v) => pairs.push(format!("{key}={}", urlencoding::encode(v))),
            QueryValue::Multi(values) => pairs.extend(
                values
                    .iter()
                    .map(|v| format!("{key}={}", urlencoding::encode(v))),
            ),
        }
    }
    pairs.join("&")
}

/// A parsed query string, in URL order, with repeated keys preserved.
///
/// Custom query deserializers receive the whole collection.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QueryString {
    pairs: Vec<(String, String)>,
}

impl QueryString {
    /// Parse a raw query string (without the leading `?`).
    ///
    /// Uses `application/x-www-form-urlencoded` decoding, so both `%20` and
    /// `+` decode to a space. A bare key (`happy`) parses with an empty value.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let pairs = url::form_urlencoded::parse(raw.as_bytes())
            .map(|(k, v)| (k.into_owned(), v.into_owned()))
            .collect();
        QueryString { pairs }
    }

    /// First value for `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value for `key`, in URL order.
    #[must_use]
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Whether `key` appears at all, with or without a value.
    #[must_use]
    pub fn contains(&self, key: &str) -> bool {
        self.pairs.iter().any(|(k, _)| k == key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encode_query_repeats_list_keys() {
        let mut params = QueryParams::new();
        params.insert("k".to_string(), QueryValue::Multi(vec!["a".into(), "b".into()]));
        assert_eq!(encode_query(&params), "k=a&k=b");
    }

    #[test]
    fn test_encode_query_flag_and_escaping() {
        let mut params = QueryParams::new();
        params.insert("happy".to_string(), QueryValue::Flag);
        params.insert("q".to_string(), "a b&c".into());
        assert_eq!(encode_query(&params), "happy&q=a%20b%26c");
    }

    #[test]
    fn test_encode_query_empty_list_is_omitted() {
        let mut params = QueryParams::new();
        params.insert("k".to_string(), QueryValue::Multi(Vec::new()));
        assert_eq!(encode_query(&params), "");
    }

    #[test]
    fn test_query_string_lookup() {
        let query = QueryString::parse("a=1&happy&a=2&b=x+y");
        assert_eq!(query.get("a"), Some("1"));
        assert_eq!(query.get_all("a"), vec!["1", "2"]);
        assert!(query.contains("happy"));
        assert_eq!(query.get("happy"), Some(""));
        assert_eq!(query.get("b"), Some("x y"));
        assert!(!query.contains("c"));
        assert_eq!(query.len(), 4);
    }

    #[test]
    fn test_empty_query_string() {
        let query = QueryString::parse("");
        assert!(query.is_empty());
        assert_eq!(query, QueryString::default());
    }
}
