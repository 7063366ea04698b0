use super::*;
use crate::config::CompilerConfig;
use crate::error::RouteError;
use crate::field::PathParams;

fn params(pairs: &[(&str, &str)]) -> PathParams {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

#[test]
fn test_exact_pattern() {
    let compiled = compile("/users/").unwrap();
    assert!(compiled.placeholders().is_empty());
    assert!(compiled.is_match("/users/"));
    assert!(compiled.is_match("/users/?page=2"));
    assert!(!compiled.is_match("/users/123/"));
    assert!(!compiled.is_match("/prefix/users/"));
}

#[test]
fn test_single_placeholder() {
    let compiled = compile("/example/{name}").unwrap();
    let matched = compiled.captures("/example/Basic").unwrap();
    assert_eq!(matched.groups, vec![("name".to_string(), "Basic".to_string())]);
    assert_eq!(matched.query, None);
}

#[test]
fn test_empty_segment_leaves_group_absent() {
    let compiled = compile("/example/{name}").unwrap();
    let matched = compiled.captures("/example/").unwrap();
    assert!(matched.groups.is_empty());
}

#[test]
fn test_placeholder_stops_at_slash_and_question_mark() {
    let compiled = compile("/a/{x}/b").unwrap();
    assert!(compiled.captures("/a/one/two/b").is_none());
    let matched = compiled.captures("/a/one/b?x=1").unwrap();
    assert_eq!(matched.groups[0].1, "one");
    assert_eq!(matched.query.as_deref(), Some("x=1"));
}

#[test]
fn test_multiple_placeholders_keep_pattern_order() {
    let compiled = compile("/users/{user_id}/posts/{post_id}").unwrap();
    assert_eq!(compiled.placeholders(), &["user_id", "post_id"]);
    let matched = compiled.captures("/users/42/posts/123").unwrap();
    assert_eq!(
        matched.groups,
        vec![
            ("user_id".to_string(), "42".to_string()),
            ("post_id".to_string(), "123".to_string())
        ]
    );
}

#[test]
fn test_special_chars_escaped() {
    let compiled = compile("/api/v1.0/(list)+{id}").unwrap();
    assert!(compiled.is_match("/api/v1.0/(list)+7"));
    assert!(!compiled.is_match("/api/v1X0/(list)+7"));
}

#[test]
fn test_empty_query_string_is_captured() {
    let compiled = compile("/search").unwrap();
    let matched = compiled.captures("/search?").unwrap();
    assert_eq!(matched.query.as_deref(), Some(""));
}

#[test]
fn test_invalid_placeholder_names() {
    assert!(matches!(
        compile("/a/{not-an-ident}"),
        Err(RouteError::InvalidPattern { .. })
    ));
    assert!(compile("/a/{}").is_err());
    assert!(compile("/a/{1x}").is_err());
    assert!(compile("/a/{urlbind_query}").is_err());
    assert!(compile("/a/{x}/{x}").is_err());
}

#[test]
fn test_pattern_length_limit() {
    let config = CompilerConfig {
        max_pattern_length: 8,
        ..CompilerConfig::default()
    };
    let err = compile_with("/a/very/long/pattern", &config).unwrap_err();
    assert!(err.to_string().contains("exceeds maximum allowed length"));
    assert!(compile_with("/a/{b}", &config).is_ok());
}

#[test]
fn test_regex_size_limit() {
    let config = CompilerConfig {
        regex_size_limit: 16,
        ..CompilerConfig::default()
    };
    assert!(compile_with("/users/{id}/posts/{post_id}", &config).is_err());
}

#[test]
fn test_substitute_encodes_values() {
    let url = substitute("/a/{x}/b", &params(&[("x", "hello world")])).unwrap();
    assert_eq!(url, "/a/hello%20world/b");
}

#[test]
fn test_substitute_encodes_reserved_characters() {
    let url = substitute("/files/{name}", &params(&[("name", "a/b?c{d}")])).unwrap();
    assert_eq!(url, "/files/a%2Fb%3Fc%7Bd%7D");
}

#[test]
fn test_substitute_ignores_unused_params() {
    let url = substitute("/a/{x}", &params(&[("x", "1"), ("y", "2")])).unwrap();
    assert_eq!(url, "/a/1");
}

#[test]
fn test_substitute_reports_every_missing_placeholder() {
    let err = substitute("/a/{x}/{y}/{z}", &params(&[("y", "2")])).unwrap_err();
    match err {
        RouteError::PatternUnfulfilled { placeholders, .. } => {
            assert_eq!(placeholders, vec!["x".to_string(), "z".to_string()]);
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn test_translate_brackets() {
    assert_eq!(translate_brackets("/a/[x]/b").unwrap(), "/a/{x}/b");
    assert_eq!(translate_brackets("/static").unwrap(), "/static");
    assert!(translate_brackets("/docs/[...slug]").is_err());
    assert!(translate_brackets("/docs/[[...slug]]").is_err());
    assert!(translate_brackets("/docs/[a b]").is_err());
}

#[test]
fn test_compiled_pattern_display() {
    let compiled = compile("/users/{id}/").unwrap();
    assert_eq!(format!("{compiled}"), "/users/{id}/");
    assert_eq!(compiled.pattern(), "/users/{id}/");
}
