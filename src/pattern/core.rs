//! Pattern compiler core: `{name}` templates to anchored regexes and back.

use crate::config::CompilerConfig;
use crate::error::{Result, RouteError};
use crate::field::PathParams;
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Name of the capture group holding the raw query string.
///
/// Reserved: a pattern may not declare a placeholder with this name.
pub const QUERY_GROUP: &str = "urlbind_query";

/// Any `{...}` token in an unescaped pattern or a substituted URL.
#[allow(clippy::expect_used)]
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\{([^{}]*)\}").expect("placeholder regex is valid"));

/// A placeholder after `regex::escape` has run over the pattern.
#[allow(clippy::expect_used)]
static ESCAPED_PLACEHOLDER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\\\{([A-Za-z_][A-Za-z0-9_]*)\\\}").expect("escaped placeholder regex is valid")
});

/// Framework-native `[name]` segments.
#[allow(clippy::expect_used)]
static BRACKET: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\[([^\[\]]*)\]").expect("bracket regex is valid"));

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn invalid(pattern: &str, reason: impl Into<String>) -> RouteError {
    RouteError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: reason.into(),
    }
}

/// List the placeholder names of `pattern`, in order of appearance.
///
/// # Errors
///
/// Returns [`RouteError::InvalidPattern`] when a placeholder is not an
/// identifier, uses the reserved query group name, or appears twice.
pub fn placeholders(pattern: &str) -> Result<Vec<String>> {
    let mut names = Vec::with_capacity(pattern.matches('{').count());
    let mut seen = HashSet::new();
    for caps in PLACEHOLDER.captures_iter(pattern) {
        let name = &caps[1];
        if !is_identifier(name) {
            return Err(invalid(
                pattern,
                format!("placeholder '{{{name}}}' is not an identifier"),
            ));
        }
        if name == QUERY_GROUP {
            return Err(invalid(
                pattern,
                format!("placeholder name '{QUERY_GROUP}' is reserved"),
            ));
        }
        if !seen.insert(name.to_string()) {
            return Err(invalid(pattern, format!("placeholder '{{{name}}}' appears twice")));
        }
        names.push(name.to_string());
    }
    Ok(names)
}

/// A route pattern compiled into an anchored regular expression.
///
/// Built per call and discarded afterwards; nothing is cached between
/// conversions.
#[derive(Debug, Clone)]
pub struct CompiledPattern {
    pattern: String,
    regex: Regex,
    placeholders: Vec<String>,
}

/// Raw result of matching a URL against a [`CompiledPattern`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PatternMatch {
    /// Captured placeholder values, still percent-encoded, in pattern order.
    /// Placeholders whose segment was empty are absent.
    pub groups: Vec<(String, String)>,
    /// Everything after the first `?`, if the URL had one.
    pub query: Option<String>,
}

impl CompiledPattern {
    /// The pattern this regex was built from.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Placeholder names in order of appearance.
    #[must_use]
    pub fn placeholders(&self) -> &[String] {
        &self.placeholders
    }

    #[must_use]
    pub fn is_match(&self, url: &str) -> bool {
        self.regex.is_match(url)
    }

    /// Match `url`, returning `None` when it does not fit the pattern at all.
    #[must_use]
    pub fn captures(&self, url: &str) -> Option<PatternMatch> {
        let caps = self.regex.captures(url)?;
        let groups = self
            .placeholders
            .iter()
            .filter_map(|name| caps.name(name).map(|m| (name.clone(), m.as_str().to_string())))
            .collect();
        let query = caps.name(QUERY_GROUP).map(|m| m.as_str().to_string());
        Some(PatternMatch { groups, query })
    }
}

impl std::fmt::Display for CompiledPattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.pattern)
    }
}

/// Compile `pattern` with the process-wide [`CompilerConfig`].
///
/// # Errors
///
/// See [`compile_with`].
pub fn compile(pattern: &str) -> Result<CompiledPattern> {
    compile_with(pattern, CompilerConfig::global())
}

/// Compile `pattern` into an anchored regex.
///
/// Literal text is regex-escaped first; every `{name}` then becomes the
/// named group `(?P<name>[^/?]+)?`. The group matches one or more characters
/// other than `/` and `?`, and may be missing entirely, so that an empty
/// segment reaches the deserializer as "absent" rather than failing the
/// whole match. A trailing `(?:\?(?P<urlbind_query>.*))?` captures the raw
/// query string.
///
/// ```rust
/// let compiled = urlbind::pattern::compile("/a/{x}/b").unwrap();
/// assert_eq!(
///     compiled.regex().as_str(),
///     r"^/a/(?P<x>[^/?]+)?/b(?:\?(?P<urlbind_query>.*))?$"
/// );
/// ```
///
/// # Errors
///
/// Returns [`RouteError::InvalidPattern`] when the pattern exceeds the
/// configured length, declares an invalid placeholder, or the resulting regex
/// exceeds the configured size limit.
pub fn compile_with(pattern: &str, config: &CompilerConfig) -> Result<CompiledPattern> {
    if pattern.len() > config.max_pattern_length {
        return Err(invalid(
            pattern,
            format!(
                "pattern length {} exceeds maximum allowed length of {} bytes",
                pattern.len(),
                config.max_pattern_length
            ),
        ));
    }

    let names = placeholders(pattern)?;
    let escaped = regex::escape(pattern);
    let body = ESCAPED_PLACEHOLDER.replace_all(&escaped, "(?P<${1}>[^/?]+)?");
    let source = format!(r"^{body}(?:\?(?P<{QUERY_GROUP}>.*))?$");

    let regex = RegexBuilder::new(&source)
        .size_limit(config.regex_size_limit)
        .build()
        .map_err(|e| invalid(pattern, format!("failed to compile pattern regex: {e}")))?;

    debug!(
        pattern = %pattern,
        regex = %regex.as_str(),
        placeholders = ?names,
        "Route pattern compiled"
    );

    Ok(CompiledPattern {
        pattern: pattern.to_string(),
        regex,
        placeholders: names,
    })
}

/// Fill `pattern` with percent-encoded path parameters.
///
/// Every `{key}` occurrence is replaced for each entry of `params`; entries
/// without a matching placeholder are ignored.
///
/// # Errors
///
/// Returns [`RouteError::PatternUnfulfilled`] naming every placeholder left
/// without a value.
pub fn substitute(pattern: &str, params: &PathParams) -> Result<String> {
    let mut url = pattern.to_string();
    for (key, value) in params {
        let placeholder = format!("{{{key}}}");
        if url.contains(&placeholder) {
            url = url.replace(&placeholder, &urlencoding::encode(value));
        }
    }

    let remaining: Vec<String> = PLACEHOLDER
        .captures_iter(&url)
        .map(|caps| caps[1].to_string())
        .collect();
    if !remaining.is_empty() {
        warn!(
            pattern = %pattern,
            missing = ?remaining,
            "Route pattern left unfulfilled"
        );
        return Err(RouteError::PatternUnfulfilled {
            pattern: pattern.to_string(),
            placeholders: remaining,
        });
    }
    Ok(url)
}

/// Translate a framework-native `[name]` pattern into `{name}` syntax.
///
/// ```rust
/// assert_eq!(
///     urlbind::pattern::translate_brackets("/users/[id]/posts/[post_id]").unwrap(),
///     "/users/{id}/posts/{post_id}"
/// );
/// ```
///
/// # Errors
///
/// Catch-all (`[...slug]`) and optional (`[[...slug]]`) segments have no
/// `{name}` equivalent and are rejected with [`RouteError::InvalidPattern`],
/// as are brackets that do not enclose an identifier.
pub fn translate_brackets(native: &str) -> Result<String> {
    for caps in BRACKET.captures_iter(native) {
        let inner = &caps[1];
        if inner.starts_with("...") {
            return Err(invalid(native, "catch-all segments are not supported"));
        }
        if !is_identifier(inner) {
            return Err(invalid(native, format!("segment '[{inner}]' is not an identifier")));
        }
    }
    Ok(BRACKET.replace_all(native, "{${1}}").into_owned())
}
