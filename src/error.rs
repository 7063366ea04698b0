use std::fmt;

/// Convenience alias used throughout the crate.
pub type Result<T, E = RouteError> = std::result::Result<T, E>;

/// Errors raised while compiling patterns, serializing routes, or parsing URLs.
///
/// Every variant is surfaced synchronously to the caller. The only place the
/// crate absorbs these errors is reverse lookup ([`crate::registry::Registry::lookup`]),
/// which treats a failing candidate as "try the next one".
#[derive(Debug)]
pub enum RouteError {
    /// A field annotation was declared with unusable arguments.
    ///
    /// This is a programming error in the route's field table and is reported
    /// before any field is read or written.
    InvalidAnnotation {
        /// Type name of the route declaring the field
        route: &'static str,
        /// Rust field name
        field: &'static str,
        /// What is wrong with the annotation
        reason: String,
    },
    /// The route pattern could not be compiled.
    InvalidPattern {
        /// The offending pattern
        pattern: String,
        /// Why the pattern was rejected
        reason: String,
    },
    /// The URL does not match the compiled pattern at all.
    Parse {
        /// URL that was being parsed
        url: String,
        /// Pattern it was matched against
        pattern: String,
    },
    /// A required path field had no captured value and no default.
    MissingPathField {
        /// Type name of the route
        route: &'static str,
        /// External key (placeholder name)
        key: String,
    },
    /// A required query field had no value in the query string and no default.
    MissingQueryField {
        /// Type name of the route
        route: &'static str,
        /// External query key
        key: String,
    },
    /// Serialization left placeholders in the pattern unfilled.
    PatternUnfulfilled {
        /// Pattern being filled
        pattern: String,
        /// Placeholder names that had no value
        placeholders: Vec<String>,
    },
    /// A route type was used where a registered pattern is required.
    Unregistered {
        /// Type name of the unregistered route
        type_name: &'static str,
    },
    /// A plain field value could not be parsed from its string form.
    InvalidValue {
        /// Type name of the route
        route: &'static str,
        /// External key the raw value came from
        key: String,
        /// Raw (decoded) value
        raw: String,
        /// Parser message
        reason: String,
    },
    /// A custom deserialize function rejected its input.
    FieldConversion {
        /// Type name of the route
        route: &'static str,
        /// Rust field name
        field: &'static str,
        /// Error returned by the custom function
        source: anyhow::Error,
    },
}

impl RouteError {
    /// True for the errors that mean "this URL is not an instance of this route".
    ///
    /// Reverse lookup logs these at debug level; anything else indicates a
    /// broken route definition and is logged as a warning.
    #[must_use]
    pub fn is_mismatch(&self) -> bool {
        matches!(
            self,
            RouteError::Parse { .. }
                | RouteError::MissingPathField { .. }
                | RouteError::MissingQueryField { .. }
                | RouteError::InvalidValue { .. }
                | RouteError::FieldConversion { .. }
        )
    }
}

impl fmt::Display for RouteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RouteError::InvalidAnnotation {
                route,
                field,
                reason,
            } => write!(f, "invalid annotation on {route}.{field}: {reason}"),
            RouteError::InvalidPattern { pattern, reason } => {
                write!(f, "invalid route pattern '{pattern}': {reason}")
            }
            RouteError::Parse { url, pattern } => {
                write!(f, "could not parse URL '{url}' to route '{pattern}'")
            }
            RouteError::MissingPathField { route, key } => {
                write!(f, "missing path field '{key}' for route {route}")
            }
            RouteError::MissingQueryField { route, key } => {
                write!(f, "missing query field '{key}' for route {route}")
            }
            RouteError::PatternUnfulfilled {
                pattern,
                placeholders,
            } => write!(
                f,
                "pattern '{pattern}' left unfulfilled placeholders: {}",
                placeholders.join(", ")
            ),
            RouteError::Unregistered { type_name } => {
                write!(f, "route type {type_name} has not been registered")
            }
            RouteError::InvalidValue {
                route,
                key,
                raw,
                reason,
            } => write!(
                f,
                "invalid value '{raw}' for '{key}' on route {route}: {reason}"
            ),
            RouteError::FieldConversion {
                route,
                field,
                source,
            } => write!(f, "custom conversion failed for {route}.{field}: {source}"),
        }
    }
}

impl std::error::Error for RouteError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RouteError::FieldConversion { source, .. } => Some(&**source),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_display() {
        let err = RouteError::Parse {
            url: "/nope".to_string(),
            pattern: "/example/{name}".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "could not parse URL '/nope' to route '/example/{name}'"
        );
        assert!(err.is_mismatch());
    }

    #[test]
    fn test_unfulfilled_lists_placeholders() {
        let err = RouteError::PatternUnfulfilled {
            pattern: "/a/{x}/{y}".to_string(),
            placeholders: vec!["x".to_string(), "y".to_string()],
        };
        assert!(err.to_string().ends_with("x, y"));
        assert!(!err.is_mismatch());
    }

    #[test]
    fn test_field_conversion_exposes_source() {
        use std::error::Error;

        let err = RouteError::FieldConversion {
            route: "Example",
            field: "target",
            source: anyhow::anyhow!("bad target"),
        };
        assert_eq!(err.source().map(|s| s.to_string()), Some("bad target".to_string()));
    }
}
