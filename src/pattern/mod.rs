//! # Pattern Module
//!
//! Compiles route patterns such as `/users/{id}/posts/{post_id}` into anchored
//! regular expressions with one named capture group per placeholder, and fills
//! patterns back in from path parameters.
//!
//! ## Pattern Syntax
//!
//! - `{identifier}` - a named placeholder matching one path segment
//! - `/` - segment separator
//! - everything else is literal text and is regex-escaped automatically
//!
//! ## Lifecycle
//!
//! Patterns are compiled on demand for each conversion and dropped afterwards.
//! Nothing is cached between calls.
//!
//! ## Example
//!
//! ```rust
//! use urlbind::pattern::compile;
//!
//! let compiled = compile("/users/{id}").unwrap();
//! let matched = compiled.captures("/users/42?tab=posts").unwrap();
//! assert_eq!(matched.groups, vec![("id".to_string(), "42".to_string())]);
//! assert_eq!(matched.query.as_deref(), Some("tab=posts"));
//! ```

mod core;
#[cfg(test)]
mod tests;

pub use self::core::{
    compile, compile_with, placeholders, substitute, translate_brackets, CompiledPattern,
    PatternMatch, QUERY_GROUP,
};
