//! # Compiler Configuration Module
//!
//! Environment variable based limits applied by the pattern compiler.
//!
//! ## Environment Variables
//!
//! ### `URLBIND_MAX_PATTERN_LENGTH`
//!
//! Longest route pattern, in bytes, that [`crate::pattern::compile`] accepts.
//! Accepts decimal (`2048`) or hexadecimal (`0x800`) values.
//!
//! Default: `1024`
//!
//! ### `URLBIND_REGEX_SIZE_LIMIT`
//!
//! Upper bound on the compiled regex program size, passed to
//! [`regex::RegexBuilder::size_limit`].
//!
//! Default: `0x100000` (1 MiB)
//!
//! ## Usage
//!
//! ```rust
//! use urlbind::config::CompilerConfig;
//!
//! let config = CompilerConfig::from_env();
//! println!("Max pattern length: {} bytes", config.max_pattern_length);
//! ```
//!
//! Values that are absent or fail to parse fall back to the defaults; a bad
//! environment never prevents a pattern from compiling.

use once_cell::sync::Lazy;
use std::env;

/// Default value for [`CompilerConfig::max_pattern_length`].
pub const DEFAULT_MAX_PATTERN_LENGTH: usize = 1024;

/// Default value for [`CompilerConfig::regex_size_limit`].
pub const DEFAULT_REGEX_SIZE_LIMIT: usize = 1 << 20;

static GLOBAL: Lazy<CompilerConfig> = Lazy::new(CompilerConfig::from_env);

/// Limits applied while compiling route patterns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompilerConfig {
    /// Longest accepted pattern in bytes
    pub max_pattern_length: usize,
    /// Size limit for the compiled regex in bytes
    pub regex_size_limit: usize,
}

impl Default for CompilerConfig {
    fn default() -> Self {
        CompilerConfig {
            max_pattern_length: DEFAULT_MAX_PATTERN_LENGTH,
            regex_size_limit: DEFAULT_REGEX_SIZE_LIMIT,
        }
    }
}

impl CompilerConfig {
    /// Load configuration from environment variables.
    #[must_use]
    pub fn from_env() -> Self {
        CompilerConfig {
            max_pattern_length: read_size("URLBIND_MAX_PATTERN_LENGTH", DEFAULT_MAX_PATTERN_LENGTH),
            regex_size_limit: read_size("URLBIND_REGEX_SIZE_LIMIT", DEFAULT_REGEX_SIZE_LIMIT),
        }
    }

    /// Process-wide configuration, read from the environment on first use.
    #[must_use]
    pub fn global() -> &'static CompilerConfig {
        &GLOBAL
    }
}

fn read_size(var: &str, default: usize) -> usize {
    match env::var(var) {
        Ok(val) => parse_size(&val).unwrap_or(default),
        Err(_) => default,
    }
}

fn parse_size(val: &str) -> Option<usize> {
    let val = val.trim();
    let parsed = if let Some(hex) = val.strip_prefix("0x") {
        usize::from_str_radix(hex, 16).ok()
    } else {
        val.parse().ok()
    };
    parsed.filter(|v| *v > 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_size_decimal_and_hex() {
        assert_eq!(parse_size("2048"), Some(2048));
        assert_eq!(parse_size("0x800"), Some(2048));
        assert_eq!(parse_size(" 16 "), Some(16));
    }

    #[test]
    fn test_parse_size_rejects_garbage_and_zero() {
        assert_eq!(parse_size("lots"), None);
        assert_eq!(parse_size("0x"), None);
        assert_eq!(parse_size("0"), None);
    }

    #[test]
    fn test_read_size_falls_back_when_unset() {
        assert_eq!(read_size("URLBIND_TEST_NEVER_SET_VARIABLE", 7), 7);
    }

    #[test]
    fn test_default_limits() {
        let config = CompilerConfig::default();
        assert_eq!(config.max_pattern_length, 1024);
        assert_eq!(config.regex_size_limit, 1 << 20);
    }
}
