//! JSON-in-one-parameter helpers for serde pairs.
//!
//! A serde pair takes plain function pointers, so these helpers are meant to
//! be called from small wrapper functions that fix the key:
//!
//! ```rust
//! use serde::{Deserialize, Serialize};
//! use urlbind::{Field, QueryParams, QueryString, Route};
//!
//! #[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
//! struct Target {
//!     r#type: String,
//!     id: u64,
//! }
//!
//! #[derive(Default)]
//! struct Linked {
//!     target: Option<Target>,
//! }
//!
//! fn ser(target: &Target) -> anyhow::Result<QueryParams> {
//!     urlbind::json::to_param("target", target)
//! }
//!
//! fn de(query: &QueryString) -> anyhow::Result<Target> {
//!     urlbind::json::from_param("target", query)
//! }
//!
//! impl Route for Linked {
//!     fn fields() -> Vec<Field<Self>> {
//!         vec![Field::query_serde(
//!             "target",
//!             |r: &Self| r.target.as_ref(),
//!             |r: &mut Self, v| r.target = Some(v),
//!             ser,
//!             de,
//!         )]
//!     }
//! }
//! ```

use crate::field::{PathCaptures, PathParams, QueryParams, QueryString, QueryValue};
use anyhow::{anyhow, Context};
use serde::de::DeserializeOwned;
use serde::Serialize;

/// Encode `value` as JSON under a single query `key`.
///
/// # Errors
///
/// Fails when `value` cannot be serialized to JSON.
pub fn to_param<T: Serialize>(key: &str, value: &T) -> anyhow::Result<QueryParams> {
    let encoded = serde_json::to_string(value)
        .with_context(|| format!("failed to encode query parameter '{key}' as JSON"))?;
    Ok(QueryParams::from([(key.to_string(), QueryValue::Single(encoded))]))
}

/// Decode the first value of query `key` from JSON.
///
/// # Errors
///
/// Fails when the key is absent or its value is not valid JSON for `T`.
pub fn from_param<T: DeserializeOwned>(key: &str, query: &QueryString) -> anyhow::Result<T> {
    let raw = query
        .get(key)
        .ok_or_else(|| anyhow!("query parameter '{key}' is missing"))?;
    serde_json::from_str(raw)
        .with_context(|| format!("query parameter '{key}' is not valid JSON"))
}

/// Encode `value` as JSON into the path placeholder `key`.
///
/// # Errors
///
/// Fails when `value` cannot be serialized to JSON.
pub fn to_path_param<T: Serialize>(key: &str, value: &T) -> anyhow::Result<PathParams> {
    let encoded = serde_json::to_string(value)
        .with_context(|| format!("failed to encode path parameter '{key}' as JSON"))?;
    Ok(PathParams::from([(key.to_string(), encoded)]))
}

/// Decode the captured path group `key` from JSON.
///
/// # Errors
///
/// Fails when the group did not capture or is not valid JSON for `T`.
pub fn from_path_param<T: DeserializeOwned>(
    key: &str,
    captures: &PathCaptures,
) -> anyhow::Result<T> {
    let raw = captures
        .get(key)
        .ok_or_else(|| anyhow!("path parameter '{key}' is missing"))?;
    serde_json::from_str(raw).with_context(|| format!("path parameter '{key}' is not valid JSON"))
}
