//! # Field Module
//!
//! Field annotations describe how each field of a route type takes part in a
//! URL. Every annotated field is exactly one of:
//!
//! - **plain path** - the field's string form fills a `{placeholder}`
//! - **serde path** - a custom function pair maps the field to and from
//!   path placeholders
//! - **plain query** - the field's string form becomes a query parameter
//! - **serde query** - a custom function pair maps the field to and from
//!   query parameters
//!
//! A route type lists its annotated fields through [`crate::Route::fields`],
//! either written by hand with the [`Field`] constructors or generated by
//! `#[derive(Route)]`.

mod core;
mod params;
mod value;

pub use self::core::{check_placeholders, validate_fields, Annotation, Field, Location, ValueKind};
pub(crate) use self::core::Binding;
pub use params::{encode_query, PathCaptures, PathParams, QueryParams, QueryString, QueryValue};
pub use value::{FieldValue, ParamValue};
