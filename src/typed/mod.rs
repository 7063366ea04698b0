//! # Typed Module
//!
//! The [`Route`] trait ties a Rust struct to its URL shape.
//!
//! ## Overview
//!
//! A route is a typed object representing a navigable location plus its data,
//! independent of its string form. Implementors list their annotated fields
//! once; the [`crate::serialize`] and [`crate::deserialize`] modules walk that
//! list to convert instances to relative URLs and back.
//!
//! ## Benefits
//!
//! - Compile-time checked field names and types instead of string maps
//! - One declaration drives both directions, so links and parsers cannot drift
//! - Required fields are enforced at parse time

mod core;

pub use self::core::{Route, RouteDeclaration};
