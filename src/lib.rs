//! # urlbind
//!
//! **urlbind** maps typed route structs to relative URLs and back. A route is
//! a plain struct whose annotated fields make up a URL pattern such as
//! `/users/{id}/posts/{post_id}`; urlbind serializes an instance into
//! `/users/7/posts/42?tab=comments` and parses such a URL into a fully
//! populated instance, checking that every required field is present.
//!
//! ## Overview
//!
//! urlbind is not an HTTP router. It never dispatches requests; it converts
//! between one route pattern and a URL/instance pair, and keeps a registry of
//! named routes for reverse lookup ("which registered route is this URL?").
//!
//! ## Architecture
//!
//! The library is organized into these modules:
//!
//! - **[`pattern`]** - compiles `{name}` patterns into anchored regexes, fills
//!   them back in, and translates `[name]` framework patterns
//! - **[`field`]** - field annotations: plain path/query fields and custom
//!   serialize/deserialize pairs
//! - **[`typed`]** - the [`Route`] trait implemented (or derived) by route types
//! - **[`serialize`]** - route instance to relative URL
//! - **[`deserialize`]** - relative URL to route instance
//! - **[`registry`]** - named, grouped registrations and reverse lookup
//! - **[`bridge`]** - helpers for client-side routers with bracket syntax
//! - **[`json`]** - JSON-in-one-parameter helpers for serde pairs
//! - **[`config`]** - pattern compiler limits read from the environment
//! - **[`logging`]** - `tracing` subscriber setup
//! - **[`cli`]** - the `urlbind` debugging binary
//!
//! ## Quick Start
//!
//! ```rust
//! use urlbind::Route;
//!
//! #[derive(Debug, Default, PartialEq, Route)]
//! #[route(name = "user_posts", pattern = "/users/{id}/posts")]
//! struct UserPosts {
//!     #[url_path]
//!     id: Option<u64>,
//!     #[url_query]
//!     page: u32,
//!     #[url_query(kind = "boolean")]
//!     drafts: bool,
//!     #[url_query("tag")]
//!     tags: Vec<String>,
//! }
//!
//! urlbind::register_declared::<UserPosts>().unwrap();
//!
//! let route = UserPosts {
//!     id: Some(7),
//!     page: 2,
//!     drafts: true,
//!     tags: vec!["rust".to_string(), "web".to_string()],
//! };
//! let url = urlbind::to_relative_url(&route).unwrap();
//! assert_eq!(url, "/users/7/posts?drafts&page=2&tag=rust&tag=web");
//!
//! let back: UserPosts = urlbind::from_url("/users/7/posts?page=2&drafts").unwrap();
//! assert_eq!(back.id, Some(7));
//! assert!(back.drafts);
//! ```
//!
//! ## Required and Optional Fields
//!
//! Every parse starts from `R::default()`. A field that is `None` there is
//! required: a URL without it fails with
//! [`RouteError::MissingPathField`] or [`RouteError::MissingQueryField`]. A
//! field with any other default may be left out, and keeps its default.
//!
//! ## Error Handling
//!
//! Every fallible operation returns [`Result`], whose error type
//! [`RouteError`] distinguishes programming errors (bad annotations, bad
//! patterns, unregistered types) from URL mismatches
//! ([`RouteError::is_mismatch`]).
//!
//! ## Logging
//!
//! The library emits `tracing` events and never installs a subscriber on its
//! own. Binaries may call [`logging::try_init`].

pub mod bridge;
pub mod cli;
pub mod config;
pub mod deserialize;
pub mod error;
pub mod field;
pub mod json;
pub mod logging;
pub mod pattern;
pub mod registry;
pub mod serialize;
pub mod typed;

pub use error::{Result, RouteError};
pub use field::{
    Annotation, Field, FieldValue, Location, ParamValue, PathCaptures, PathParams, QueryParams,
    QueryString, QueryValue, ValueKind,
};
pub use registry::{
    defined_routes, from_url, lookup, register_declared, route, route_name, route_name_of,
    route_path, to_relative_url, DefinedRoute, MatchedRoute, Registry, RouteOptions, RouteType,
    DEFAULT_GROUP,
};
pub use typed::{Route, RouteDeclaration};

#[cfg(feature = "derive")]
pub use urlbind_macros::Route;
