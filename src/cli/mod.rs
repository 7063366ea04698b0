//! # CLI Module
//!
//! Command-line helpers for inspecting route patterns.
//!
//! ## Commands
//!
//! ### `compile`
//!
//! ```bash
//! urlbind compile '/users/{id}/posts/{post_id}'
//! ```
//!
//! Prints the generated regex and the placeholder names.
//!
//! ### `match`
//!
//! ```bash
//! urlbind match '/users/{id}' '/users/42?tab=posts&tab=likes'
//! ```
//!
//! Prints the decoded path groups and the query pairs as JSON. The exit
//! status is 1 when the URL does not match the pattern.
//!
//! ### `translate`
//!
//! ```bash
//! urlbind translate '/users/[id]'
//! ```
//!
//! ## Usage from Code
//!
//! ```rust,ignore
//! use urlbind::cli::{execute, Cli};
//! use clap::Parser;
//!
//! let cli = Cli::parse_from(["urlbind", "translate", "/posts/[id]"]);
//! execute(&cli, &mut std::io::stdout())?;
//! ```

mod commands;


pub use commands::{execute, run_cli, Cli, Commands};
