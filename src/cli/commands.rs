use crate::field::QueryString;
use crate::pattern::{compile, translate_brackets};
use anyhow::Context;
use clap::{Parser, Subcommand};
use serde_json::{json, Map, Value};
use std::io::Write;
use std::process::ExitCode;

/// Command-line interface for urlbind
///
/// Debugging aid for route patterns: shows the regex a pattern compiles to,
/// what a URL captures, and how bracket patterns translate.
#[derive(Parser)]
#[command(name = "urlbind")]
#[command(about = "urlbind route pattern tools", long_about = None)]
pub struct Cli {
    /// The subcommand to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available CLI commands
#[derive(Subcommand)]
pub enum Commands {
    /// Print the regex and placeholders a pattern compiles to
    Compile {
        /// Route pattern with `{name}` placeholders
        pattern: String,
    },
    /// Match a relative URL against a pattern and print the captures as JSON
    ///
    /// Exits with status 1 when the URL does not match.
    Match {
        /// Route pattern with `{name}` placeholders
        pattern: String,

        /// Relative URL, optionally with a query string
        url: String,

        /// Pretty-print the JSON output
        #[arg(long, default_value_t = false)]
        pretty: bool,
    },
    /// Translate a `[name]` bracket pattern into `{name}` form
    Translate {
        /// Framework-native pattern, e.g. `/posts/[id]`
        native: String,
    },
}

/// Run `cli`, writing results to `out`.
///
/// Returns `false` when a `match` found no match.
///
/// # Errors
///
/// Fails on an invalid pattern or when `out` cannot be written.
pub fn execute(cli: &Cli, out: &mut impl Write) -> anyhow::Result<bool> {
    match &cli.command {
        Commands::Compile { pattern } => {
            let compiled = compile(pattern)?;
            writeln!(out, "regex: {}", compiled.regex().as_str())?;
            writeln!(out, "placeholders: {}", compiled.placeholders().join(", "))?;
            Ok(true)
        }
        Commands::Match {
            pattern,
            url,
            pretty,
        } => {
            let compiled = compile(pattern)?;
            let Some(matched) = compiled.captures(url) else {
                writeln!(out, "no match: '{url}' does not fit '{pattern}'")?;
                return Ok(false);
            };

            let mut path = Map::new();
            for (name, raw) in &matched.groups {
                let decoded = urlencoding::decode(raw)
                    .with_context(|| format!("path group '{name}' is not valid UTF-8"))?;
                path.insert(name.clone(), Value::String(decoded.into_owned()));
            }
            let query: Vec<Value> = matched
                .query
                .as_deref()
                .map(QueryString::parse)
                .unwrap_or_default()
                .iter()
                .map(|(key, value)| json!([key, value]))
                .collect();

            let report = json!({
                "pattern": pattern,
                "path": path,
                "query": query,
            });
            let rendered = if *pretty {
                serde_json::to_string_pretty(&report)?
            } else {
                serde_json::to_string(&report)?
            };
            writeln!(out, "{rendered}")?;
            Ok(true)
        }
        Commands::Translate { native } => {
            writeln!(out, "{}", translate_brackets(native)?)?;
            Ok(true)
        }
    }
}

/// Parse the process arguments and run the selected command on stdout.
///
/// # Errors
///
/// See [`execute`].
pub fn run_cli() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();
    let stdout = std::io::stdout();
    let matched = execute(&cli, &mut stdout.lock())?;
    Ok(if matched {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
