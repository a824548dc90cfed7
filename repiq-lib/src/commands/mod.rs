//! Command-line interface and orchestration for repiq
//!
//! `repiq` takes a list of `scheme:identifier` targets, fetches metrics for each from
//! the matching registry, and prints a report.
//!
//! # Execution Flow
//!
//! The `run` function parses command-line arguments using clap, then:
//!
//! 1. Loads configuration (timeout, cache TTL, endpoint overrides)
//! 2. Opens the result cache and discovers a GitHub token when a GitHub target is present
//! 3. Builds the provider registry, wrapping each provider with the cache
//! 4. Fetches every target concurrently under a single deadline
//! 5. Renders the results as Markdown, JSON, or NDJSON
//!
//! The report is always written in full. If any target carries an error the command
//! then fails, so scripts can detect incomplete data from the exit status.

mod common;
mod config;
mod fetch;
mod host;
mod run;
mod token;

#[cfg(debug_assertions)]
pub use config::Config;

pub use common::{LogLevel, build_registry, init_logging, open_store};
pub use fetch::{FetchArgs, process_targets};
pub use host::Host;
#[cfg(test)]
pub use host::TestHost;
pub use run::run;
pub use token::{CommandRunner, SystemCommandRunner, resolve_github_token};
