//! Metric collection for open-source packages
//!
//! This module gathers popularity and health metrics for packages hosted on several
//! independent registries. A target names a registry by scheme and a package by
//! identifier, e.g. `github:rust-lang/rust` or `npm:@types/node`.
//!
//! # Implementation Model
//!
//! Every registry is served by a [`Provider`]:
//! - **GitHub**: stars, forks, issues, contributors, releases, commit activity
//! - **npm**: downloads, latest version, publish age, dependencies
//! - **PyPI**: downloads (via pypistats), latest version, publish age, dependencies
//! - **crates.io**: downloads, latest version, dependencies, reverse dependencies
//! - **Go modules**: latest version (via the module proxy), license and dependencies (via deps.dev)
//!
//! Providers fetch one anchor document first; if that fails the target fails as a whole.
//! Detail requests then run concurrently through [`Subqueries`](subqueries::Subqueries)
//! and any that fail are reported next to whatever metrics were gathered.
//!
//! Providers are looked up through a [`Registry`]. Each one may be wrapped in a
//! [`CachedProvider`], which consults a [`Store`] of earlier complete results before
//! touching the network. [`run_all`] fans a batch of targets out over their providers,
//! bounded by a single [`Deadline`], and returns one [`FetchResult`] per target.

pub mod cache;
mod cached_provider;
mod collector;
pub mod crates;
mod deadline;
mod fetch_result;
pub mod github;
pub mod golang;
pub(crate) mod http;
pub mod npm;
mod provider;
pub mod pypi;
mod registry;
pub(crate) mod subqueries;
mod target;
pub(crate) mod time_utils;

pub use cache::Store;
pub use cached_provider::CachedProvider;
pub use collector::{any_failed, run_all};
pub use deadline::Deadline;
pub use fetch_result::{FetchResult, Metrics};
pub use provider::Provider;
pub use registry::Registry;
pub use target::Target;
