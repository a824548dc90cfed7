//! Setup shared by every invocation: logging, the cache, and the provider registry.

use super::config::Config;
use crate::Result;
use crate::facts::crates::CratesProvider;
use crate::facts::github::GitHubProvider;
use crate::facts::golang::GoProvider;
use crate::facts::npm::NpmProvider;
use crate::facts::pypi::PyPiProvider;
use crate::facts::{CachedProvider, Provider, Registry, Store};
use camino::Utf8Path;
use clap::ValueEnum;
use core::time::Duration;
use directories::BaseDirs;
use ohno::IntoAppError;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

const LOG_TARGET: &str = "     setup";

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Initialize the logger based on log level
///
/// `RUST_LOG` takes precedence when set. Calling this more than once keeps the first logger.
pub fn init_logging(log_level: LogLevel) {
    let level = match log_level {
        LogLevel::None => return,
        LogLevel::Error => "error",
        LogLevel::Warn => "warn",
        LogLevel::Info => "info",
        LogLevel::Debug => "debug",
        LogLevel::Trace => "trace",
    };

    let env = env_logger::Env::default().filter_or("RUST_LOG", level);

    let _ = env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_module_path(false)
        .format_target(matches!(log_level, LogLevel::Debug | LogLevel::Trace))
        .try_init();
}

/// Open the result cache
///
/// Uses `cache_dir` when given, otherwise `repiq` under the platform's cache directory.
/// Returns `None` when no directory is given and the platform has none, which disables caching.
///
/// # Errors
///
/// Returns an error if the cache directory cannot be created
pub fn open_store(cache_dir: Option<&Utf8Path>, ttl: Duration) -> Result<Option<Arc<Store>>> {
    let dir: PathBuf = if let Some(dir) = cache_dir {
        dir.as_std_path().to_path_buf()
    } else if let Some(dirs) = BaseDirs::new() {
        dirs.cache_dir().join("repiq")
    } else {
        log::warn!(target: LOG_TARGET, "Could not determine a cache directory, caching is disabled");
        return Ok(None);
    };

    fs::create_dir_all(&dir).into_app_err_with(|| format!("creating cache directory '{}'", dir.display()))?;
    log::debug!(target: LOG_TARGET, "Caching results in '{}' for {ttl:?}", dir.display());

    Ok(Some(Arc::new(Store::new(dir, ttl))))
}

/// Build the registry of every supported provider
///
/// Endpoints come from `config`, falling back to the public services. When `store` is
/// given, every provider is wrapped in a [`CachedProvider`]; `bypass` skips cache reads.
///
/// # Errors
///
/// Returns an error if an HTTP client cannot be constructed
pub fn build_registry(config: &Config, github_token: Option<&str>, store: Option<&Arc<Store>>, bypass: bool) -> Result<Registry> {
    let providers: [Arc<dyn Provider>; 5] = [
        Arc::new(GitHubProvider::new(github_token, config.github_api_url.as_deref())?),
        Arc::new(NpmProvider::new(config.npm_registry_url.as_deref(), config.npm_downloads_url.as_deref())?),
        Arc::new(PyPiProvider::new(config.pypi_url.as_deref(), config.pypistats_url.as_deref())?),
        Arc::new(CratesProvider::new(config.crates_url.as_deref())?),
        Arc::new(GoProvider::new(config.go_proxy_url.as_deref(), config.deps_dev_url.as_deref())?),
    ];

    let mut registry = Registry::new();
    for provider in providers {
        match store {
            Some(store) => registry.register(Arc::new(CachedProvider::new(provider, Arc::clone(store), bypass))),
            None => registry.register(provider),
        }
    }

    Ok(registry)
}
