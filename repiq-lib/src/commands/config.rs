use crate::Result;
use camino::Utf8Path;
use core::time::Duration;
use directories::BaseDirs;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const LOG_TARGET: &str = "    config";

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

#[derive(Debug, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// How long a cached result stays fresh
    #[serde(default = "default_cache_ttl", with = "humantime_serde")]
    pub cache_ttl: Duration,

    /// Time budget for a whole invocation
    #[serde(default = "default_timeout", with = "humantime_serde")]
    pub timeout: Duration,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub github_api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm_registry_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub npm_downloads_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pypi_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pypistats_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub crates_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub go_proxy_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deps_dev_url: Option<String>,
}

const fn default_cache_ttl() -> Duration {
    Duration::from_hours(24)
}

const fn default_timeout() -> Duration {
    Duration::from_secs(30)
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// An explicitly named file must exist. Otherwise `repiq.toml` in the user's
    /// configuration directory is used when present.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated
    pub fn load(config_path: Option<&Utf8Path>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading repiq configuration file '{path}'"))?;
            (path.as_std_path().to_path_buf(), text)
        } else {
            let Some(path) = default_config_path() else {
                log::debug!(target: LOG_TARGET, "No configuration directory available, using defaults");
                return Ok(Self::default());
            };

            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    log::debug!(target: LOG_TARGET, "No configuration file at '{}', using defaults", path.display());
                    return Ok(Self::default());
                }
                Err(e) => {
                    return Err(e).into_app_err_with(|| format!("reading repiq configuration file '{}'", path.display()));
                }
            }
        };

        Self::parse(&text, &final_path)
    }

    fn parse(text: &str, path: &Path) -> Result<Self> {
        let config: Self = toml::from_str(text).into_app_err_with(|| format!("parsing configuration file '{}'", path.display()))?;
        config.validate()?;

        log::debug!(target: LOG_TARGET, "Loaded configuration from '{}'", path.display());
        Ok(config)
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is zero or an endpoint override isn't an HTTP(S) URL
    fn validate(&self) -> Result<()> {
        if self.timeout.is_zero() {
            return Err(app_err!("timeout must be greater than zero"));
        }

        let endpoints = [
            ("github_api_url", &self.github_api_url),
            ("npm_registry_url", &self.npm_registry_url),
            ("npm_downloads_url", &self.npm_downloads_url),
            ("pypi_url", &self.pypi_url),
            ("pypistats_url", &self.pypistats_url),
            ("crates_url", &self.crates_url),
            ("go_proxy_url", &self.go_proxy_url),
            ("deps_dev_url", &self.deps_dev_url),
        ];

        for (name, value) in endpoints {
            let Some(value) = value else { continue };

            let url = url::Url::parse(value).into_app_err_with(|| format!("{name} is not a valid URL: '{value}'"))?;
            if !matches!(url.scheme(), "http" | "https") {
                return Err(app_err!("{name} must use http or https, got '{value}'"));
            }
        }

        Ok(())
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}

/// `<config_dir>/repiq/repiq.toml`, if the platform has a configuration directory.
fn default_config_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.config_dir().join("repiq").join("repiq.toml"))
}
