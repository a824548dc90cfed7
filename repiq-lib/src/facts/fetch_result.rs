use super::crates::CratesMetrics;
use super::github::GitHubMetrics;
use super::golang::GoMetrics;
use super::npm::NpmMetrics;
use super::pypi::PyPiMetrics;
use serde::{Deserialize, Serialize};

/// Metrics for a single target, tagged by the registry they came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Metrics {
    GitHub(GitHubMetrics),
    Npm(NpmMetrics),
    PyPi(PyPiMetrics),
    Crates(CratesMetrics),
    Go(GoMetrics),
}

impl From<GitHubMetrics> for Metrics {
    fn from(value: GitHubMetrics) -> Self {
        Self::GitHub(value)
    }
}

impl From<NpmMetrics> for Metrics {
    fn from(value: NpmMetrics) -> Self {
        Self::Npm(value)
    }
}

impl From<PyPiMetrics> for Metrics {
    fn from(value: PyPiMetrics) -> Self {
        Self::PyPi(value)
    }
}

impl From<CratesMetrics> for Metrics {
    fn from(value: CratesMetrics) -> Self {
        Self::Crates(value)
    }
}

impl From<GoMetrics> for Metrics {
    fn from(value: GoMetrics) -> Self {
        Self::Go(value)
    }
}

/// The outcome of fetching one target.
///
/// `metrics` and `error` may both be present: that is a partial failure, where the
/// anchor request succeeded but some detail requests did not. An `error` with no
/// `metrics` is a total failure.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FetchResult {
    target: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    metrics: Option<Metrics>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl FetchResult {
    #[must_use]
    pub fn success(target: impl Into<String>, metrics: impl Into<Metrics>) -> Self {
        Self {
            target: target.into(),
            metrics: Some(metrics.into()),
            error: None,
        }
    }

    #[must_use]
    pub fn failure(target: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            target: target.into(),
            metrics: None,
            error: Some(non_empty(error.into())),
        }
    }

    /// Metrics plus the messages of whichever detail requests failed.
    ///
    /// With no messages this is a plain success.
    #[must_use]
    pub fn partial(target: impl Into<String>, metrics: impl Into<Metrics>, errors: &[String]) -> Self {
        Self {
            target: target.into(),
            metrics: Some(metrics.into()),
            error: if errors.is_empty() { None } else { Some(non_empty(errors.join("; "))) },
        }
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    #[must_use]
    pub const fn metrics(&self) -> Option<&Metrics> {
        self.metrics.as_ref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    #[must_use]
    pub const fn has_error(&self) -> bool {
        self.error.is_some()
    }

    #[must_use]
    pub const fn is_total_failure(&self) -> bool {
        self.error.is_some() && self.metrics.is_none()
    }
}

fn non_empty(message: String) -> String {
    if message.is_empty() { "unknown error".to_string() } else { message }
}
