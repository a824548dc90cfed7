use super::pypi_data::PyPiMetrics;
use crate::Result;
use crate::facts::http::{self, HttpClient};
use crate::facts::subqueries::Subqueries;
use crate::facts::time_utils::days_since;
use crate::facts::{Deadline, FetchResult, Provider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const PYPI_URL: &str = "https://pypi.org";
pub const PYPISTATS_URL: &str = "https://pypistats.org";

static PACKAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9]([a-zA-Z0-9._-]*[a-zA-Z0-9])?$").expect("invalid regex"));

static EXTRA_MARKER_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r";.*\bextra\s*==").expect("invalid regex"));

#[derive(Debug, Deserialize)]
struct ProjectResponse {
    info: ProjectInfo,
    #[serde(default)]
    releases: HashMap<String, Vec<ReleaseFile>>,
}

#[derive(Debug, Deserialize)]
struct ProjectInfo {
    version: String,
    license: Option<String>,
    requires_python: Option<String>,
    requires_dist: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct ReleaseFile {
    upload_time_iso_8601: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct RecentDownloads {
    data: RecentDownloadsData,
}

#[derive(Debug, Deserialize)]
struct RecentDownloadsData {
    #[serde(default)]
    last_week: u64,
    #[serde(default)]
    last_month: u64,
}

#[derive(Debug, Clone)]
pub struct PyPiProvider {
    client: HttpClient,
    pypi_url: String,
    stats_url: String,
}

impl PyPiProvider {
    pub fn new(pypi_url: Option<&str>, stats_url: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: HttpClient::plain()?,
            pypi_url: http::base_url(pypi_url, PYPI_URL),
            stats_url: http::base_url(stats_url, PYPISTATS_URL),
        })
    }

    async fn recent_downloads(&self, package: &str, deadline: Deadline) -> Result<RecentDownloadsData> {
        let url = format!("{}/api/packages/{package}/recent", self.stats_url);
        let recent: RecentDownloads = self.client.get_json(&url, deadline).await?;
        Ok(recent.data)
    }
}

#[async_trait]
impl Provider for PyPiProvider {
    fn scheme(&self) -> &str {
        "pypi"
    }

    async fn fetch(&self, identifier: &str, deadline: Deadline) -> Result<FetchResult> {
        let target = format!("pypi:{identifier}");

        if !PACKAGE_REGEX.is_match(identifier) {
            return Ok(FetchResult::failure(target, format!("invalid PyPI package name \"{identifier}\"")));
        }

        let url = format!("{}/pypi/{identifier}/json", self.pypi_url);
        let project: ProjectResponse = match self.client.get_json(&url, deadline).await {
            Ok(project) => project,
            Err(e) => return Ok(FetchResult::failure(target, format!("PyPI API: {}", e.message()))),
        };

        let last_publish_days = project
            .releases
            .get(&project.info.version)
            .and_then(|files| files.first())
            .and_then(|file| file.upload_time_iso_8601)
            .map_or(0, days_since);

        let metrics = PyPiMetrics {
            last_publish_days,
            dependencies_count: count_required(project.info.requires_dist.as_deref().unwrap_or_default()),
            license: project.info.license.unwrap_or_default(),
            requires_python: project.info.requires_python.unwrap_or_default(),
            latest_version: project.info.version,
            ..PyPiMetrics::default()
        };

        let mut subqueries = Subqueries::new();
        subqueries.add("downloads", self.recent_downloads(identifier, deadline), |m: &mut PyPiMetrics, v| {
            m.weekly_downloads = v.last_week;
            m.monthly_downloads = v.last_month;
        });

        Ok(subqueries.merge(target, metrics).await)
    }
}

/// Count dependencies that are always installed, skipping those gated on an extra.
fn count_required(requires_dist: &[String]) -> u64 {
    requires_dist.iter().filter(|d| !EXTRA_MARKER_REGEX.is_match(d)).count() as u64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extras_are_not_counted() {
        let deps = vec![
            "charset-normalizer<4,>=2".to_string(),
            "idna<4,>=2.5".to_string(),
            "PySocks!=1.5.7,>=1.5.6; extra == \"socks\"".to_string(),
            "chardet<6,>=3.0.2; extra == 'use-chardet-on-py3'".to_string(),
            "colorama; platform_system == \"Windows\"".to_string(),
        ];
        assert_eq!(count_required(&deps), 3);
    }

    #[test]
    fn package_names() {
        assert!(PACKAGE_REGEX.is_match("requests"));
        assert!(PACKAGE_REGEX.is_match("zope.interface"));
        assert!(PACKAGE_REGEX.is_match("a"));
        assert!(!PACKAGE_REGEX.is_match("-requests"));
        assert!(!PACKAGE_REGEX.is_match("requests-"));
        assert!(!PACKAGE_REGEX.is_match("re quests"));
    }

    #[test]
    fn project_without_optional_fields() {
        let json = r#"{ "info": { "version": "1.0", "license": null, "requires_dist": null } }"#;
        let project: ProjectResponse = serde_json::from_str(json).unwrap();
        assert_eq!(project.info.version, "1.0");
        assert!(project.releases.is_empty());
    }
}
