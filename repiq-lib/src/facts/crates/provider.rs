use super::crates_data::CratesMetrics;
use crate::Result;
use crate::facts::http::{self, HttpClient};
use crate::facts::subqueries::Subqueries;
use crate::facts::time_utils::days_since;
use crate::facts::{Deadline, FetchResult, Provider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

pub const CRATES_IO_URL: &str = "https://crates.io";

static CRATE_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z][a-zA-Z0-9_-]*$").expect("invalid regex"));

#[derive(Debug, Deserialize)]
struct CrateResponse {
    #[serde(rename = "crate")]
    krate: CrateInfo,
    #[serde(default)]
    versions: Vec<VersionInfo>,
}

#[derive(Debug, Deserialize)]
struct CrateInfo {
    #[serde(default)]
    downloads: u64,
    recent_downloads: Option<u64>,
    max_stable_version: Option<String>,
    newest_version: String,
}

#[derive(Debug, Deserialize)]
struct VersionInfo {
    num: String,
    license: Option<String>,
    created_at: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct DependenciesResponse {
    dependencies: Vec<Dependency>,
}

#[derive(Debug, Deserialize)]
struct Dependency {
    kind: String,
}

#[derive(Debug, Deserialize)]
struct ReverseDependenciesResponse {
    meta: ReverseDependenciesMeta,
}

#[derive(Debug, Deserialize)]
struct ReverseDependenciesMeta {
    total: u64,
}

#[derive(Debug, Clone)]
pub struct CratesProvider {
    client: HttpClient,
    base_url: String,
}

impl CratesProvider {
    /// crates.io rejects requests without a descriptive User-Agent; [`HttpClient`] always sends one.
    pub fn new(base_url: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: HttpClient::plain()?,
            base_url: http::base_url(base_url, CRATES_IO_URL),
        })
    }

    async fn dependencies(&self, name: &str, version: &str, deadline: Deadline) -> Result<u64> {
        let url = format!("{}/api/v1/crates/{name}/{version}/dependencies", self.base_url);
        let response: DependenciesResponse = self.client.get_json(&url, deadline).await?;
        Ok(response.dependencies.iter().filter(|d| d.kind == "normal").count() as u64)
    }

    async fn reverse_dependencies(&self, name: &str, deadline: Deadline) -> Result<u64> {
        let url = format!("{}/api/v1/crates/{name}/reverse_dependencies?per_page=1", self.base_url);
        let response: ReverseDependenciesResponse = self.client.get_json(&url, deadline).await?;
        Ok(response.meta.total)
    }
}

#[async_trait]
impl Provider for CratesProvider {
    fn scheme(&self) -> &str {
        "crates"
    }

    async fn fetch(&self, identifier: &str, deadline: Deadline) -> Result<FetchResult> {
        let target = format!("crates:{identifier}");

        if !CRATE_REGEX.is_match(identifier) {
            return Ok(FetchResult::failure(target, format!("invalid crate name \"{identifier}\"")));
        }

        let url = format!("{}/api/v1/crates/{identifier}", self.base_url);
        let response: CrateResponse = match self.client.get_json(&url, deadline).await {
            Ok(response) => response,
            Err(e) => return Ok(FetchResult::failure(target, format!("crates.io API: {}", e.message()))),
        };

        let latest_version = response
            .krate
            .max_stable_version
            .filter(|v| !v.is_empty())
            .unwrap_or(response.krate.newest_version);

        let published = response.versions.iter().find(|v| v.num == latest_version);

        let metrics = CratesMetrics {
            downloads: response.krate.downloads,
            recent_downloads: response.krate.recent_downloads.unwrap_or_default(),
            last_publish_days: published.map_or(0, |v| days_since(v.created_at)),
            license: published.and_then(|v| v.license.clone()).unwrap_or_default(),
            latest_version: latest_version.clone(),
            ..CratesMetrics::default()
        };

        let mut subqueries = Subqueries::new();
        subqueries.add(
            "dependencies",
            self.dependencies(identifier, &latest_version, deadline),
            |m: &mut CratesMetrics, v| m.dependencies_count = v,
        );
        subqueries.add(
            "reverse_dependencies",
            self.reverse_dependencies(identifier, deadline),
            |m: &mut CratesMetrics, v| m.reverse_dependencies = v,
        );

        Ok(subqueries.merge(target, metrics).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_names() {
        assert!(CRATE_REGEX.is_match("serde"));
        assert!(CRATE_REGEX.is_match("serde_json"));
        assert!(CRATE_REGEX.is_match("cargo-edit"));
        assert!(!CRATE_REGEX.is_match("1password"));
        assert!(!CRATE_REGEX.is_match("serde json"));
        assert!(!CRATE_REGEX.is_match(""));
    }

    #[test]
    fn crate_response_with_null_stable_version() {
        let json = r#"{
            "crate": { "downloads": 5, "recent_downloads": null, "max_stable_version": null, "newest_version": "0.1.0-alpha" },
            "versions": [{ "num": "0.1.0-alpha", "license": "MIT", "created_at": "2024-01-02T03:04:05.123456+00:00" }]
        }"#;

        let response: CrateResponse = serde_json::from_str(json).unwrap();
        assert!(response.krate.max_stable_version.is_none());
        assert_eq!(response.versions[0].num, "0.1.0-alpha");
    }
}
