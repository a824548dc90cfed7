use super::npm_data::NpmMetrics;
use crate::Result;
use crate::facts::http::{self, HttpClient};
use crate::facts::subqueries::Subqueries;
use crate::facts::time_utils::days_since;
use crate::facts::{Deadline, FetchResult, Provider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use serde::de::IgnoredAny;
use std::collections::HashMap;
use std::sync::LazyLock;

pub const NPM_REGISTRY_URL: &str = "https://registry.npmjs.org";
pub const NPM_DOWNLOADS_URL: &str = "https://api.npmjs.org";

const ABBREVIATED_METADATA: &str = "application/vnd.npm.install-v1+json";

static PACKAGE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(@[a-zA-Z0-9][\w.-]*/)?[a-zA-Z0-9][\w.-]*$").expect("invalid regex"));

#[derive(Debug, Deserialize)]
struct LatestManifest {
    version: String,
    #[serde(default)]
    dependencies: HashMap<String, IgnoredAny>,
    license: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct AbbreviatedPackument {
    modified: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct DownloadPoint {
    downloads: u64,
}

#[derive(Debug, Clone)]
pub struct NpmProvider {
    client: HttpClient,
    registry_url: String,
    downloads_url: String,
}

impl NpmProvider {
    pub fn new(registry_url: Option<&str>, downloads_url: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: HttpClient::plain()?,
            registry_url: http::base_url(registry_url, NPM_REGISTRY_URL),
            downloads_url: http::base_url(downloads_url, NPM_DOWNLOADS_URL),
        })
    }

    async fn last_publish_days(&self, package: &str, deadline: Deadline) -> Result<u64> {
        let url = format!("{}/{package}", self.registry_url);
        let response = self.client.get_with_accept(&url, ABBREVIATED_METADATA, deadline).await?;
        let packument: AbbreviatedPackument = response.json().await?;
        Ok(days_since(packument.modified))
    }

    async fn downloads(&self, package: &str, period: &str, deadline: Deadline) -> Result<u64> {
        // Scoped names must stay a single path segment, i.e. `@scope%2Fname`
        let url = format!("{}/downloads/point/{period}/{}", self.downloads_url, http::encode_path_segment(package));
        let point: DownloadPoint = self.client.get_json(&url, deadline).await?;
        Ok(point.downloads)
    }
}

#[async_trait]
impl Provider for NpmProvider {
    fn scheme(&self) -> &str {
        "npm"
    }

    async fn fetch(&self, identifier: &str, deadline: Deadline) -> Result<FetchResult> {
        let target = format!("npm:{identifier}");

        if !PACKAGE_REGEX.is_match(identifier) {
            return Ok(FetchResult::failure(target, format!("invalid npm package name \"{identifier}\"")));
        }

        let url = format!("{}/{identifier}/latest", self.registry_url);
        let manifest: LatestManifest = match self.client.get_json(&url, deadline).await {
            Ok(manifest) => manifest,
            Err(e) => return Ok(FetchResult::failure(target, format!("npm registry: {}", e.message()))),
        };

        let metrics = NpmMetrics {
            latest_version: manifest.version,
            dependencies_count: manifest.dependencies.len() as u64,
            license: manifest.license.as_ref().map(license_name).unwrap_or_default(),
            ..NpmMetrics::default()
        };

        let mut subqueries = Subqueries::new();
        subqueries.add("modified", self.last_publish_days(identifier, deadline), |m: &mut NpmMetrics, v| {
            m.last_publish_days = v;
        });
        subqueries.add("downloads", self.downloads(identifier, "last-week", deadline), |m: &mut NpmMetrics, v| {
            m.weekly_downloads = v;
        });
        subqueries.add(
            "monthly_downloads",
            self.downloads(identifier, "last-month", deadline),
            |m: &mut NpmMetrics, v| m.monthly_downloads = v,
        );

        Ok(subqueries.merge(target, metrics).await)
    }
}

/// Manifests carry either an SPDX string or a legacy `{ "type": ... }` object.
fn license_name(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Object(o) => o.get("type").and_then(serde_json::Value::as_str).unwrap_or_default().to_string(),
        _ => String::new(),
    }
}
