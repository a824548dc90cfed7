use super::go_data::GoMetrics;
use crate::Result;
use crate::facts::http::{self, HttpClient, encode_path_segment};
use crate::facts::subqueries::Subqueries;
use crate::facts::time_utils::days_since;
use crate::facts::{Deadline, FetchResult, Provider};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Deserialize;
use std::sync::LazyLock;

pub const GO_PROXY_URL: &str = "https://proxy.golang.org";
pub const DEPS_DEV_URL: &str = "https://api.deps.dev";

static MODULE_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9][-a-zA-Z0-9.]*\.[a-zA-Z]{2,}/.+$").expect("invalid regex"));

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct ProxyInfo {
    version: String,
    time: DateTime<Utc>,
}

#[derive(Debug, Deserialize)]
struct VersionResponse {
    #[serde(default)]
    licenses: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DependenciesResponse {
    #[serde(default)]
    nodes: Vec<DependencyNode>,
}

#[derive(Debug, Deserialize)]
struct DependencyNode {
    relation: String,
}

#[derive(Debug, Clone)]
pub struct GoProvider {
    client: HttpClient,
    proxy_url: String,
    deps_dev_url: String,
}

impl GoProvider {
    pub fn new(proxy_url: Option<&str>, deps_dev_url: Option<&str>) -> Result<Self> {
        Ok(Self {
            client: HttpClient::plain()?,
            proxy_url: http::base_url(proxy_url, GO_PROXY_URL),
            deps_dev_url: http::base_url(deps_dev_url, DEPS_DEV_URL),
        })
    }

    fn version_url(&self, module: &str, version: &str) -> String {
        format!(
            "{}/v3alpha/systems/go/packages/{}/versions/{}",
            self.deps_dev_url,
            encode_path_segment(module),
            encode_path_segment(version)
        )
    }

    async fn license(&self, module: &str, version: &str, deadline: Deadline) -> Result<String> {
        let response: VersionResponse = self.client.get_json(&self.version_url(module, version), deadline).await?;
        Ok(response.licenses.join(" OR "))
    }

    async fn dependencies(&self, module: &str, version: &str, deadline: Deadline) -> Result<u64> {
        let url = format!("{}:dependencies", self.version_url(module, version));
        let response: DependenciesResponse = self.client.get_json(&url, deadline).await?;
        Ok(response.nodes.iter().filter(|n| n.relation == "DIRECT").count() as u64)
    }
}

#[async_trait]
impl Provider for GoProvider {
    fn scheme(&self) -> &str {
        "go"
    }

    async fn fetch(&self, identifier: &str, deadline: Deadline) -> Result<FetchResult> {
        let target = format!("go:{identifier}");

        if !MODULE_REGEX.is_match(identifier) {
            return Ok(FetchResult::failure(target, format!("invalid Go module path \"{identifier}\"")));
        }

        let url = format!("{}/{}/@latest", self.proxy_url, escape_module_path(identifier));
        let info: ProxyInfo = match self.client.get_json(&url, deadline).await {
            Ok(info) => info,
            Err(e) => return Ok(FetchResult::failure(target, format!("proxy: {}", e.message()))),
        };

        let metrics = GoMetrics {
            latest_version: info.version.clone(),
            last_publish_days: days_since(info.time),
            ..GoMetrics::default()
        };

        let mut subqueries = Subqueries::new();
        subqueries.add("license", self.license(identifier, &info.version, deadline), |m: &mut GoMetrics, v| {
            m.license = v;
        });
        subqueries.add(
            "dependencies",
            self.dependencies(identifier, &info.version, deadline),
            |m: &mut GoMetrics, v| m.dependencies_count = v,
        );

        Ok(subqueries.merge(target, metrics).await)
    }
}

/// Module proxy case encoding: each uppercase letter becomes `!` plus its lowercase form.
fn escape_module_path(module: &str) -> String {
    let mut escaped = String::with_capacity(module.len());
    for c in module.chars() {
        if c.is_uppercase() {
            escaped.push('!');
            escaped.extend(c.to_lowercase());
        } else {
            escaped.push(c);
        }
    }
    escaped
}
