use super::client::{CommitItem, Repository, SearchResult, last_page};
use super::github_data::{GitHubMetrics, PagedCount};
use crate::Result;
use crate::facts::http::{self, HttpClient};
use crate::facts::subqueries::Subqueries;
use crate::facts::time_utils::{date_days_ago, days_since};
use crate::facts::{Deadline, FetchResult, Provider};
use async_trait::async_trait;
use chrono::Utc;
use ohno::IntoAppError;
use regex::Regex;
use reqwest::header::{ACCEPT, HeaderMap, HeaderValue, LINK};
use serde::de::IgnoredAny;
use std::sync::LazyLock;
use url::Url;

const LOG_TARGET: &str = "    github";

pub const GITHUB_API_URL: &str = "https://api.github.com";

/// Largest page the API returns, used when the count has to come from a single page.
const FALLBACK_PAGE_SIZE: u64 = 100;

const RECENT_WINDOW_DAYS: i64 = 30;

static NAME_REGEX: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[a-zA-Z0-9._-]+$").expect("invalid regex"));

#[derive(Debug, Clone)]
pub struct GitHubProvider {
    client: HttpClient,
    base_url: String,
}

impl GitHubProvider {
    /// Create a provider, authenticated when `token` is given.
    pub fn new(token: Option<&str>, base_url: Option<&str>) -> Result<Self> {
        let mut headers = HeaderMap::new();
        let _ = headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));
        let _ = headers.insert("x-github-api-version", HeaderValue::from_static("2022-11-28"));

        if let Some(token) = token {
            http::bearer_auth(&mut headers, token)?;
        }

        Ok(Self {
            client: HttpClient::new(headers)?,
            base_url: http::base_url(base_url, GITHUB_API_URL),
        })
    }

    /// Count the items of a repository sub-resource such as `contributors`.
    ///
    /// With one item per page, the `rel="last"` link names the item count directly.
    /// Without pagination the first page of up to 100 items is counted instead.
    async fn paged_count(&self, owner: &str, repo: &str, resource: &str, deadline: Deadline) -> Result<PagedCount> {
        let url = format!("{}/repos/{owner}/{repo}/{resource}", self.base_url);

        let response = self.client.get(&format!("{url}?per_page=1"), deadline).await?;
        let last = response
            .headers()
            .get(LINK)
            .and_then(|h| h.to_str().ok())
            .and_then(last_page);

        if let Some(count) = last {
            return Ok(PagedCount { count, capped: false });
        }

        log::debug!(target: LOG_TARGET, "No pagination for {owner}/{repo} {resource}, counting a single page");

        let response = self.client.get(&format!("{url}?per_page={FALLBACK_PAGE_SIZE}"), deadline).await?;
        let body = response.text().await?;

        // An empty repository answers `204 No Content` for contributors
        let count = if body.trim().is_empty() {
            0
        } else {
            serde_json::from_str::<Vec<IgnoredAny>>(&body)?.len() as u64
        };

        Ok(PagedCount {
            count,
            capped: count >= FALLBACK_PAGE_SIZE,
        })
    }

    async fn last_commit_days(&self, owner: &str, repo: &str, deadline: Deadline) -> Result<u64> {
        let url = format!("{}/repos/{owner}/{repo}/commits?per_page=1", self.base_url);
        let commits: Vec<CommitItem> = self.client.get_json(&url, deadline).await?;

        Ok(commits
            .first()
            .and_then(|c| c.commit.committer.as_ref())
            .and_then(|c| c.date)
            .map_or(0, days_since))
    }

    async fn search_total(&self, kind: &str, query: String, deadline: Deadline) -> Result<u64> {
        let mut url = Url::parse(&format!("{}/search/{kind}", self.base_url)).into_app_err("invalid GitHub API URL")?;
        let _ = url.query_pairs_mut().append_pair("q", &query).append_pair("per_page", "1");

        let result: SearchResult = self.client.get_json(url.as_str(), deadline).await?;
        Ok(result.total_count)
    }
}

#[async_trait]
impl Provider for GitHubProvider {
    fn scheme(&self) -> &str {
        "github"
    }

    async fn fetch(&self, identifier: &str, deadline: Deadline) -> Result<FetchResult> {
        let target = format!("github:{identifier}");

        let (owner, repo) = match parse_identifier(identifier) {
            Ok(parts) => parts,
            Err(message) => return Ok(FetchResult::failure(target, message)),
        };

        let url = format!("{}/repos/{owner}/{repo}", self.base_url);
        let repository: Repository = match self.client.get_json(&url, deadline).await {
            Ok(repository) => repository,
            Err(e) => return Ok(FetchResult::failure(target, format!("GitHub API: {}", e.message()))),
        };

        let metrics = GitHubMetrics {
            stars: repository.stargazers_count,
            forks: repository.forks_count,
            open_issues: repository.open_issues_count,
            license: repository.license.and_then(|l| l.spdx_id).unwrap_or_default(),
            ..GitHubMetrics::default()
        };

        let since = date_days_ago(RECENT_WINDOW_DAYS, Utc::now());

        let mut subqueries = Subqueries::new();
        subqueries.add(
            "contributors",
            self.paged_count(owner, repo, "contributors", deadline),
            |m: &mut GitHubMetrics, v| m.contributors = v,
        );
        subqueries.add(
            "releases",
            self.paged_count(owner, repo, "releases", deadline),
            |m: &mut GitHubMetrics, v| m.release_count = v,
        );
        subqueries.add(
            "commits",
            self.last_commit_days(owner, repo, deadline),
            |m: &mut GitHubMetrics, v| m.last_commit_days = v,
        );
        subqueries.add(
            "search commits",
            self.search_total("commits", format!("repo:{owner}/{repo} committer-date:>{since}"), deadline),
            |m: &mut GitHubMetrics, v| m.commits_30d = v,
        );
        subqueries.add(
            "search issues",
            self.search_total("issues", format!("repo:{owner}/{repo} is:issue is:closed closed:>{since}"), deadline),
            |m: &mut GitHubMetrics, v| m.issues_closed_30d = v,
        );

        Ok(subqueries.merge(target, metrics).await)
    }
}

fn parse_identifier(identifier: &str) -> core::result::Result<(&str, &str), String> {
    let Some((owner, repo)) = identifier.split_once('/').filter(|(o, r)| !o.is_empty() && !r.is_empty()) else {
        return Err(format!("invalid identifier \"{identifier}\": expected owner/repo"));
    };

    if !NAME_REGEX.is_match(owner) || !NAME_REGEX.is_match(repo) {
        return Err(format!(
            "invalid identifier \"{identifier}\": owner and repo must match [a-zA-Z0-9._-]+"
        ));
    }

    Ok((owner, repo))
}
