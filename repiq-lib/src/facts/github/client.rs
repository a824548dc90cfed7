//! GitHub REST API response shapes, trimmed to the fields we read.

use chrono::{DateTime, Utc};
use serde::Deserialize;

#[derive(Debug, Deserialize)]
pub struct Repository {
    #[serde(default)]
    pub stargazers_count: u64,
    #[serde(default)]
    pub forks_count: u64,
    #[serde(default)]
    pub open_issues_count: u64,
    pub license: Option<License>,
}

#[derive(Debug, Deserialize)]
pub struct License {
    pub spdx_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct CommitItem {
    pub commit: Commit,
}

#[derive(Debug, Deserialize)]
pub struct Commit {
    pub committer: Option<Signature>,
}

#[derive(Debug, Deserialize)]
pub struct Signature {
    pub date: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
pub struct SearchResult {
    pub total_count: u64,
}

/// Extract the page number of the `rel="last"` entry of a `Link` header.
pub fn last_page(link: &str) -> Option<u64> {
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        if !params.split(';').any(|p| p.trim() == r#"rel="last""#) {
            return None;
        }

        let target = target.trim().strip_prefix('<')?.strip_suffix('>')?;
        let url = url::Url::parse(target).ok()?;
        url.query_pairs().find(|(k, _)| k == "page").and_then(|(_, v)| v.parse().ok())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_page_from_link_header() {
        let link = r#"<https://api.github.com/repositories/10270250/contributors?per_page=1&page=2>; rel="next", <https://api.github.com/repositories/10270250/contributors?per_page=1&page=1653>; rel="last""#;
        assert_eq!(last_page(link), Some(1653));
    }

    #[test]
    fn last_page_missing_when_on_last_page() {
        let link = r#"<https://api.github.com/repositories/1/releases?per_page=1&page=1>; rel="prev", <https://api.github.com/repositories/1/releases?per_page=1&page=1>; rel="first""#;
        assert_eq!(last_page(link), None);
    }

    #[test]
    fn last_page_ignores_garbage() {
        assert_eq!(last_page("nonsense"), None);
        assert_eq!(last_page(r#"<not a url>; rel="last""#), None);
    }

    #[test]
    fn repository_with_license() {
        let json = r#"{
            "stargazers_count": 220000,
            "forks_count": 45000,
            "open_issues_count": 900,
            "license": { "key": "mit", "spdx_id": "MIT" }
        }"#;

        let repo: Repository = serde_json::from_str(json).unwrap();
        assert_eq!(repo.stargazers_count, 220_000);
        assert_eq!(repo.license.unwrap().spdx_id.as_deref(), Some("MIT"));
    }

    #[test]
    fn repository_without_license() {
        let repo: Repository = serde_json::from_str(r#"{ "stargazers_count": 3, "license": null }"#).unwrap();
        assert!(repo.license.is_none());
        assert_eq!(repo.forks_count, 0);
    }
}
