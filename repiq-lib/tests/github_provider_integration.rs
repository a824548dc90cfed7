//! Integration tests for the GitHub provider against a wiremock server

use core::time::Duration;
use repiq_lib::facts::github::{GitHubMetrics, GitHubProvider, PagedCount};
use repiq_lib::facts::{Deadline, Metrics, Provider};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn deadline() -> Deadline {
    Deadline::after(Duration::from_secs(10))
}

fn github(metrics: Option<&Metrics>) -> &GitHubMetrics {
    match metrics {
        Some(Metrics::GitHub(m)) => m,
        other => panic!("expected GitHub metrics, got {other:?}"),
    }
}

async fn mount_repository(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/repos/facebook/react"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "stargazers_count": 215_000,
            "forks_count": 45_000,
            "open_issues_count": 1000,
            "license": { "spdx_id": "MIT" }
        })))
        .mount(server)
        .await;
}

async fn mount_activity(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/repos/facebook/react/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            { "commit": { "committer": { "date": chrono::Utc::now().to_rfc3339() } } }
        ])))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/commits"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_count": 120 })))
        .mount(server)
        .await;

    Mock::given(method("GET"))
        .and(path("/search/issues"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "total_count": 340 })))
        .mount(server)
        .await;
}

async fn mount_paginated(server: &MockServer, resource: &str, last: u64) {
    let link = format!(
        "<{uri}/repositories/1/{resource}?per_page=1&page=2>; rel=\"next\", <{uri}/repositories/1/{resource}?per_page=1&page={last}>; rel=\"last\"",
        uri = server.uri()
    );

    Mock::given(method("GET"))
        .and(path(format!("/repos/facebook/react/{resource}")))
        .and(query_param("per_page", "1"))
        .respond_with(ResponseTemplate::new(200).insert_header("link", link.as_str()).set_body_json(json!([{}])))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_counts_from_link_header() {
    let server = MockServer::start().await;
    mount_repository(&server).await;
    mount_activity(&server).await;
    mount_paginated(&server, "contributors", 1653).await;
    mount_paginated(&server, "releases", 200).await;

    let provider = GitHubProvider::new(None, Some(&server.uri())).unwrap();
    let result = provider.fetch("facebook/react", deadline()).await.unwrap();

    assert_eq!(result.target(), "github:facebook/react");
    assert!(result.error().is_none(), "{result:?}");

    let m = github(result.metrics());
    assert_eq!(m.stars, 215_000);
    assert_eq!(m.forks, 45_000);
    assert_eq!(m.open_issues, 1000);
    assert_eq!(m.license, "MIT");
    assert_eq!(m.contributors, PagedCount { count: 1653, capped: false });
    assert_eq!(m.release_count, PagedCount { count: 200, capped: false });
    assert_eq!(m.last_commit_days, 0);
    assert_eq!(m.commits_30d, 120);
    assert_eq!(m.issues_closed_30d, 340);
}

#[tokio::test]
async fn test_counts_fall_back_to_single_page() {
    let server = MockServer::start().await;
    mount_repository(&server).await;
    mount_activity(&server).await;

    // No Link header: a single page answers both requests
    Mock::given(method("GET"))
        .and(path("/repos/facebook/react/contributors"))
        .and(query_param("per_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{}])))
        .mount(&server)
        .await;

    let full_page: Vec<_> = (0..100).map(|i| json!({ "id": i })).collect();
    Mock::given(method("GET"))
        .and(path("/repos/facebook/react/contributors"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(full_page))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/facebook/react/releases"))
        .and(query_param("per_page", "1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{}])))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/repos/facebook/react/releases"))
        .and(query_param("per_page", "100"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{}, {}, {}])))
        .mount(&server)
        .await;

    let provider = GitHubProvider::new(None, Some(&server.uri())).unwrap();
    let result = provider.fetch("facebook/react", deadline()).await.unwrap();

    assert!(result.error().is_none(), "{result:?}");
    let m = github(result.metrics());
    assert_eq!(m.contributors, PagedCount { count: 100, capped: true });
    assert_eq!(m.release_count, PagedCount { count: 3, capped: false });
}

#[tokio::test]
async fn test_failed_subquery_is_partial() {
    let server = MockServer::start().await;
    mount_repository(&server).await;
    mount_activity(&server).await;
    mount_paginated(&server, "contributors", 10).await;

    Mock::given(method("GET"))
        .and(path("/repos/facebook/react/releases"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let provider = GitHubProvider::new(None, Some(&server.uri())).unwrap();
    let result = provider.fetch("facebook/react", deadline()).await.unwrap();

    assert!(!result.is_total_failure());
    let error = result.error().unwrap();
    assert!(error.starts_with("releases: "), "{error}");
    assert!(error.contains("500"), "{error}");

    let m = github(result.metrics());
    assert_eq!(m.stars, 215_000);
    assert_eq!(m.contributors.count, 10);
    assert_eq!(m.release_count, PagedCount::default());
}

#[tokio::test]
async fn test_missing_repository_is_total_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/nonexistent/repo"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GitHubProvider::new(None, Some(&server.uri())).unwrap();
    let result = provider.fetch("nonexistent/repo", deadline()).await.unwrap();

    assert!(result.is_total_failure());
    assert!(result.error().unwrap().starts_with("GitHub API: 404 Not Found"), "{result:?}");
}

#[tokio::test]
async fn test_invalid_identifier_makes_no_requests() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let provider = GitHubProvider::new(None, Some(&server.uri())).unwrap();

    for identifier in ["facebook", "facebook/react/extra", "face book/react"] {
        let result = provider.fetch(identifier, deadline()).await.unwrap();
        assert!(result.is_total_failure(), "{identifier}");
        assert!(result.error().unwrap().contains("invalid identifier"), "{result:?}");
    }
}

#[tokio::test]
async fn test_token_is_sent_as_bearer() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/repos/facebook/react"))
        .and(header("authorization", "Bearer secret-token"))
        .and(header("x-github-api-version", "2022-11-28"))
        .respond_with(ResponseTemplate::new(404))
        .expect(1)
        .mount(&server)
        .await;

    let provider = GitHubProvider::new(Some("secret-token"), Some(&server.uri())).unwrap();
    let result = provider.fetch("facebook/react", deadline()).await.unwrap();

    assert!(result.error().unwrap().starts_with("GitHub API: 404"), "{result:?}");
}
