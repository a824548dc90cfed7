//! Thin HTTP client shared by all providers.
//!
//! Every request is bounded by the run's [`Deadline`], and any non-success status is
//! turned into an error whose message is the status line, e.g. `404 Not Found`.

use super::Deadline;
use crate::Result;
use ohno::{IntoAppError, app_err};
use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use reqwest::header::{ACCEPT, AUTHORIZATION, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;

/// Characters kept verbatim when a value is embedded as a single path segment; `/` is encoded.
const PATH_SEGMENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~')
    .remove(b'@')
    .remove(b'+');

pub const USER_AGENT: &str = concat!("repiq/", env!("CARGO_PKG_VERSION"), " (https://github.com/repiq/repiq)");

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: reqwest::Client,
}

impl HttpClient {
    /// Create a client that sends `headers` with every request.
    pub fn new(headers: HeaderMap) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .default_headers(headers)
            .build()
            .into_app_err("creating HTTP client")?;

        Ok(Self { client })
    }

    /// Create a client without extra headers.
    pub fn plain() -> Result<Self> {
        Self::new(HeaderMap::new())
    }

    /// Issue a GET request and fail on any non-success status.
    pub async fn get(&self, url: &str, deadline: Deadline) -> Result<reqwest::Response> {
        self.send(self.client.get(url), deadline).await
    }

    /// Issue a GET request with a specific `Accept` header.
    pub async fn get_with_accept(&self, url: &str, accept: &'static str, deadline: Deadline) -> Result<reqwest::Response> {
        self.send(self.client.get(url).header(ACCEPT, HeaderValue::from_static(accept)), deadline)
            .await
    }

    /// Issue a GET request and decode the JSON body.
    pub async fn get_json<T: DeserializeOwned>(&self, url: &str, deadline: Deadline) -> Result<T> {
        let response = self.get(url, deadline).await?;
        Ok(response.json::<T>().await?)
    }

    async fn send(&self, request: reqwest::RequestBuilder, deadline: Deadline) -> Result<reqwest::Response> {
        if deadline.is_expired() {
            return Err(app_err!("deadline exceeded"));
        }

        let response = request.timeout(deadline.remaining()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(app_err!("{status}"));
        }

        Ok(response)
    }
}

/// Add a bearer token to `headers`, marked sensitive so it never shows up in logs.
pub fn bearer_auth(headers: &mut HeaderMap, token: &str) -> Result<()> {
    let mut value = HeaderValue::from_str(&format!("Bearer {token}")).into_app_err("invalid characters in access token")?;
    value.set_sensitive(true);
    let _ = headers.insert(AUTHORIZATION, value);
    Ok(())
}

/// Strip trailing slashes from a configured base URL.
#[must_use]
pub fn base_url(configured: Option<&str>, default: &str) -> String {
    configured.unwrap_or(default).trim_end_matches('/').to_string()
}

/// Encode `value` so it occupies exactly one path segment, e.g. `@scope/name` becomes `@scope%2Fname`.
#[must_use]
pub fn encode_path_segment(value: &str) -> String {
    utf8_percent_encode(value, PATH_SEGMENT).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::time::Duration;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[test]
    fn base_url_prefers_configured_value() {
        assert_eq!(base_url(Some("http://localhost:1234/"), "https://example.com"), "http://localhost:1234");
        assert_eq!(base_url(None, "https://example.com"), "https://example.com");
    }

    #[test]
    fn path_segment_encodes_slash_only() {
        assert_eq!(encode_path_segment("@types/node"), "@types%2Fnode");
        assert_eq!(encode_path_segment("golang.org/x/text"), "golang.org%2Fx%2Ftext");
        assert_eq!(encode_path_segment("v1.2.3+incompatible"), "v1.2.3+incompatible");
    }

    #[test]
    fn bearer_auth_is_sensitive() {
        let mut headers = HeaderMap::new();
        bearer_auth(&mut headers, "abc").unwrap();

        let value = headers.get(AUTHORIZATION).unwrap();
        assert!(value.is_sensitive());
        assert_eq!(value.to_str().unwrap(), "Bearer abc");
    }

    #[tokio::test]
    async fn error_status_becomes_status_line() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = HttpClient::plain().unwrap();
        let err = client
            .get(&format!("{}/missing", server.uri()), Deadline::after(Duration::from_secs(5)))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("404 Not Found"), "{err}");
    }

    #[tokio::test]
    async fn sends_accept_header() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doc"))
            .and(header("accept", "application/vnd.test+json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({ "ok": true })))
            .mount(&server)
            .await;

        let client = HttpClient::plain().unwrap();
        let response = client
            .get_with_accept(&format!("{}/doc", server.uri()), "application/vnd.test+json", Deadline::after(Duration::from_secs(5)))
            .await
            .unwrap();

        assert!(response.status().is_success());
    }

    #[tokio::test]
    async fn expired_deadline_sends_nothing() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200))
            .expect(0)
            .mount(&server)
            .await;

        let client = HttpClient::plain().unwrap();
        let err = client
            .get(&format!("{}/x", server.uri()), Deadline::after(Duration::ZERO))
            .await
            .unwrap_err();

        assert!(err.to_string().contains("deadline exceeded"), "{err}");
    }

    #[tokio::test]
    async fn slow_response_times_out_at_deadline() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(200).set_delay(Duration::from_secs(5)))
            .mount(&server)
            .await;

        let client = HttpClient::plain().unwrap();
        let started = std::time::Instant::now();
        let result = client
            .get(&format!("{}/slow", server.uri()), Deadline::after(Duration::from_millis(200)))
            .await;

        assert!(result.is_err());
        assert!(started.elapsed() < Duration::from_secs(4));
    }
}
