//! HTTP client fixture for deployed sample applications.
//!
//! Every application bundled in the tile exposes the same two endpoints:
//! `/env`, returning its environment as a flat JSON object of string keys
//! and string values, and `/hello`, a liveness probe. The client works
//! against a base URL, which may be an application route or a relay proxy
//! URL.

use reqwest::header::ACCEPT;
use serde::Deserialize;
use std::collections::HashMap;
use thiserror::Error;

/// Maximum length for error body in error messages.
const MAX_ERROR_BODY_LEN: usize = 256;

/// Truncate a response body for inclusion in an error message.
fn truncate_error_body(body: &str) -> String {
    if body.chars().count() > MAX_ERROR_BODY_LEN {
        let truncated: String = body.chars().take(MAX_ERROR_BODY_LEN).collect();
        format!("{}...[truncated]", truncated)
    } else {
        body.to_string()
    }
}

/// Application client errors.
#[derive(Debug, Error)]
pub enum AppClientError {
    #[error("HTTP request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("request failed with status {status}: {body}")]
    RequestFailed { status: u16, body: String },

    #[error("environment response was not a flat string map: {0}")]
    MalformedResponse(String),
}

/// Environment observed at a running application at one instant.
///
/// An immutable mapping of environment variable names to values; produced
/// by [`AppClient::fetch_environment`] and only read afterwards.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct EnvironmentSnapshot(HashMap<String, String>);

impl EnvironmentSnapshot {
    /// Look up a variable.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Look up a variable, treating an empty value as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Number of variables in the snapshot.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when the snapshot carries no variables.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for EnvironmentSnapshot {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Client for the sample applications' HTTP surface.
pub struct AppClient {
    http_client: reqwest::Client,
}

impl AppClient {
    /// Create a new client. No timeout is configured beyond the transport
    /// default.
    pub fn new() -> Self {
        Self {
            http_client: reqwest::Client::new(),
        }
    }

    /// Fetch `base_url + "/env"` and parse it into an environment snapshot.
    pub async fn fetch_environment(
        &self,
        base_url: &str,
    ) -> Result<EnvironmentSnapshot, AppClientError> {
        let url = format!("{}/env", base_url);

        let response = self
            .http_client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppClientError::RequestFailed {
                status: status.as_u16(),
                body: truncate_error_body(&body),
            });
        }

        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| AppClientError::MalformedResponse(e.to_string()))
    }

    /// Probe `base_url + "/hello"`. Only the status code matters.
    pub async fn hello(&self, base_url: &str) -> Result<(), AppClientError> {
        let url = format!("{}/hello", base_url);

        let response = self
            .http_client
            .get(&url)
            .header(ACCEPT, "application/json")
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(AppClientError::RequestFailed {
                status: status.as_u16(),
                body: truncate_error_body(&body),
            });
        }

        Ok(())
    }
}

impl Default for AppClient {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn test_fetch_environment_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/env"))
            .and(header("Accept", "application/json"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "APP4_HOST": "10.0.0.5",
                "APP4_HOSTS": "10.0.0.5",
                "EMPTY": ""
            })))
            .mount(&server)
            .await;

        let client = AppClient::new();
        let env = client.fetch_environment(&server.uri()).await.unwrap();

        assert_eq!(env.len(), 3);
        assert_eq!(env.get("APP4_HOST"), Some("10.0.0.5"));
        assert_eq!(env.get("EMPTY"), Some(""));
        assert_eq!(env.get_non_empty("EMPTY"), None);
        assert_eq!(env.get("MISSING"), None);
    }

    #[tokio::test]
    async fn test_non_success_status_carries_status_code() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/env"))
            .respond_with(ResponseTemplate::new(503).set_body_string("upstream down"))
            .mount(&server)
            .await;

        let client = AppClient::new();
        let err = client.fetch_environment(&server.uri()).await.unwrap_err();

        match err {
            AppClientError::RequestFailed { status, body } => {
                assert_eq!(status, 503);
                assert!(body.contains("upstream down"));
            }
            other => panic!("expected RequestFailed, got: {}", other),
        }
    }

    #[tokio::test]
    async fn test_invalid_json_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/env"))
            .respond_with(ResponseTemplate::new(200).set_body_string("not json"))
            .mount(&server)
            .await;

        let client = AppClient::new();
        let err = client.fetch_environment(&server.uri()).await.unwrap_err();

        assert!(matches!(err, AppClientError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_nested_object_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/env"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
                "VCAP_SERVICES": { "nested": "object" }
            })))
            .mount(&server)
            .await;

        let client = AppClient::new();
        let err = client.fetch_environment(&server.uri()).await.unwrap_err();

        assert!(matches!(err, AppClientError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_array_body_is_malformed() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/env"))
            .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!(["a", "b"])))
            .mount(&server)
            .await;

        let client = AppClient::new();
        let err = client.fetch_environment(&server.uri()).await.unwrap_err();

        assert!(matches!(err, AppClientError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_hello_success() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/hello"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let client = AppClient::new();
        client.hello(&server.uri()).await.unwrap();
    }

    #[tokio::test]
    async fn test_hello_non_success_fails() {
        let server = MockServer::start().await;

        Mock::given(method("GET"))
            .and(path("/hello"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let client = AppClient::new();
        let err = client.hello(&server.uri()).await.unwrap_err();

        assert!(matches!(err, AppClientError::RequestFailed { status: 404, .. }));
    }

    #[test]
    fn test_error_body_truncates_long_responses() {
        let long_body = "a".repeat(500);
        let truncated = truncate_error_body(&long_body);

        assert!(truncated.len() < 500);
        assert!(truncated.ends_with("...[truncated]"));
    }

    #[test]
    fn test_error_body_preserves_short_messages() {
        let body = r#"{"error": "Not found"}"#;
        assert_eq!(truncate_error_body(body), body);
    }

    #[test]
    fn test_snapshot_from_pairs() {
        let env: EnvironmentSnapshot = [("APP4_HOST", "10.0.0.5")].into_iter().collect();

        assert!(!env.is_empty());
        assert_eq!(env.get_non_empty("APP4_HOST"), Some("10.0.0.5"));
    }
}
