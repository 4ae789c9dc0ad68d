//! HTTP fetch collaborator
//!
//! This module handles all HTTP requests for the crawler:
//! - Building the HTTP client with timeouts and no redirect following
//! - Downloading page bodies
//! - Enforcing the acceptable content-type allowlist
//!
//! Redirects are never followed: any 3xx response is an error, so the crawl
//! can never be steered off its target domain by the server.

use async_trait::async_trait;
use reqwest::{header, redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;

/// Errors produced by a fetch attempt
///
/// All of them cause the URL to be blacklisted for the remainder of the
/// run; a transient network failure is treated the same as a permanent one.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("HTTP status {0}")]
    Status(u16),

    #[error("redirect response {0} refused")]
    Redirect(u16),

    #[error("unacceptable content type: {0:?}")]
    ContentType(String),

    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),
}

/// Contract the orchestrator expects from the content fetcher
#[async_trait]
pub trait Fetch: Send + Sync {
    /// Retrieves the raw bytes behind a URL
    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError>;
}

/// Production fetcher backed by reqwest
pub struct WebFetcher {
    client: Client,
    acceptable_content_types: Vec<String>,
}

impl WebFetcher {
    /// Builds a fetcher whose responses must carry one of the given
    /// content types (substring match, so "text/html" accepts
    /// "text/html; charset=utf-8")
    pub fn new(acceptable_content_types: &[String]) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .user_agent(concat!("burrow/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(30))
            .connect_timeout(Duration::from_secs(10))
            .redirect(Policy::none())
            .gzip(true)
            .brotli(true)
            .build()?;

        Ok(Self {
            client,
            acceptable_content_types: acceptable_content_types.to_vec(),
        })
    }

    fn is_acceptable(&self, content_type: &str) -> bool {
        self.acceptable_content_types
            .iter()
            .any(|accepted| content_type.contains(accepted.as_str()))
    }
}

#[async_trait]
impl Fetch for WebFetcher {
    async fn download(&self, url: &str) -> Result<Vec<u8>, FetchError> {
        let response = self.client.get(url).send().await?;

        let status = response.status();
        if status.is_redirection() {
            return Err(FetchError::Redirect(status.as_u16()));
        }
        if !status.is_success() {
            return Err(FetchError::Status(status.as_u16()));
        }

        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        if !self.is_acceptable(&content_type) {
            return Err(FetchError::ContentType(content_type));
        }

        Ok(response.bytes().await?.to_vec())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn html_fetcher() -> WebFetcher {
        WebFetcher::new(&["text/html".to_string(), "text/css".to_string()]).unwrap()
    }

    #[test]
    fn test_content_type_substring_match() {
        let fetcher = html_fetcher();

        assert!(fetcher.is_acceptable("text/html"));
        assert!(fetcher.is_acceptable("text/html; charset=utf-8"));
        assert!(!fetcher.is_acceptable("application/pdf"));
        assert!(!fetcher.is_acceptable(""));
    }

    #[tokio::test]
    async fn test_download_success() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/page"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_raw("<html>hi</html>", "text/html"),
            )
            .mount(&server)
            .await;

        let body = html_fetcher()
            .download(&format!("{}/page", server.uri()))
            .await
            .unwrap();
        assert_eq!(body, b"<html>hi</html>");
    }

    #[tokio::test]
    async fn test_download_rejects_non_2xx() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let result = html_fetcher()
            .download(&format!("{}/missing", server.uri()))
            .await;
        assert!(matches!(result, Err(FetchError::Status(404))));
    }

    #[tokio::test]
    async fn test_download_refuses_redirects() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/moved"))
            .respond_with(ResponseTemplate::new(301).insert_header("location", "/elsewhere"))
            .mount(&server)
            .await;

        let result = html_fetcher()
            .download(&format!("{}/moved", server.uri()))
            .await;
        assert!(matches!(result, Err(FetchError::Redirect(301))));
    }

    #[tokio::test]
    async fn test_download_rejects_disallowed_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/doc.pdf"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_bytes(vec![0x25, 0x50, 0x44, 0x46])
                    .insert_header("content-type", "application/pdf"),
            )
            .mount(&server)
            .await;

        let result = html_fetcher()
            .download(&format!("{}/doc.pdf", server.uri()))
            .await;
        assert!(matches!(result, Err(FetchError::ContentType(ct)) if ct == "application/pdf"));
    }
}
