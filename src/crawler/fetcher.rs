//! HTTP fetcher implementation
//!
//! The crawler only needs one thing from the network: given a URL, the
//! page's plain text and its anchors. [`Fetcher`] is that boundary;
//! [`HttpFetcher`] implements it with reqwest and the HTML parser.

use crate::config::{CrawlerConfig, UserAgentConfig};
use crate::crawler::parser::{parse_document, Document};
use crate::IndexError;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;

/// Maximum redirect hops followed for one fetch
const MAX_REDIRECTS: usize = 10;

/// Source of crawled documents
#[async_trait]
pub trait Fetcher: Send + Sync {
    /// Fetches a URL and extracts its text and anchors
    async fn fetch(&self, url: &str) -> Result<Document, IndexError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `user_agent` - The user agent configuration
/// * `crawler` - Timeouts
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(
    user_agent: &UserAgentConfig,
    crawler: &CrawlerConfig,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent.header_value())
        .timeout(Duration::from_secs(crawler.request_timeout))
        .connect_timeout(Duration::from_secs(crawler.connect_timeout))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher backed by a reqwest client
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher from the crawler and user agent configuration
    pub fn new(user_agent: &UserAgentConfig, crawler: &CrawlerConfig) -> Result<Self, IndexError> {
        Ok(Self {
            client: build_http_client(user_agent, crawler)?,
        })
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<Document, IndexError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|source| IndexError::Http {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(IndexError::Fetch {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        let body = response.text().await.map_err(|source| IndexError::Http {
            url: url.to_string(),
            source,
        })?;

        Ok(parse_document(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn user_agent() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestCrawler".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    fn crawler() -> CrawlerConfig {
        CrawlerConfig {
            seed_url: "https://example.com/".to_string(),
            request_timeout: 5,
            connect_timeout: 2,
        }
    }

    #[test]
    fn test_build_http_client() {
        assert!(build_http_client(&user_agent(), &crawler()).is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        assert_eq!(
            user_agent().header_value(),
            "TestCrawler/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    #[tokio::test]
    async fn test_fetch_parses_document() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_string(
                        r#"<html><head><title>x</title></head><body>hello <a href="https://b.example/">мир</a></body></html>"#,
                    )
                    .insert_header("content-type", "text/html; charset=utf-8"),
            )
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&user_agent(), &crawler()).unwrap();
        let document = fetcher.fetch(&format!("{}/", server.uri())).await.unwrap();

        assert_eq!(document.text, "hello мир");
        assert_eq!(document.anchors.len(), 1);
    }

    #[tokio::test]
    async fn test_fetch_http_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .respond_with(ResponseTemplate::new(404))
            .mount(&server)
            .await;

        let fetcher = HttpFetcher::new(&user_agent(), &crawler()).unwrap();
        let result = fetcher.fetch(&format!("{}/missing", server.uri())).await;

        assert!(matches!(result, Err(IndexError::Fetch { message, .. }) if message == "HTTP 404"));
    }

    #[tokio::test]
    async fn test_fetch_connection_error() {
        let fetcher = HttpFetcher::new(&user_agent(), &crawler()).unwrap();
        let result = fetcher.fetch("http://127.0.0.1:1/").await;

        assert!(matches!(result, Err(IndexError::Http { .. })));
    }
}
