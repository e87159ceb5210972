//! HTTP fetcher implementation
//!
//! This module handles all HTTP requests for the crawler, including:
//! - Building HTTP clients with proper user agent strings
//! - GET requests to fetch page and document content
//! - Redirect handling
//! - Error classification
//!
//! The driver only sees the [`Fetcher`] trait, so tests and embedders can
//! substitute their own transport.

use crate::config::UserAgentConfig;
use async_trait::async_trait;
use reqwest::{redirect::Policy, Client};
use std::time::Duration;
use thiserror::Error;
use url::Url;

/// Maximum redirect hops followed for a single fetch
const MAX_REDIRECTS: usize = 10;

/// A successfully retrieved resource
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// Final URL after redirects
    pub final_url: Url,

    /// HTTP status code
    pub status: u16,

    /// Content-Type header value, empty if absent
    pub content_type: String,

    /// Raw response body
    pub body: Vec<u8>,
}

impl FetchedPage {
    /// True if the response declares a PDF body
    pub fn is_pdf(&self) -> bool {
        self.mime() == "application/pdf"
    }

    /// True if the response is HTML, or carries no content type at all
    pub fn is_html(&self) -> bool {
        matches!(self.mime().as_str(), "" | "text/html" | "application/xhtml+xml")
    }

    /// Body decoded as UTF-8, replacing invalid sequences
    pub fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    fn mime(&self) -> String {
        self.content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase()
    }
}

/// Reasons a fetch can fail
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("HTTP {code}")]
    Status { code: u16 },

    #[error("Request timeout")]
    Timeout,

    #[error("Connection refused")]
    Connect,

    #[error("Too many redirects")]
    Redirect,

    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for FetchError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            FetchError::Timeout
        } else if e.is_connect() {
            FetchError::Connect
        } else if e.is_redirect() {
            FetchError::Redirect
        } else {
            FetchError::Network(e.to_string())
        }
    }
}

/// Retrieves a resource by URL
#[async_trait]
pub trait Fetcher: Send + Sync {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError>;
}

/// Builds an HTTP client with proper configuration
///
/// # Example
///
/// ```no_run
/// use kb_harvest::config::UserAgentConfig;
/// use kb_harvest::crawler::build_http_client;
/// use std::time::Duration;
///
/// let config = UserAgentConfig::default();
/// let client = build_http_client(&config, Duration::from_secs(30)).unwrap();
/// ```
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout: Duration,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10).min(timeout))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// [`Fetcher`] over a reqwest [`Client`]
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Builds a fetcher with the configured user agent and timeout
    pub fn from_config(config: &UserAgentConfig, timeout: Duration) -> Result<Self, reqwest::Error> {
        Ok(Self::new(build_http_client(config, timeout)?))
    }
}

#[async_trait]
impl Fetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, FetchError> {
        let response = self.client.get(url.clone()).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Status {
                code: status.as_u16(),
            });
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        let body = response.bytes().await?.to_vec();

        Ok(FetchedPage {
            final_url,
            status: status.as_u16(),
            content_type,
            body,
        })
    }
}
