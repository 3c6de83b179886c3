//! HTTP fetcher implementation
//!
//! This module handles all page requests for the crawler:
//! - Building the HTTP client with a browser identity and timeout
//! - Single-attempt GET requests (no retries)
//! - Classifying the outcome for the caller

use crate::config::CrawlerConfig;
use crate::ScrapeError;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Result of a fetch operation
#[derive(Debug)]
pub enum FetchResult {
    /// Successfully fetched the page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// Page body, decoded with the charset from Content-Type
        body: String,
    },

    /// Server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// Network error (connection refused, timeout, body read failure, etc.)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchResult {
    /// Converts a failed fetch into a [`ScrapeError`] for callers that abort on failure
    pub fn into_result(self, url: &str) -> Result<FetchedPage, ScrapeError> {
        match self {
            Self::Success { final_url, body } => Ok(FetchedPage { final_url, body }),
            Self::HttpError { status_code } => Err(ScrapeError::Status {
                url: url.to_string(),
                status: status_code,
            }),
            Self::NetworkError { error } => Err(ScrapeError::Fetch {
                url: url.to_string(),
                message: error,
            }),
        }
    }
}

/// A successfully fetched page
#[derive(Debug, Clone)]
pub struct FetchedPage {
    pub final_url: Url,
    pub body: String,
}

/// Builds an HTTP client with the configured identity and timeout
///
/// # Example
///
/// ```no_run
/// use web_scraper::config::CrawlerConfig;
/// use web_scraper::crawler::build_http_client;
///
/// let client = build_http_client(&CrawlerConfig::default()).unwrap();
/// ```
pub fn build_http_client(config: &CrawlerConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.as_str())
        .timeout(config.request_timeout())
        .connect_timeout(config.request_timeout().min(Duration::from_secs(10)))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a URL once and classifies the outcome
///
/// | Condition | Result |
/// |-----------|--------|
/// | HTTP 2xx | Success |
/// | Any other status | HttpError |
/// | Timeout / connection failure / body error | NetworkError |
///
/// Redirects are followed by the client. No retry is attempted. The body is
/// decoded with the charset named in Content-Type, falling back to UTF-8.
/// Undecodable bytes are replaced rather than rejected.
pub async fn fetch_url(client: &Client, url: &str) -> FetchResult {
    let response = match client.get(url).send().await {
        Ok(response) => response,
        Err(e) => return classify_network_error(e),
    };

    let status = response.status();
    if !status.is_success() {
        return FetchResult::HttpError {
            status_code: status.as_u16(),
        };
    }

    let final_url = response.url().clone();

    match response.text().await {
        Ok(body) => FetchResult::Success { final_url, body },
        Err(e) => classify_network_error(e),
    }
}

fn classify_network_error(e: reqwest::Error) -> FetchResult {
    let error = if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        format!("Connection failed: {}", e)
    } else {
        e.to_string()
    };
    FetchResult::NetworkError { error }
}
