//! Robots.txt handling module
//!
//! This module provides functionality for fetching and parsing robots.txt files.
//! Parsed rules are cached per origin by the politeness gate.

mod parser;

pub use parser::ParsedRobots;

use reqwest::{Client, StatusCode};
use std::time::Duration;

/// Timeout for robots.txt requests, independent of the page timeout
pub const ROBOTS_TIMEOUT: Duration = Duration::from_secs(5);

/// Builds the robots.txt URL for an origin (`scheme://host[:port]`)
pub fn robots_url(origin: &str) -> String {
    format!("{}/robots.txt", origin.trim_end_matches('/'))
}

/// Fetches robots.txt for an origin
///
/// Any failure (network error, timeout, non-200 status, unreadable body)
/// yields [`ParsedRobots::allow_all`], so a missing or broken robots.txt
/// never stops the crawl.
///
/// # Arguments
///
/// * `client` - The HTTP client to use
/// * `origin` - The origin, e.g. `https://example.com`
pub async fn fetch_robots(client: &Client, origin: &str) -> ParsedRobots {
    let url = robots_url(origin);

    let response = match client.get(&url).timeout(ROBOTS_TIMEOUT).send().await {
        Ok(response) => response,
        Err(e) => {
            tracing::debug!("robots.txt unreachable at {}: {}; allowing all", url, e);
            return ParsedRobots::allow_all();
        }
    };

    if response.status() != StatusCode::OK {
        tracing::debug!(
            "robots.txt at {} returned {}; allowing all",
            url,
            response.status()
        );
        return ParsedRobots::allow_all();
    }

    match response.text().await {
        Ok(body) => {
            tracing::debug!("Loaded robots.txt from {} ({} bytes)", url, body.len());
            ParsedRobots::from_content(&body)
        }
        Err(e) => {
            tracing::debug!("Failed to read robots.txt body from {}: {}", url, e);
            ParsedRobots::allow_all()
        }
    }
}
