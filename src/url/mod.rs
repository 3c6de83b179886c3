//! URL handling module for Web-Scraper
//!
//! This module provides URL normalization, host/origin extraction, the crawl
//! admission filter, and output name generation.

mod domain;
mod filter;
mod naming;
mod normalize;

// Re-export main functions
pub use domain::{extract_host, origin_key};
pub use filter::{check_crawlable, is_crawlable, CrawlScope, Rejection};
pub use naming::{output_base_name, slug_for_url};
pub use normalize::normalize_url;

use crate::UrlError;
use url::Url;

/// Resolves a possibly relative reference against a base URL
///
/// Returns the absolute URL, or an error when the reference cannot be joined.
pub fn resolve(base: &Url, reference: &str) -> Result<Url, UrlError> {
    base.join(reference.trim())
        .map_err(|e| UrlError::Parse(format!("{}: {}", reference, e)))
}

/// Returns true for http and https URLs
pub fn is_http(url: &Url) -> bool {
    matches!(url.scheme(), "http" | "https")
}
