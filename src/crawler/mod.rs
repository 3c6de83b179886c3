//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - HTTP fetching
//! - HTML parsing and link/image extraction
//! - The breadth-first frontier and per-origin politeness
//! - Recursive and single-page orchestration

mod fetcher;
pub mod frontier;
pub mod parser;
pub mod politeness;
mod session;
mod single;

pub use fetcher::{build_http_client, fetch_url, FetchResult, FetchedPage};
pub use frontier::{CrawlTarget, Frontier};
pub use parser::{extract_assets, extract_links, extract_title, parse_document, PageRecord};
pub use politeness::PolitenessGate;
pub use session::CrawlSession;
pub use single::scrape_single_page;

use crate::config::Config;
use crate::output::RunStats;
use crate::ScrapeError;
use std::path::PathBuf;
use url::Url;

/// Runs a complete recursive crawl
///
/// This is the main entry point for recursive mode. It will:
/// 1. Build the HTTP client and session state
/// 2. Crawl breadth-first from the seed
/// 3. Save every page under `output_dir`
///
/// # Returns
///
/// * `Ok(RunStats)` - Crawl finished (individual pages may have failed)
/// * `Err(ScrapeError)` - The session could not be set up
pub async fn crawl(
    config: Config,
    seed: Url,
    output_dir: impl Into<PathBuf>,
) -> Result<RunStats, ScrapeError> {
    let mut session = CrawlSession::new(config, seed, output_dir)?;
    Ok(session.run().await)
}
