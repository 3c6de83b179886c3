//! Recursive crawl session - main crawl orchestration logic
//!
//! A [`CrawlSession`] owns every piece of mutable state for one run: the
//! frontier and visited set, per-origin politeness state, and statistics.
//! Pages are processed one at a time in breadth-first order.

use crate::config::Config;
use crate::crawler::frontier::{CrawlTarget, Frontier};
use crate::crawler::parser::PageRecord;
use crate::crawler::politeness::PolitenessGate;
use crate::crawler::{build_http_client, fetch_url};
use crate::output::{
    page_output_path, write_page, AssetLocalizer, PageOutcome, RunStats, IMAGES_DIR,
};
use crate::render::{render_page, AssetMap};
use crate::ScrapeError;
use chrono::Local;
use reqwest::Client;
use std::path::PathBuf;
use std::time::Instant;
use url::Url;

/// State and configuration of one recursive crawl
pub struct CrawlSession {
    config: Config,
    seed: Url,
    client: Client,
    frontier: Frontier,
    politeness: PolitenessGate,
    localizer: Option<AssetLocalizer>,
    stats: RunStats,
    output_dir: PathBuf,
}

impl CrawlSession {
    /// Creates a new crawl session
    ///
    /// # Arguments
    ///
    /// * `config` - The validated configuration
    /// * `seed` - The absolute http(s) URL to start from
    /// * `output_dir` - Directory receiving pages and the shared `images/` directory
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSession)` - Ready to run
    /// * `Err(ScrapeError)` - The HTTP client could not be built
    pub fn new(config: Config, seed: Url, output_dir: impl Into<PathBuf>) -> Result<Self, ScrapeError> {
        let output_dir = output_dir.into();
        let client = build_http_client(&config.crawler)?;

        let localizer = config.crawler.download_images.then(|| {
            AssetLocalizer::new(
                client.clone(),
                output_dir.join(IMAGES_DIR),
                config.crawler.asset_request_timeout(),
            )
        });

        Ok(Self {
            frontier: Frontier::new(&seed, &config.crawler),
            politeness: PolitenessGate::new(&config.crawler),
            config,
            seed,
            client,
            localizer,
            stats: RunStats::new(),
            output_dir,
        })
    }

    /// Runs the crawl until the frontier drains or the page budget is spent
    ///
    /// Per-page failures are counted, never returned.
    pub async fn run(&mut self) -> RunStats {
        let crawler = &self.config.crawler;
        tracing::info!("Starting recursive scrape from {}", self.seed);
        tracing::info!(
            "Max depth: {}, Max pages: {}",
            crawler.max_depth,
            crawler.max_pages
        );
        tracing::info!("Output directory: {}", self.output_dir.display());

        let max_pages = crawler.max_pages;
        let start_time = Instant::now();
        let mut processed = 0usize;

        while let Some((target, url)) = self.frontier.next_target() {
            processed += 1;
            tracing::info!("[{}/{}] Scraping: {}", processed, max_pages, target.url);

            let outcome = self.process_target(&target, &url).await;
            tracing::debug!("{} -> {}", target.url, outcome);
            self.stats.record(outcome);
        }

        tracing::debug!(
            "Crawl loop ended after {:?} ({} origins contacted, {} URLs left queued)",
            start_time.elapsed(),
            self.politeness.origin_count(),
            self.frontier.len()
        );

        self.stats
    }

    /// Runs one target through politeness, fetch, extraction and rendering
    async fn process_target(&mut self, target: &CrawlTarget, url: &Url) -> PageOutcome {
        if !self.politeness.is_allowed(&self.client, url).await {
            tracing::info!("URL {} disallowed by robots.txt", url);
            return PageOutcome::Skipped;
        }

        self.politeness.wait_for_turn(url).await;

        match self.process_page(target, url).await {
            Ok(path) => {
                tracing::debug!("Saved {} -> {}", url, path.display());
                PageOutcome::Succeeded
            }
            Err(e) => {
                tracing::warn!("Failed to scrape {}: {}", url, e);
                PageOutcome::Failed
            }
        }
    }

    async fn process_page(&mut self, target: &CrawlTarget, url: &Url) -> Result<PathBuf, ScrapeError> {
        let page = fetch_url(&self.client, url.as_str())
            .await
            .into_result(url.as_str())?;
        let record = PageRecord::from_body(url.clone(), page.final_url, page.body);

        if target.depth < self.config.crawler.max_depth {
            let added = self.frontier.enqueue_links(&record.links, target.depth + 1);
            tracing::debug!(
                "Queued {} of {} links from {} at depth {}",
                added,
                record.links.len(),
                url,
                target.depth + 1
            );
        }

        let output_path = page_output_path(&self.output_dir, url, self.config.output.format);

        let assets = match &self.localizer {
            Some(localizer) => localizer.localize_all(&record.assets, &output_path).await,
            None => AssetMap::new(),
        };

        let rendered = render_page(self.config.output.format, &record, &assets, Local::now())?;
        write_page(&output_path, &rendered).await?;

        Ok(output_path)
    }
}
