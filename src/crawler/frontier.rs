//! Breadth-first crawl frontier
//!
//! This module handles:
//! - FIFO queue management for URLs to crawl
//! - The visited set and page budget
//! - Admission of discovered links through the crawl filter

use crate::config::CrawlerConfig;
use crate::state::VisitedSet;
use crate::url::{check_crawlable, extract_host, normalize_url, CrawlScope};
use std::collections::{HashSet, VecDeque};
use url::Url;

/// A URL queued for fetching with its link distance from the seed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CrawlTarget {
    /// Normalized URL to fetch
    pub url: String,

    /// Number of link hops from the seed (seed is 0)
    pub depth: u32,
}

/// Frontier manages the queue of pending URLs and the visited set
///
/// Targets leave the queue in exactly the order they were admitted, so all
/// pages at depth `d` are processed before any page at depth `d + 1`.
#[derive(Debug)]
pub struct Frontier {
    /// Pending targets in admission order
    queue: VecDeque<CrawlTarget>,

    /// URLs currently waiting in `queue`
    queued: HashSet<String>,

    /// Every URL dequeued and accepted for processing
    visited: VisitedSet,

    /// Depth, budget and domain limits for this run
    scope: CrawlScope,
}

impl Frontier {
    /// Creates a frontier seeded with one URL at depth 0
    pub fn new(seed: &Url, config: &CrawlerConfig) -> Self {
        let scope = CrawlScope {
            max_depth: config.max_depth,
            max_pages: config.max_pages,
            same_domain: config.same_domain,
            seed_host: extract_host(seed),
        };

        let mut frontier = Self {
            queue: VecDeque::new(),
            queued: HashSet::new(),
            visited: VisitedSet::new(),
            scope,
        };
        frontier.push(normalize_url(seed.as_str()), 0);
        frontier
    }

    /// Returns the next target to process, marking it visited
    ///
    /// Queued targets are checked again on the way out: a URL admitted twice
    /// before its first visit, or one that no longer fits the budget, is
    /// dropped here. Dropped targets are not marked visited.
    ///
    /// # Returns
    ///
    /// * `Some((target, url))` - A target that is now marked visited
    /// * `None` - The queue is drained or the page budget is spent
    pub fn next_target(&mut self) -> Option<(CrawlTarget, Url)> {
        while self.has_budget() {
            let target = self.queue.pop_front()?;
            self.queued.remove(&target.url);

            match check_crawlable(&target.url, target.depth, &self.visited, &self.scope) {
                Ok(url) => {
                    self.visited.insert(target.url.clone());
                    return Some((target, url));
                }
                Err(reason) => {
                    tracing::debug!("Dropping queued URL {}: {:?}", target.url, reason);
                }
            }
        }

        None
    }

    /// Admits discovered links at the given depth
    ///
    /// Each link goes through the crawl filter against the current visited
    /// set. Links already waiting in the queue are not admitted again.
    ///
    /// # Returns
    ///
    /// The number of links added to the queue
    pub fn enqueue_links<I, S>(&mut self, links: I, depth: u32) -> usize
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut added = 0;

        for link in links {
            let link = link.as_ref();
            match check_crawlable(link, depth, &self.visited, &self.scope) {
                Ok(url) => {
                    if self.push(normalize_url(url.as_str()), depth) {
                        added += 1;
                    }
                }
                Err(reason) => {
                    tracing::trace!("Not queueing {}: {:?}", link, reason);
                }
            }
        }

        added
    }

    /// Appends a target unless the same URL is already waiting
    fn push(&mut self, url: String, depth: u32) -> bool {
        if !self.queued.insert(url.clone()) {
            return false;
        }
        self.queue.push_back(CrawlTarget { url, depth });
        true
    }

    /// Returns true while the visited set is below the page budget
    pub fn has_budget(&self) -> bool {
        self.visited.len() < self.scope.max_pages
    }

    /// Returns the number of URLs waiting in the queue
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    /// Returns whether the queue is empty
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Returns the visited set
    pub fn visited(&self) -> &VisitedSet {
        &self.visited
    }
}
