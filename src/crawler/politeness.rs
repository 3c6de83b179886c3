//! Per-origin politeness: robots.txt rules and request spacing
//!
//! Each origin (`scheme://host[:port]`) gets one [`OriginPolicy`] for the
//! whole run. robots.txt is fetched at most once per origin, and every
//! request to the same origin, robots.txt included, is spaced by the
//! configured interval.

use crate::config::CrawlerConfig;
use crate::robots::fetch_robots;
use crate::state::OriginPolicy;
use crate::url::origin_key;
use reqwest::Client;
use std::collections::HashMap;
use std::time::{Duration, Instant};
use url::Url;

/// Gatekeeper consulted before every page request in a recursive crawl
#[derive(Debug)]
pub struct PolitenessGate {
    /// Per-origin state, created lazily
    origins: HashMap<String, OriginPolicy>,

    /// Whether robots.txt rules are enforced
    respect_robots: bool,

    /// Minimum spacing between requests to one origin
    min_interval: Duration,

    /// Product token matched against robots.txt user-agent lines
    robots_agent: String,
}

impl PolitenessGate {
    /// Creates a gate from the crawler configuration
    pub fn new(config: &CrawlerConfig) -> Self {
        Self {
            origins: HashMap::new(),
            respect_robots: config.respect_robots,
            min_interval: config.rate_limit_interval(),
            robots_agent: config.robots_agent().to_string(),
        }
    }

    /// Checks whether robots.txt allows fetching `url`
    ///
    /// The origin's robots.txt is fetched on first use and cached for the
    /// rest of the run. That fetch counts as a request to the origin, so the
    /// page request that follows waits out the interval. Always true when
    /// robots enforcement is off.
    pub async fn is_allowed(&mut self, client: &Client, url: &Url) -> bool {
        if !self.respect_robots {
            return true;
        }

        let Some(origin) = origin_key(url) else {
            return true;
        };

        if self
            .origins
            .get(&origin)
            .map_or(true, |policy| policy.robots.is_none())
        {
            self.wait_for_origin(&origin).await;
            let robots = fetch_robots(client, &origin).await;
            if let Some(policy) = self.origins.get_mut(&origin) {
                policy.update_robots(robots);
            }
        }

        let Some(policy) = self.origins.get(&origin) else {
            return true;
        };

        let allowed = policy
            .robots
            .as_ref()
            .map_or(true, |robots| robots.is_allowed(url.as_str(), &self.robots_agent));
        if !allowed {
            tracing::debug!("robots.txt for {} disallows {}", origin, url);
        }
        allowed
    }

    /// Waits until a request to `url`'s origin respects the interval, then records it
    ///
    /// The first request to an origin never waits. The wait covers only the
    /// remainder of the interval since the previous request.
    pub async fn wait_for_turn(&mut self, url: &Url) {
        if let Some(origin) = origin_key(url) {
            self.wait_for_origin(&origin).await;
        }
    }

    async fn wait_for_origin(&mut self, origin: &str) {
        let wait = self
            .origins
            .get(origin)
            .and_then(|policy| policy.time_until_next_request(self.min_interval, Instant::now()));

        if let Some(wait) = wait {
            tracing::debug!("Rate limiting {}: waiting {:?}", origin, wait);
            tokio::time::sleep(wait).await;
        }

        self.origins
            .entry(origin.to_string())
            .or_default()
            .record_request(Instant::now());
    }

    /// Returns the state tracked for an origin, if any
    pub fn origin_policy(&self, origin: &str) -> Option<&OriginPolicy> {
        self.origins.get(origin)
    }

    /// Returns the number of origins seen so far
    pub fn origin_count(&self) -> usize {
        self.origins.len()
    }
}
