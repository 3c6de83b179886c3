use crate::robots::ParsedRobots;
use std::time::{Duration, Instant};

/// Tracks the politeness state of one origin during a crawl
///
/// Entries are created lazily on the first request to an origin and live for
/// the whole run.
#[derive(Debug, Clone, Default)]
pub struct OriginPolicy {
    /// Parsed robots.txt rules; None until first fetched
    pub robots: Option<ParsedRobots>,

    /// Timestamp of the last request issued to this origin
    pub last_request_time: Option<Instant>,

    /// Number of requests issued to this origin, robots.txt included
    pub request_count: u32,
}

impl OriginPolicy {
    /// Creates a new OriginPolicy with no robots rules and no request history
    pub fn new() -> Self {
        Self::default()
    }

    /// Records that a request was made to this origin
    pub fn record_request(&mut self, now: Instant) {
        self.request_count += 1;
        self.last_request_time = Some(now);
    }

    /// Calculates the time until the next request can be made
    ///
    /// Returns None if a request can be made now, or the duration to wait otherwise.
    pub fn time_until_next_request(&self, min_interval: Duration, now: Instant) -> Option<Duration> {
        let last = self.last_request_time?;
        let elapsed = now.saturating_duration_since(last);
        if elapsed < min_interval {
            Some(min_interval - elapsed)
        } else {
            None
        }
    }

    /// Caches the robots.txt rules for this origin
    pub fn update_robots(&mut self, robots: ParsedRobots) {
        self.robots = Some(robots);
    }
}
