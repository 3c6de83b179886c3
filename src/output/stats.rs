//! Run statistics
//!
//! Page-level outcome counters for one crawl run, plus the end-of-run report.

use std::fmt;
use std::path::Path;

/// Final classification of one processed page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageOutcome {
    /// Fetched, rendered and written
    Succeeded,
    /// Fetch, render or write failed
    Failed,
    /// Disallowed by robots.txt
    Skipped,
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Succeeded => write!(f, "succeeded"),
            Self::Failed => write!(f, "failed"),
            Self::Skipped => write!(f, "skipped"),
        }
    }
}

/// Outcome counters for one run
///
/// Asset download failures are not counted here; they are logged only.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunStats {
    pub succeeded: u64,
    pub failed: u64,
    pub skipped: u64,
}

impl RunStats {
    /// Creates zeroed statistics
    pub fn new() -> Self {
        Self::default()
    }

    /// Counts one page outcome
    pub fn record(&mut self, outcome: PageOutcome) {
        match outcome {
            PageOutcome::Succeeded => self.succeeded += 1,
            PageOutcome::Failed => self.failed += 1,
            PageOutcome::Skipped => self.skipped += 1,
        }
    }

    /// Total number of pages processed
    pub fn total(&self) -> u64 {
        self.succeeded + self.failed + self.skipped
    }

    /// Percentage of processed pages that were saved
    pub fn success_rate(&self) -> f64 {
        if self.total() == 0 {
            0.0
        } else {
            (self.succeeded as f64 / self.total() as f64) * 100.0
        }
    }
}

impl fmt::Display for RunStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} succeeded, {} failed, {} skipped (robots.txt)",
            self.succeeded, self.failed, self.skipped
        )
    }
}

/// Logs the end-of-run report
///
/// Goes through the tracing subscriber, so `-q` silences it and stdout stays
/// reserved for the result path.
pub fn print_statistics(stats: &RunStats, output_dir: &Path) {
    tracing::info!("✓ Scraping complete!");
    tracing::info!("  Success: {}", stats.succeeded);
    tracing::info!("  Failed: {}", stats.failed);
    tracing::info!("  Skipped (robots.txt): {}", stats.skipped);
    tracing::info!("  Success rate: {:.1}%", stats.success_rate());
    tracing::info!("  Output: {}", output_dir.display());
}
