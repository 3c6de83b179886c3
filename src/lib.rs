//! Web-Scraper: a polite single-site page harvester
//!
//! This crate fetches a seed page (optionally following its links breadth-first),
//! respects robots.txt and per-origin rate limits, and saves every page either as
//! raw markup with localized images or as a linearized Markdown document.

pub mod config;
pub mod crawler;
pub mod output;
pub mod render;
pub mod robots;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Web-Scraper operations
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("HTTP status {status} for {url}")]
    Status { url: String, status: u16 },

    #[error("Failed to fetch {url}: {message}")]
    Fetch { url: String, message: String },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("Markup rewrite error for {url}: {message}")]
    Rewrite { url: String, message: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid seed URL: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,
}

/// Result type alias for Web-Scraper operations
pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{Config, OutputFormat};
pub use crawler::{scrape_single_page, CrawlSession};
pub use output::RunStats;
pub use url::{is_crawlable, normalize_url};
