//! Configuration module for Web-Scraper
//!
//! Settings come from built-in defaults, an optional TOML file, and finally
//! command-line flags (applied by the binary).
//!
//! # Example
//!
//! ```no_run
//! use web_scraper::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("scraper.toml")).unwrap();
//! println!("Crawler will use max depth: {}", config.crawler.max_depth);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, OutputConfig, OutputFormat, BROWSER_USER_AGENT};

// Re-export parser and validation functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::{validate, validate_seed_url};
