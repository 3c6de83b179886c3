//! Web-Scraper main entry point
//!
//! This is the command-line interface for the Web-Scraper page harvester.

use anyhow::Context;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;
use url::Url;
use web_scraper::config::{load_config_with_hash, validate, validate_seed_url, Config, OutputFormat};
use web_scraper::crawler::{crawl, scrape_single_page};
use web_scraper::output::print_statistics;
use web_scraper::url::output_base_name;

/// Web-Scraper: A polite single-site page harvester
///
/// Saves one page, or a whole site section breadth-first, as HTML with
/// localized images or as Markdown. The result path is printed to stdout;
/// progress and diagnostics go to stderr.
#[derive(Parser, Debug)]
#[command(name = "web-scraper")]
#[command(version = "1.0.0")]
#[command(about = "A polite single-site page harvester", long_about = None)]
struct Cli {
    /// URL to scrape (absolute http or https)
    #[arg(long)]
    url: String,

    /// Output format
    #[arg(short, long, value_enum)]
    format: Option<OutputFormat>,

    /// Output file (single page) or directory (recursive)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// Request timeout in seconds
    #[arg(long, value_name = "SECS")]
    timeout: Option<u64>,

    /// Keep remote image references instead of downloading images
    #[arg(long)]
    no_download_images: bool,

    /// Follow links breadth-first from the seed URL
    #[arg(short, long)]
    recursive: bool,

    /// Maximum link depth from the seed (recursive mode)
    #[arg(long, value_name = "N")]
    max_depth: Option<u32>,

    /// Maximum number of pages to visit (recursive mode)
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Only follow links on the seed's host (recursive mode)
    #[arg(long, overrides_with = "no_same_domain")]
    same_domain: bool,

    /// Follow links to any host (recursive mode)
    #[arg(long, overrides_with = "same_domain")]
    no_same_domain: bool,

    /// Ignore robots.txt (recursive mode)
    #[arg(long)]
    no_respect_robots: bool,

    /// Minimum seconds between requests to one origin (recursive mode)
    #[arg(long, value_name = "SECS")]
    rate_limit: Option<f64>,

    /// Path to TOML configuration file
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Loads the config file (if any), applies flag overrides, then validates once
    fn resolve_config(&self) -> anyhow::Result<Config> {
        let mut config = match &self.config {
            Some(path) => {
                tracing::info!("Loading configuration from: {}", path.display());
                let (config, hash) = load_config_with_hash(path).with_context(|| {
                    format!("Failed to load configuration from {}", path.display())
                })?;
                tracing::info!("Configuration loaded successfully (hash: {})", hash);
                config
            }
            None => Config::default(),
        };

        self.apply_overrides(&mut config);
        validate(&config).context("Invalid configuration")?;
        Ok(config)
    }

    /// Applies explicit flags on top of the file (or default) configuration
    fn apply_overrides(&self, config: &mut Config) {
        let crawler = &mut config.crawler;

        if let Some(format) = self.format {
            config.output.format = format;
        }
        if let Some(timeout) = self.timeout {
            crawler.timeout = timeout;
        }
        if self.no_download_images {
            crawler.download_images = false;
        }
        if let Some(max_depth) = self.max_depth {
            crawler.max_depth = max_depth;
        }
        if let Some(max_pages) = self.max_pages {
            crawler.max_pages = max_pages;
        }
        if self.same_domain {
            crawler.same_domain = true;
        }
        if self.no_same_domain {
            crawler.same_domain = false;
        }
        if self.no_respect_robots {
            crawler.respect_robots = false;
        }
        if let Some(rate_limit) = self.rate_limit {
            crawler.rate_limit = rate_limit;
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = cli.resolve_config()?;
    let seed = validate_seed_url(&cli.url)?;

    if cli.recursive {
        handle_recursive(config, seed, cli.output.as_deref()).await
    } else {
        handle_single(config, seed, cli.output.as_deref()).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// Logs go to stderr so stdout carries only the result path.
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("web_scraper=info,warn"),
            1 => EnvFilter::new("web_scraper=debug,info"),
            2 => EnvFilter::new("web_scraper=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles single-page mode: one fetch, one output file
async fn handle_single(config: Config, seed: Url, output: Option<&Path>) -> anyhow::Result<()> {
    let output_path = match output {
        Some(path) => absolute(path)?,
        None => absolute(Path::new(&format!(
            "{}.{}",
            output_base_name(&seed),
            config.output.format.extension()
        )))?,
    };

    if let Some(parent) = output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Cannot create output directory {}", parent.display()))?;
    }

    let saved = scrape_single_page(&config, &seed, &output_path)
        .await
        .with_context(|| format!("Failed to scrape {}", seed))?;

    tracing::info!("✓ Saved to {}", saved.display());
    println!("{}", saved.display());
    Ok(())
}

/// Handles recursive mode: breadth-first crawl into an output directory
///
/// Page failures are reported in the summary; the exit status stays zero.
async fn handle_recursive(config: Config, seed: Url, output: Option<&Path>) -> anyhow::Result<()> {
    let output_dir = match output {
        Some(path) => absolute(path)?,
        None => absolute(Path::new(&format!("{}-recursive", output_base_name(&seed))))?,
    };

    std::fs::create_dir_all(&output_dir)
        .with_context(|| format!("Cannot create output directory {}", output_dir.display()))?;

    let stats = crawl(config, seed, output_dir.clone())
        .await
        .context("Failed to start crawl")?;

    print_statistics(&stats, &output_dir);
    println!("{}", output_dir.display());
    Ok(())
}

/// Resolves a path against the current working directory
fn absolute(path: &Path) -> anyhow::Result<PathBuf> {
    if path.is_absolute() {
        return Ok(path.to_path_buf());
    }
    let cwd = std::env::current_dir().context("Cannot determine current directory")?;
    Ok(cwd.join(path))
}
