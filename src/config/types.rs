use serde::Deserialize;
use std::time::Duration;

/// User agent sent with every request: a current desktop browser identity
pub const BROWSER_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Main configuration structure for Web-Scraper
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct CrawlerConfig {
    /// Maximum link depth followed from the seed URL
    pub max_depth: u32,

    /// Maximum number of pages visited in one run
    pub max_pages: usize,

    /// Only follow links on the seed URL's host
    pub same_domain: bool,

    /// Consult robots.txt before fetching a page
    pub respect_robots: bool,

    /// Minimum time between requests to the same origin (seconds)
    pub rate_limit: f64,

    /// Page request timeout (seconds)
    pub timeout: u64,

    /// Image download timeout (seconds)
    pub asset_timeout: u64,

    /// Download images referenced by pages into `images/`
    pub download_images: bool,

    /// User-Agent header value
    pub user_agent: String,
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_depth: 2,
            max_pages: 50,
            same_domain: true,
            respect_robots: true,
            rate_limit: 0.5,
            timeout: 30,
            asset_timeout: 10,
            download_images: true,
            user_agent: BROWSER_USER_AGENT.to_string(),
        }
    }
}

impl CrawlerConfig {
    /// Minimum spacing between two requests to one origin
    pub fn rate_limit_interval(&self) -> Duration {
        Duration::from_secs_f64(self.rate_limit.max(0.0))
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.timeout)
    }

    pub fn asset_request_timeout(&self) -> Duration {
        Duration::from_secs(self.asset_timeout)
    }

    /// Product token used to select robots.txt groups (`Mozilla` for the default agent)
    pub fn robots_agent(&self) -> &str {
        self.user_agent
            .split(['/', ' '])
            .next()
            .filter(|token| !token.is_empty())
            .unwrap_or("*")
    }
}

/// Output configuration
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct OutputConfig {
    /// Document representation written for each page
    pub format: OutputFormat,
}

/// Document representation written for each page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Deserialize, clap::ValueEnum)]
pub enum OutputFormat {
    /// Raw markup with localized image sources
    #[default]
    #[serde(rename = "html")]
    #[value(name = "html")]
    Html,

    /// Linearized text document
    #[serde(rename = "md", alias = "markdown")]
    #[value(name = "md", alias = "markdown")]
    Markdown,
}

impl OutputFormat {
    /// File extension (without dot) used for saved pages
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Html => "html",
            Self::Markdown => "md",
        }
    }
}
