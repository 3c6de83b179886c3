use crate::config::types::{Config, CrawlerConfig};
use crate::ConfigError;
use url::Url;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)
}

/// Validates crawler configuration
fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if !config.rate_limit.is_finite() || config.rate_limit < 0.0 {
        return Err(ConfigError::Validation(format!(
            "rate_limit must be a non-negative number of seconds, got {}",
            config.rate_limit
        )));
    }

    if config.timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "timeout must be >= 1 second, got {}",
            config.timeout
        )));
    }

    if config.asset_timeout < 1 {
        return Err(ConfigError::Validation(format!(
            "asset_timeout must be >= 1 second, got {}",
            config.asset_timeout
        )));
    }

    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    Ok(())
}

/// Validates the seed URL given on the command line
///
/// The seed must be an absolute http(s) URL with a host.
pub fn validate_seed_url(seed: &str) -> Result<Url, ConfigError> {
    let url = Url::parse(seed)
        .map_err(|e| ConfigError::InvalidUrl(format!("'{}': {}", seed, e)))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(ConfigError::InvalidUrl(format!(
            "'{}' must use the http or https scheme",
            seed
        )));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(ConfigError::InvalidUrl(format!("'{}' has no host", seed)));
    }

    Ok(url)
}
