//! Robots.txt parser implementation
//!
//! This module wraps the robotstxt crate's matcher behind a small value type.

use robotstxt::DefaultMatcher;

/// Parsed robots.txt data
///
/// Holds the raw rules and evaluates them on demand. The allow-all form is
/// used whenever robots.txt could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedRobots {
    /// Raw robots.txt content (empty string means allow all)
    content: String,
    /// Whether to allow all (true = allow all, false = parse content)
    allow_all: bool,
}

impl ParsedRobots {
    /// Creates a new ParsedRobots from raw robots.txt content
    pub fn from_content(content: &str) -> Self {
        Self {
            content: content.to_string(),
            allow_all: false,
        }
    }

    /// Creates a permissive ParsedRobots that allows everything
    pub fn allow_all() -> Self {
        Self {
            content: String::new(),
            allow_all: true,
        }
    }

    /// True when this is the fallback used for unreachable or missing robots.txt
    pub fn is_allow_all(&self) -> bool {
        self.allow_all
    }

    /// Checks if a URL is allowed for the given user agent
    ///
    /// # Arguments
    ///
    /// * `url` - The absolute URL (or path) to check
    /// * `user_agent` - The product token of the requesting agent
    pub fn is_allowed(&self, url: &str, user_agent: &str) -> bool {
        if self.allow_all || self.content.trim().is_empty() {
            return true;
        }

        let mut matcher = DefaultMatcher::default();
        matcher.one_agent_allowed_by_robots(&self.content, user_agent, url)
    }
}
