use crate::state::VisitedSet;
use crate::url::{extract_host, normalize_url};
use url::Url;

/// Path suffixes that never lead to a crawlable document
///
/// Archives, executables, raw images, stylesheets, scripts and structured data.
const NON_DOCUMENT_EXTENSIONS: &[&str] = &[
    ".pdf", ".zip", ".tar", ".gz", ".tgz", ".bz2", ".rar", ".7z", ".exe", ".dmg", ".msi",
    ".jpg", ".jpeg", ".png", ".gif", ".svg", ".ico", ".webp", ".bmp", ".css", ".js", ".xml",
    ".json",
];

/// Limits that bound one crawl run
#[derive(Debug, Clone)]
pub struct CrawlScope {
    /// Deepest link level that may be visited (seed is depth 0)
    pub max_depth: u32,

    /// Maximum number of visited URLs
    pub max_pages: usize,

    /// Reject URLs whose host differs from `seed_host`
    pub same_domain: bool,

    /// `host[:port]` of the seed URL
    pub seed_host: Option<String>,
}

/// Reason a candidate URL was not admitted to the crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rejection {
    /// Already fetched (or attempted) during this run
    AlreadyVisited,
    /// The page budget is used up
    BudgetExhausted,
    /// Deeper than `max_depth`
    TooDeep,
    /// Not an absolute URL
    Unparseable,
    /// Scheme other than http/https
    UnsupportedScheme,
    /// No host component
    MissingHost,
    /// Host differs from the seed while `same_domain` is on
    CrossOrigin,
    /// Path ends in a known non-document extension
    NonDocument,
}

/// Checks whether a URL should be crawled at the given depth
///
/// The URL is normalized first, so callers may pass raw links. On success
/// the parsed, normalized URL is returned. This function has no side effects.
///
/// # Rejection Order
///
/// 1. Already visited, or visited set at `max_pages`
/// 2. Depth beyond `max_depth`
/// 3. Unparseable, non-http(s) scheme, or missing host
/// 4. Cross-origin while `same_domain` is enabled
/// 5. Non-document file extension
pub fn check_crawlable(
    url: &str,
    depth: u32,
    visited: &VisitedSet,
    scope: &CrawlScope,
) -> Result<Url, Rejection> {
    let normalized = normalize_url(url);

    if visited.contains(&normalized) {
        return Err(Rejection::AlreadyVisited);
    }

    if visited.len() >= scope.max_pages {
        return Err(Rejection::BudgetExhausted);
    }

    if depth > scope.max_depth {
        return Err(Rejection::TooDeep);
    }

    let parsed = Url::parse(&normalized).map_err(|_| Rejection::Unparseable)?;

    if parsed.scheme() != "http" && parsed.scheme() != "https" {
        return Err(Rejection::UnsupportedScheme);
    }

    let host = extract_host(&parsed)
        .filter(|h| !h.is_empty())
        .ok_or(Rejection::MissingHost)?;

    if scope.same_domain && scope.seed_host.as_deref() != Some(host.as_str()) {
        return Err(Rejection::CrossOrigin);
    }

    let path = parsed.path().to_lowercase();
    if NON_DOCUMENT_EXTENSIONS
        .iter()
        .any(|extension| path.ends_with(extension))
    {
        return Err(Rejection::NonDocument);
    }

    Ok(parsed)
}

/// Returns true if the URL passes every crawl filter (see [`check_crawlable`])
pub fn is_crawlable(url: &str, depth: u32, visited: &VisitedSet, scope: &CrawlScope) -> bool {
    check_crawlable(url, depth, visited, scope).is_ok()
}
