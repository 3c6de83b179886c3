use url::Url;

/// Returns the `host[:port]` authority used for same-domain comparisons
///
/// The port is included only when it differs from the scheme's default.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use web_scraper::url::extract_host;
///
/// let url = Url::parse("https://EXAMPLE.com/path").unwrap();
/// assert_eq!(extract_host(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://127.0.0.1:8080/").unwrap();
/// assert_eq!(extract_host(&url), Some("127.0.0.1:8080".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    let host = url.host_str()?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}

/// Returns the origin key (`scheme://host[:port]`) used for politeness state
///
/// Returns None for URLs with an opaque origin (no host, or non-hierarchical schemes).
pub fn origin_key(url: &Url) -> Option<String> {
    let origin = url.origin();
    if origin.is_tuple() {
        Some(origin.ascii_serialization())
    } else {
        None
    }
}
