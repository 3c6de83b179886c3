use url::Url;

/// Normalizes a URL into the key used by the visited set
///
/// # Normalization Steps
///
/// 1. Remove the fragment (everything after #)
/// 2. If the URL parses, re-serialize it (lowercases scheme and host, drops
///    default ports, resolves dot segments)
/// 3. Remove trailing slashes
///
/// Unparseable input is still stripped of fragment and trailing slashes so the
/// function is total; such URLs are rejected later by the crawl filter.
/// Applying the function twice yields the same string as applying it once.
///
/// # Examples
///
/// ```
/// use web_scraper::url::normalize_url;
///
/// assert_eq!(normalize_url("https://example.com/docs/#intro"), "https://example.com/docs");
/// assert_eq!(normalize_url("https://example.com/"), "https://example.com");
/// ```
pub fn normalize_url(url_str: &str) -> String {
    let without_fragment = match url_str.split_once('#') {
        Some((head, _)) => head,
        None => url_str,
    };

    let serialized = match Url::parse(without_fragment) {
        Ok(mut url) => {
            url.set_fragment(None);
            url.to_string()
        }
        Err(_) => without_fragment.to_string(),
    };

    serialized.trim_end_matches('/').to_string()
}
