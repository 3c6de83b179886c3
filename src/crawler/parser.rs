//! HTML parser for extracting links, images and metadata
//!
//! This module turns a fetched body into a [`PageRecord`]:
//! - Page title
//! - Links to follow (from `<a>` and `<area>` tags)
//! - Image references to localize (from `<img>` tags)
//!
//! The parsed tree itself is not kept in the record. Renderers re-parse the
//! body, which keeps crawl futures free of the non-thread-safe DOM.

use crate::url::{is_http, normalize_url, resolve};
use scraper::node::Element;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Everything the crawl needs from one fetched page
#[derive(Debug, Clone)]
pub struct PageRecord {
    /// URL the page was requested under
    pub url: Url,

    /// URL after redirects, used as the base for relative references
    pub base_url: Url,

    /// Page body, already decoded to text
    pub body: String,

    /// The page title (from <title> tag)
    pub title: Option<String>,

    /// Normalized absolute links, deduplicated, in document order
    pub links: Vec<String>,

    /// Absolute image URLs, deduplicated, in document order
    pub assets: Vec<Url>,
}

impl PageRecord {
    /// Parses a fetched body, extracting title, links and images
    pub fn from_body(url: Url, base_url: Url, body: String) -> Self {
        let document = parse_document(&body);

        let title = extract_title(&document);
        let links = extract_links(&document, &base_url);
        let assets = extract_assets(&document, &base_url);

        Self {
            url,
            base_url,
            body,
            title,
            links,
            assets,
        }
    }
}

/// Parses a page body into a document tree, tolerating malformed markup
pub fn parse_document(body: &str) -> Html {
    Html::parse_document(body)
}

/// Extracts the page title from the HTML document
pub fn extract_title(document: &Html) -> Option<String> {
    let title_selector = Selector::parse("title").ok()?;

    document
        .select(&title_selector)
        .next()
        .map(|element| element.text().collect::<String>().trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Extracts every followable link from the document
///
/// # Link Extraction Rules
///
/// **Include:**
/// - `<a href="...">` and `<area href="...">` anywhere in the document
///
/// **Exclude:**
/// - `<a href="..." download>`
/// - `javascript:`, `mailto:`, `tel:` links
/// - Data URIs
/// - Fragment-only links
///
/// Returned links are absolute and normalized. Crawl admission (scope,
/// depth, extensions) is decided later by the frontier.
pub fn extract_links(document: &Html, base_url: &Url) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href], area[href]") {
        for element in document.select(&selector) {
            if element.value().attr("download").is_some() {
                continue;
            }

            let resolved = element
                .value()
                .attr("href")
                .and_then(|href| resolve_link(href, base_url));

            if let Some(link) = resolved {
                if seen.insert(link.clone()) {
                    links.push(link);
                }
            }
        }
    }

    links
}

/// Resolves a link href to a normalized absolute URL
///
/// Returns None if the link should be excluded:
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - Invalid URLs
/// - Non-HTTP(S) URLs after resolution
fn resolve_link(href: &str, base_url: &Url) -> Option<String> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lower = href.to_ascii_lowercase();
    if lower.starts_with("javascript:")
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("data:")
    {
        return None;
    }

    let absolute = resolve(base_url, href).ok()?;
    if !is_http(&absolute) {
        return None;
    }

    Some(normalize_url(absolute.as_str()))
}

/// Returns the source attribute an image actually displays
///
/// Lazy-loading pages put the real image in `data-src` and a placeholder in
/// `src`, so a non-empty `data-src` wins.
pub fn image_source(element: &Element) -> Option<&str> {
    ["data-src", "src"]
        .iter()
        .filter_map(|name| element.attr(name))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

/// Extracts absolute http(s) image URLs in document order
///
/// Inline `data:` images and unresolvable sources are left out; they are
/// never downloaded.
pub fn extract_assets(document: &Html, base_url: &Url) -> Vec<Url> {
    let mut seen = HashSet::new();
    let mut assets = Vec::new();

    let Ok(selector) = Selector::parse("img") else {
        return assets;
    };

    for element in document.select(&selector) {
        let Some(source) = image_source(element.value()) else {
            continue;
        };

        match resolve(base_url, source) {
            Ok(absolute) if is_http(&absolute) => {
                if seen.insert(absolute.as_str().to_string()) {
                    assets.push(absolute);
                }
            }
            _ => continue,
        }
    }

    assets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn links(html: &str) -> Vec<String> {
        extract_links(&Html::parse_document(html), &base_url())
    }

    fn assets(html: &str) -> Vec<String> {
        extract_assets(&Html::parse_document(html), &base_url())
            .into_iter()
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_extract_title() {
        let html = r#"<html><head><title>  Test Page  </title></head><body></body></html>"#;
        assert_eq!(
            extract_title(&Html::parse_document(html)),
            Some("Test Page".to_string())
        );
    }

    #[test]
    fn test_no_title() {
        let html = r#"<html><head></head><body></body></html>"#;
        assert_eq!(extract_title(&Html::parse_document(html)), None);
    }

    #[test]
    fn test_extract_relative_links_are_normalized() {
        let found = links(r##"<a href="/other/">A</a><a href="next#top">B</a>"##);
        assert_eq!(
            found,
            vec![
                "https://example.com/other".to_string(),
                "https://example.com/next".to_string(),
            ]
        );
    }

    #[test]
    fn test_duplicate_links_collapse() {
        let found = links(r##"<a href="/x">1</a><a href="/x/">2</a><a href="/x#frag">3</a>"##);
        assert_eq!(found, vec!["https://example.com/x".to_string()]);
    }

    #[test]
    fn test_area_links_are_followed() {
        let found = links(r#"<map><area href="/region" /></map>"#);
        assert_eq!(found, vec!["https://example.com/region".to_string()]);
    }

    #[test]
    fn test_skip_special_schemes() {
        let found = links(
            r##"
            <a href="javascript:void(0)">js</a>
            <a href="mailto:test@example.com">mail</a>
            <a href="tel:+1234567890">call</a>
            <a href="data:text/html,<h1>x</h1>">data</a>
            <a href="#section">jump</a>
            <a href="ftp://example.com/file">ftp</a>
            <a href="/valid">ok</a>
            "##,
        );
        assert_eq!(found, vec!["https://example.com/valid".to_string()]);
    }

    #[test]
    fn test_skip_download_link() {
        assert!(links(r#"<a href="/file.pdf" download>Download</a>"#).is_empty());
    }

    #[test]
    fn test_image_source_prefers_data_src() {
        let found = assets(r#"<img src="placeholder.gif" data-src="/real.png">"#);
        assert_eq!(found, vec!["https://example.com/real.png".to_string()]);
    }

    #[test]
    fn test_image_source_falls_back_to_src() {
        let found = assets(r#"<img data-src="" src="photo.jpg">"#);
        assert_eq!(found, vec!["https://example.com/photo.jpg".to_string()]);
    }

    #[test]
    fn test_assets_skip_inline_and_missing_sources() {
        let found = assets(
            r#"<img alt="none"><img src="data:image/png;base64,AAAA"><img src="//cdn.example.org/a.png">"#,
        );
        assert_eq!(found, vec!["https://cdn.example.org/a.png".to_string()]);
    }

    #[test]
    fn test_page_record_uses_base_url_for_resolution() {
        let record = PageRecord::from_body(
            Url::parse("https://example.com/old").unwrap(),
            Url::parse("https://example.com/new/dir/").unwrap(),
            r#"<title>T</title><a href="child">c</a><img src="i.png">"#.to_string(),
        );
        assert_eq!(record.title.as_deref(), Some("T"));
        assert_eq!(record.links, vec!["https://example.com/new/dir/child".to_string()]);
        assert_eq!(record.assets[0].as_str(), "https://example.com/new/dir/i.png");
    }

    #[test]
    fn test_parse_document_tolerates_malformed_markup() {
        let document = parse_document("<title>café</title><p>unclosed <b>bold");
        assert_eq!(extract_title(&document), Some("café".to_string()));
    }
}
