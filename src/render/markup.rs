//! Passthrough markup rendering
//!
//! Streams the fetched markup through `lol_html`, pointing localized images
//! at their local copies and tagging `<head>` with the page's source URL.
//! Everything else is emitted byte-for-byte.

use crate::render::AssetMap;
use crate::url::resolve;
use crate::ScrapeError;
use lol_html::html_content::ContentType;
use lol_html::{element, HtmlRewriter, Settings};
use url::Url;

/// Name of the meta tag recording where a saved page came from
pub const SOURCE_META_NAME: &str = "scraper-source";

/// Rewrites page markup for offline viewing
///
/// # Arguments
///
/// * `html` - The fetched markup
/// * `page_url` - URL recorded in the source meta tag
/// * `base_url` - Base for resolving image sources
/// * `assets` - Map of absolute image URL → path relative to the saved page
///
/// Images missing from `assets` keep their original attributes.
pub fn render_markup(
    html: &str,
    page_url: &Url,
    base_url: &Url,
    assets: &AssetMap,
) -> Result<String, ScrapeError> {
    let mut output = Vec::with_capacity(html.len() + 128);
    let meta = source_meta_tag(page_url);

    let mut rewriter = HtmlRewriter::new(
        Settings {
            element_content_handlers: vec![
                element!("img", |el| {
                    let chosen = ["data-src", "src"].into_iter().find_map(|name| {
                        el.get_attribute(name)
                            .map(|value| value.trim().to_string())
                            .filter(|value| !value.is_empty())
                            .map(|value| (name, value))
                    });

                    if let Some((name, source)) = chosen {
                        let local = resolve(base_url, &source)
                            .ok()
                            .and_then(|absolute| assets.get(absolute.as_str()));
                        if let Some(local) = local {
                            el.set_attribute("src", local)?;
                            if name == "data-src" {
                                el.set_attribute("data-src", local)?;
                            }
                        }
                    }
                    Ok(())
                }),
                element!("head", |el| {
                    el.append(&meta, ContentType::Html);
                    Ok(())
                }),
            ],
            ..Settings::default()
        },
        |c: &[u8]| output.extend_from_slice(c),
    );

    rewriter
        .write(html.as_bytes())
        .map_err(|e| rewrite_error(page_url, e))?;
    rewriter.end().map_err(|e| rewrite_error(page_url, e))?;

    String::from_utf8(output).map_err(|e| rewrite_error(page_url, e))
}

/// Builds the `<meta>` tag naming the page's source URL
pub fn source_meta_tag(page_url: &Url) -> String {
    format!(
        r#"<meta name="{}" content="{}">"#,
        SOURCE_META_NAME,
        html_escape::encode_double_quoted_attribute(page_url.as_str())
    )
}

fn rewrite_error(page_url: &Url, error: impl std::fmt::Display) -> ScrapeError {
    ScrapeError::Rewrite {
        url: page_url.to_string(),
        message: error.to_string(),
    }
}
