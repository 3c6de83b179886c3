//! Page rendering
//!
//! Converts a fetched page into its saved form:
//! - Markup mode: the original markup with localized image sources
//! - Text mode: a linearized Markdown document with a metadata header

pub mod markup;
pub mod node;
pub mod text;

pub use markup::{render_markup, source_meta_tag};
pub use node::{ListKind, NodeKind};
pub use text::{markdown_header, render_markdown, tokenize, Token};

use crate::config::OutputFormat;
use crate::crawler::parser::{parse_document, PageRecord};
use crate::ScrapeError;
use chrono::{DateTime, Local};
use std::collections::HashMap;

/// Absolute image URL → path of the local copy, relative to the saved page
pub type AssetMap = HashMap<String, String>;

/// Renders a page in the requested output format
pub fn render_page(
    format: OutputFormat,
    record: &PageRecord,
    assets: &AssetMap,
    retrieved_at: DateTime<Local>,
) -> Result<String, ScrapeError> {
    match format {
        OutputFormat::Html => render_markup(&record.body, &record.url, &record.base_url, assets),
        OutputFormat::Markdown => {
            let document = parse_document(&record.body);
            Ok(render_markdown(
                &document,
                &record.url,
                &record.base_url,
                assets,
                retrieved_at,
            ))
        }
    }
}
