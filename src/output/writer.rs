//! Output file layout
//!
//! Maps page URLs onto files under the output directory and writes them.

use crate::config::OutputFormat;
use std::path::{Component, Path, PathBuf};
use url::Url;

/// Name of the shared image directory under the output directory
pub const IMAGES_DIR: &str = "images";

/// File stem used for URLs with an empty path
const INDEX_STEM: &str = "index";

/// Computes where a page is saved in recursive mode
///
/// Path segments become directories, the last segment becomes the file stem
/// and an empty path becomes `index`. The query string is ignored. Every
/// segment is sanitized, so `..` or reserved characters cannot escape
/// `output_dir`.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use url::Url;
/// use web_scraper::config::OutputFormat;
/// use web_scraper::output::page_output_path;
///
/// let url = Url::parse("https://example.com/docs/intro").unwrap();
/// let path = page_output_path(Path::new("out"), &url, OutputFormat::Markdown);
/// assert_eq!(path, Path::new("out/docs/intro.md"));
/// ```
pub fn page_output_path(output_dir: &Path, url: &Url, format: OutputFormat) -> PathBuf {
    let segments: Vec<String> = url
        .path()
        .split('/')
        .filter(|segment| !segment.is_empty())
        .map(sanitize_segment)
        .collect();

    let (stem, dirs) = match segments.split_last() {
        Some((last, dirs)) => (last.clone(), dirs),
        None => (INDEX_STEM.to_string(), &[][..]),
    };

    let mut path = output_dir.to_path_buf();
    for dir in dirs {
        path.push(dir);
    }
    path.push(format!("{}.{}", stem, format.extension()));
    path
}

/// Makes one URL path segment safe to use as a file or directory name
fn sanitize_segment(segment: &str) -> String {
    let sanitized = sanitize_filename::sanitize(segment);
    match sanitized.as_str() {
        "" | "." | ".." => "_".to_string(),
        _ => sanitized,
    }
}

/// Expresses `target` relative to the directory holding `page_file`
///
/// The result always uses `/` separators since it is written into documents.
/// Falls back to the absolute target when no relative path exists.
pub fn relative_asset_path(page_file: &Path, target: &Path) -> String {
    let base = page_file.parent().unwrap_or_else(|| Path::new(""));

    match pathdiff::diff_paths(target, base) {
        Some(relative) => relative
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                Component::ParentDir => Some("..".to_string()),
                _ => None,
            })
            .collect::<Vec<_>>()
            .join("/"),
        None => target.to_string_lossy().into_owned(),
    }
}

/// Writes a rendered page, creating parent directories as needed
pub async fn write_page(path: &Path, contents: &str) -> std::io::Result<()> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, contents).await
}
