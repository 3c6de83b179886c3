//! Single-page mode: fetch one URL and save it to a chosen file

use crate::config::Config;
use crate::crawler::parser::PageRecord;
use crate::crawler::{build_http_client, fetch_url};
use crate::output::{write_page, AssetLocalizer, IMAGES_DIR};
use crate::render::{render_page, AssetMap};
use crate::ScrapeError;
use chrono::Local;
use std::path::{Path, PathBuf};
use url::Url;

/// Fetches one page and writes it to `output_path`
///
/// Images go to an `images/` directory next to the output file. There is no
/// robots.txt check and no rate limiting in this mode. A failed fetch is an
/// error; failed image downloads are only logged.
pub async fn scrape_single_page(
    config: &Config,
    url: &Url,
    output_path: &Path,
) -> Result<PathBuf, ScrapeError> {
    let client = build_http_client(&config.crawler)?;

    tracing::info!("Fetching {} ...", url);
    let page = fetch_url(&client, url.as_str())
        .await
        .into_result(url.as_str())?;
    let record = PageRecord::from_body(url.clone(), page.final_url, page.body);

    let assets = if config.crawler.download_images {
        let images_dir = output_path
            .parent()
            .unwrap_or_else(|| Path::new(""))
            .join(IMAGES_DIR);
        tracing::info!("Downloading images to {} ...", images_dir.display());

        let localizer = AssetLocalizer::new(
            client.clone(),
            images_dir,
            config.crawler.asset_request_timeout(),
        );
        let assets = localizer.localize_all(&record.assets, output_path).await;
        tracing::info!("Downloaded {} of {} images", assets.len(), record.assets.len());
        assets
    } else {
        AssetMap::new()
    };

    let rendered = render_page(config.output.format, &record, &assets, Local::now())?;

    tracing::info!("Saving to {} ...", output_path.display());
    write_page(output_path, &rendered).await?;

    Ok(output_path.to_path_buf())
}
