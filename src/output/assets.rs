//! Image localization
//!
//! Downloads images referenced by saved pages into a shared directory so the
//! saved documents render offline. Files are named by a hash of the absolute
//! image URL, which makes an asset shared by many pages download once.

use crate::output::writer::relative_asset_path;
use crate::render::AssetMap;
use reqwest::Client;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use tokio::io::AsyncWriteExt;
use url::Url;

/// Extension used when the URL path has no usable one
pub const FALLBACK_EXTENSION: &str = ".jpg";

/// Longest accepted extension, including the dot
const MAX_EXTENSION_LEN: usize = 5;

/// Number of hex characters of the URL hash kept in file names
const HASH_PREFIX_LEN: usize = 12;

/// Errors that can occur while localizing one asset
#[derive(Debug, Error)]
pub enum AssetError {
    #[error("Unsupported asset URL scheme: {0}")]
    UnsupportedScheme(String),

    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("HTTP status {0}")]
    Status(u16),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Derives the local file name for an asset URL
///
/// The name is the first 12 hex characters of the SHA-256 of the absolute URL
/// followed by the extension of the URL path's last segment.
pub fn asset_file_name(url: &Url) -> String {
    let digest = Sha256::digest(url.as_str().as_bytes());
    let hash = hex::encode(digest);
    format!("{}{}", &hash[..HASH_PREFIX_LEN], asset_extension(url))
}

/// Extension of the URL path's last segment, or [`FALLBACK_EXTENSION`]
fn asset_extension(url: &Url) -> &str {
    let name = url.path().rsplit('/').next().unwrap_or("");

    let extension = match name.rfind('.') {
        Some(dot) if dot > 0 => &name[dot..],
        _ => return FALLBACK_EXTENSION,
    };

    let plausible = extension.len() > 1
        && extension.len() <= MAX_EXTENSION_LEN
        && extension[1..].chars().all(|c| c.is_ascii_alphanumeric());

    if plausible {
        extension
    } else {
        FALLBACK_EXTENSION
    }
}

/// Downloads images into one directory, skipping files that already exist
#[derive(Debug, Clone)]
pub struct AssetLocalizer {
    client: Client,
    assets_dir: PathBuf,
    timeout: Duration,
}

impl AssetLocalizer {
    /// Creates a localizer storing files in `assets_dir`
    ///
    /// The directory is created on the first download.
    pub fn new(client: Client, assets_dir: impl Into<PathBuf>, timeout: Duration) -> Self {
        Self {
            client,
            assets_dir: assets_dir.into(),
            timeout,
        }
    }

    /// Makes a local copy of an asset and returns its path
    ///
    /// Failures are logged and reported as None; they never fail the page.
    pub async fn localize(&self, asset_url: &Url) -> Option<PathBuf> {
        match self.try_localize(asset_url).await {
            Ok(path) => Some(path),
            Err(e) => {
                tracing::warn!("Failed to download image {}: {}", asset_url, e);
                None
            }
        }
    }

    /// Localizes every asset of one page
    ///
    /// Returns absolute asset URL → path relative to `page_file`'s directory,
    /// for the assets that were saved.
    pub async fn localize_all(&self, assets: &[Url], page_file: &Path) -> AssetMap {
        let mut localized = AssetMap::new();
        for asset in assets {
            if let Some(saved) = self.localize(asset).await {
                localized.insert(
                    asset.as_str().to_string(),
                    relative_asset_path(page_file, &saved),
                );
            }
        }
        localized
    }

    /// Fallible variant of [`AssetLocalizer::localize`]
    pub async fn try_localize(&self, asset_url: &Url) -> Result<PathBuf, AssetError> {
        if !matches!(asset_url.scheme(), "http" | "https") {
            return Err(AssetError::UnsupportedScheme(asset_url.scheme().to_string()));
        }

        let destination = self.assets_dir.join(asset_file_name(asset_url));
        if tokio::fs::try_exists(&destination).await.unwrap_or(false) {
            tracing::trace!("Asset already present: {}", destination.display());
            return Ok(destination);
        }

        tokio::fs::create_dir_all(&self.assets_dir).await?;
        let partial = partial_path(&destination);

        if let Err(e) = self.download(asset_url, &partial).await {
            let _ = tokio::fs::remove_file(&partial).await;
            return Err(e);
        }

        tokio::fs::rename(&partial, &destination).await?;
        tracing::debug!("Saved image {} -> {}", asset_url, destination.display());
        Ok(destination)
    }

    /// Streams the response body into `path`
    async fn download(&self, url: &Url, path: &Path) -> Result<(), AssetError> {
        let mut response = self
            .client
            .get(url.as_str())
            .timeout(self.timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AssetError::Status(response.status().as_u16()));
        }

        let mut file = tokio::fs::File::create(path).await?;
        while let Some(chunk) = response.chunk().await? {
            file.write_all(&chunk).await?;
        }
        file.flush().await?;

        Ok(())
    }
}

fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(|n| n.to_os_string())
        .unwrap_or_default();
    name.push(".part");
    destination.with_file_name(name)
}
