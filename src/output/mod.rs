//! Output module for saving scraped pages
//!
//! This module handles:
//! - Mapping page URLs onto files under the output directory
//! - Downloading and naming localized images
//! - Recording run statistics

pub mod assets;
pub mod stats;
pub mod writer;

pub use assets::{asset_file_name, AssetError, AssetLocalizer};
pub use stats::{print_statistics, PageOutcome, RunStats};
pub use writer::{page_output_path, relative_asset_path, write_page, IMAGES_DIR};
