//! Bounded-concurrency image downloading
//!
//! Takes the ImageRefs a crawl produced and fetches them through a worker
//! pool of `max_concurrency` in-flight requests. Each image failure is
//! recorded per item; nothing aborts the batch.

mod naming;

pub use naming::{folder_slug, image_filename};

use crate::{PichoundError, Result};
use futures::stream::{self, StreamExt};
use reqwest::Client;
use std::path::{Path, PathBuf};
use url::Url;

/// One image discovered during a crawl, with its destination
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ImageRef {
    /// Absolute URL of the image resource
    pub image_url: Url,

    /// Directory the image will be written into (derived from the
    /// originating page path)
    pub destination_folder: PathBuf,

    /// Filename within the destination folder
    pub destination_filename: String,
}

impl ImageRef {
    /// Builds an ImageRef for an image found on `page_url`, rooted at
    /// `output_dir`
    pub fn new(image_url: Url, page_url: &Url, output_dir: &Path) -> Self {
        let destination_folder = output_dir.join(folder_slug(page_url));
        let destination_filename = image_filename(&image_url);
        Self {
            image_url,
            destination_folder,
            destination_filename,
        }
    }

    /// Full destination path
    pub fn destination_path(&self) -> PathBuf {
        self.destination_folder.join(&self.destination_filename)
    }
}

/// A single failed image download with its reason
#[derive(Debug, Clone)]
pub struct DownloadFailure {
    /// The image URL that failed
    pub image_url: String,

    /// Short description of what went wrong
    pub reason: String,
}

/// Aggregate outcome of one download batch
#[derive(Debug, Clone, Default)]
pub struct DownloadReport {
    /// Images fetched and written successfully
    pub succeeded: usize,

    /// Images that failed to fetch or write
    pub failed: usize,

    /// Images skipped for being smaller than the configured threshold
    pub skipped: usize,

    /// Total bytes written to disk
    pub bytes_written: u64,

    /// Per-item failure details
    pub failures: Vec<DownloadFailure>,
}

/// Outcome of one image download, folded into the report
enum ItemOutcome {
    Saved(u64),
    Skipped,
    Failed(DownloadFailure),
}

/// Downloads every image through a bounded worker pool
///
/// # Arguments
///
/// * `client` - Shared HTTP client
/// * `images` - The ImageRefs collected by a crawl
/// * `max_concurrency` - Worker pool size; must be >= 1
/// * `min_bytes` - Bodies smaller than this are skipped, not written
///
/// # Returns
///
/// * `Ok(DownloadReport)` - Always, once every item has been attempted;
///   per-item failures are inside the report
/// * `Err(PichoundError::Validation)` - Only for `max_concurrency == 0`,
///   before any network activity
pub async fn download_all(
    client: &Client,
    images: &[ImageRef],
    max_concurrency: usize,
    min_bytes: u64,
) -> Result<DownloadReport> {
    if max_concurrency == 0 {
        return Err(PichoundError::Validation(
            "max_concurrency must be >= 1".to_string(),
        ));
    }

    let outcomes: Vec<ItemOutcome> = stream::iter(images)
        .map(|image| download_one(client, image, min_bytes))
        .buffer_unordered(max_concurrency)
        .collect()
        .await;

    let mut report = DownloadReport::default();
    for outcome in outcomes {
        match outcome {
            ItemOutcome::Saved(bytes) => {
                report.succeeded += 1;
                report.bytes_written += bytes;
            }
            ItemOutcome::Skipped => report.skipped += 1,
            ItemOutcome::Failed(failure) => {
                report.failed += 1;
                report.failures.push(failure);
            }
        }
    }

    tracing::info!(
        "Download batch finished: {} saved, {} failed, {} skipped, {} bytes",
        report.succeeded,
        report.failed,
        report.skipped,
        report.bytes_written
    );

    Ok(report)
}

/// Fetches one image and writes it to its destination
///
/// Every failure path returns `ItemOutcome::Failed`; this function never
/// errors out of the batch.
async fn download_one(client: &Client, image: &ImageRef, min_bytes: u64) -> ItemOutcome {
    let url = &image.image_url;

    let response = match client.get(url.clone()).send().await {
        Ok(r) => r,
        Err(e) => {
            tracing::warn!("Failed to fetch image {}: {}", url, e);
            return ItemOutcome::Failed(DownloadFailure {
                image_url: url.to_string(),
                reason: if e.is_timeout() {
                    "Request timeout".to_string()
                } else {
                    e.to_string()
                },
            });
        }
    };

    let status = response.status();
    if !status.is_success() {
        tracing::warn!("Image {} returned HTTP {}", url, status.as_u16());
        return ItemOutcome::Failed(DownloadFailure {
            image_url: url.to_string(),
            reason: format!("HTTP {}", status.as_u16()),
        });
    }

    let bytes = match response.bytes().await {
        Ok(b) => b,
        Err(e) => {
            return ItemOutcome::Failed(DownloadFailure {
                image_url: url.to_string(),
                reason: format!("Body read failed: {}", e),
            });
        }
    };

    if (bytes.len() as u64) < min_bytes {
        tracing::debug!(
            "Skipping {} ({} bytes < {} byte minimum)",
            url,
            bytes.len(),
            min_bytes
        );
        return ItemOutcome::Skipped;
    }

    if let Err(e) = tokio::fs::create_dir_all(&image.destination_folder).await {
        return ItemOutcome::Failed(DownloadFailure {
            image_url: url.to_string(),
            reason: format!("Create folder failed: {}", e),
        });
    }

    let path = image.destination_path();
    match tokio::fs::write(&path, &bytes).await {
        Ok(()) => {
            tracing::debug!("Saved {} -> {}", url, path.display());
            ItemOutcome::Saved(bytes.len() as u64)
        }
        Err(e) => {
            tracing::warn!("Failed to write {}: {}", path.display(), e);
            ItemOutcome::Failed(DownloadFailure {
                image_url: url.to_string(),
                reason: format!("Write failed: {}", e),
            })
        }
    }
}
