//! Crawler module for page fetching and traversal
//!
//! This module contains the core crawling logic:
//! - HTTP fetching and outcome classification
//! - Link and image extraction behind a replaceable trait
//! - The shared frontier (task queue + visited set)
//! - The worker-pool crawl coordinator

mod coordinator;
mod extract;
mod fetcher;
mod frontier;

pub use coordinator::{CrawlResult, Crawler, PageFailure, StopHandle};
pub use extract::{Extractor, HtmlExtractor, PageContent};
pub use fetcher::{build_http_client, fetch_page, FetchOutcome};
pub use frontier::{Claim, CrawlTask, Frontier};

use crate::config::Config;
use crate::Result;

/// Runs a complete crawl with a fresh crawler instance
///
/// Convenience entry point for callers that do not need a stop handle or
/// a custom extractor.
///
/// # Arguments
///
/// * `config` - The validated crawler configuration
///
/// # Returns
///
/// * `Ok(CrawlResult)` - Best-effort result plus the failure list
/// * `Err(PichoundError)` - Invalid input, detected before any network
///   activity
pub async fn crawl(config: Config) -> Result<CrawlResult> {
    let crawler = Crawler::new(config)?;
    crawler.crawl().await
}
