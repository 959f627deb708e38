//! Run report generation
//!
//! Assembles the crawl and download outcomes into a plain-text report,
//! printed to the console and optionally written to a file.

use crate::crawler::CrawlResult;
use crate::download::DownloadReport;
use crate::{PichoundError, Result};
use chrono::Local;
use std::fmt::Write as _;
use std::path::Path;

/// Combined outcome of one crawl-and-download run
#[derive(Debug, Clone)]
pub struct RunReport {
    /// When the run finished
    pub finished_at: chrono::DateTime<Local>,

    /// Hash of the configuration file that produced this run
    pub config_hash: String,

    /// Crawl stage outcome
    pub crawl: CrawlResult,

    /// Download stage outcome; None when the run was crawl-only
    pub download: Option<DownloadReport>,
}

impl RunReport {
    pub fn new(config_hash: String, crawl: CrawlResult, download: Option<DownloadReport>) -> Self {
        Self {
            finished_at: Local::now(),
            config_hash,
            crawl,
            download,
        }
    }

    /// Renders the report as plain text
    pub fn render(&self) -> String {
        let mut out = String::new();

        // Writing into a String cannot fail; unwraps here are safe
        writeln!(out, "=== Pichound Run Report ===").unwrap();
        writeln!(out, "Finished: {}", self.finished_at.format("%Y-%m-%d %H:%M:%S")).unwrap();
        writeln!(out, "Config hash: {}", self.config_hash).unwrap();
        writeln!(out).unwrap();

        writeln!(out, "Crawl:").unwrap();
        writeln!(out, "  Pages visited: {}", self.crawl.pages_visited()).unwrap();
        writeln!(out, "  Pages expanded: {}", self.crawl.pages_expanded).unwrap();
        writeln!(out, "  Pages failed: {}", self.crawl.pages_failed).unwrap();
        writeln!(out, "  Images discovered: {}", self.crawl.images.len()).unwrap();

        if !self.crawl.failures.is_empty() {
            writeln!(out).unwrap();
            writeln!(out, "Page failures ({}):", self.crawl.failures.len()).unwrap();
            for failure in &self.crawl.failures {
                writeln!(out, "  - {} ({})", failure.url, failure.reason).unwrap();
            }
        }

        if let Some(download) = &self.download {
            writeln!(out).unwrap();
            writeln!(out, "Downloads:").unwrap();
            writeln!(out, "  Saved: {}", download.succeeded).unwrap();
            writeln!(out, "  Failed: {}", download.failed).unwrap();
            writeln!(out, "  Skipped (below size threshold): {}", download.skipped).unwrap();
            writeln!(out, "  Bytes written: {}", download.bytes_written).unwrap();

            if !download.failures.is_empty() {
                writeln!(out).unwrap();
                writeln!(out, "Download failures ({}):", download.failures.len()).unwrap();
                for failure in &download.failures {
                    writeln!(out, "  - {} ({})", failure.image_url, failure.reason).unwrap();
                }
            }
        }

        out
    }

    /// Prints the report to stdout
    pub fn print(&self) {
        print!("{}", self.render());
    }

    /// Writes the report to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| PichoundError::Write {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(path, self.render()).map_err(|e| PichoundError::Write {
            path: path.to_path_buf(),
            source: e,
        })?;

        tracing::info!("Report written to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::PageFailure;
    use crate::download::DownloadFailure;

    fn sample_crawl() -> CrawlResult {
        CrawlResult {
            images: vec![],
            pages_expanded: 4,
            pages_failed: 1,
            failures: vec![PageFailure {
                url: "https://example.com/broken".to_string(),
                reason: "HTTP 500".to_string(),
            }],
        }
    }

    #[test]
    fn test_render_crawl_only() {
        let report = RunReport::new("abc123".to_string(), sample_crawl(), None);
        let text = report.render();

        assert!(text.contains("Pages visited: 5"));
        assert!(text.contains("Pages expanded: 4"));
        assert!(text.contains("https://example.com/broken (HTTP 500)"));
        assert!(text.contains("abc123"));
        assert!(!text.contains("Downloads:"));
    }

    #[test]
    fn test_render_with_downloads() {
        let download = DownloadReport {
            succeeded: 4,
            failed: 1,
            skipped: 0,
            bytes_written: 2048,
            failures: vec![DownloadFailure {
                image_url: "https://example.com/x.png".to_string(),
                reason: "HTTP 500".to_string(),
            }],
        };
        let report = RunReport::new("abc123".to_string(), sample_crawl(), Some(download));
        let text = report.render();

        assert!(text.contains("Saved: 4"));
        assert!(text.contains("Failed: 1"));
        assert!(text.contains("https://example.com/x.png (HTTP 500)"));
    }

    #[test]
    fn test_save_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.txt");

        let report = RunReport::new("abc123".to_string(), sample_crawl(), None);
        report.save(&path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, report.render());
    }

    #[test]
    fn test_save_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/deeper/report.txt");

        let report = RunReport::new("abc123".to_string(), sample_crawl(), None);
        report.save(&path).unwrap();
        assert!(path.exists());
    }
}
