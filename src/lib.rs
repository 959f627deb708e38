//! Pichound: a depth-bounded site image harvester
//!
//! This crate implements a breadth-limited web crawler that discovers
//! same-host links and image resources, deduplicates visited pages, and
//! dispatches image downloads to a bounded worker pool.

pub mod config;
pub mod crawler;
pub mod download;
pub mod report;
pub mod state;
pub mod url;

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for Pichound operations
#[derive(Debug, Error)]
pub enum PichoundError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Fetch error for {url}: {reason}")]
    Fetch { url: String, reason: String },

    #[error("HTML parse error for {url}: {message}")]
    Parse { url: String, message: String },

    #[error("Write error for {path}: {source}")]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("URL error: {0}")]
    UrlError(#[from] UrlError),

    #[error("URL parse error: {0}")]
    UrlParse(#[from] ::url::ParseError),

    #[error("HTTP client error: {0}")]
    Reqwest(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid input: {0}")]
    Validation(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL")]
    MissingHost,

    #[error("Malformed URL: {0}")]
    Malformed(String),
}

/// Result type alias for Pichound operations
pub type Result<T> = std::result::Result<T, PichoundError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{CrawlResult, Crawler, PageFailure};
pub use download::{download_all, DownloadFailure, DownloadReport, ImageRef};
pub use report::RunReport;
pub use state::TaskState;
pub use url::{extract_host, normalize_url, same_host};
