use serde::Deserialize;

/// Main configuration structure for Pichound
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    /// Seed URLs the crawl starts from
    #[serde(default)]
    pub seeds: Vec<String>,
    #[serde(default)]
    pub filters: FilterConfig,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Maximum link hops from a seed URL (0 = inspect seeds only)
    #[serde(rename = "max-depth")]
    pub max_depth: u32,

    /// Size of the worker pool for page fetches and image downloads
    #[serde(rename = "max-concurrency")]
    pub max_concurrency: usize,

    /// Per-request timeout in seconds
    #[serde(rename = "request-timeout", default = "default_request_timeout")]
    pub request_timeout: u64,

    /// Images smaller than this many bytes are skipped, not saved
    #[serde(rename = "min-image-bytes", default)]
    pub min_image_bytes: u64,
}

fn default_request_timeout() -> u64 {
    30
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,

    /// URL with information about the crawler
    #[serde(rename = "contact-url")]
    pub contact_url: String,

    /// Email address for crawler-related contact
    #[serde(rename = "contact-email")]
    pub contact_email: String,
}

impl UserAgentConfig {
    /// Formats the user agent string sent with every request
    ///
    /// Format: `CrawlerName/Version (+ContactURL; ContactEmail)`
    pub fn header_value(&self) -> String {
        format!(
            "{}/{} (+{}; {})",
            self.crawler_name, self.crawler_version, self.contact_url, self.contact_email
        )
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory the downloaded images are written into
    #[serde(rename = "image-dir")]
    pub image_dir: String,

    /// Path to the plain-text run report
    #[serde(rename = "report-path")]
    pub report_path: String,
}

/// Link inclusion/exclusion patterns
///
/// Patterns are plain substrings matched against the candidate link. An
/// empty include list means every link passes the include stage.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FilterConfig {
    #[serde(default)]
    pub include: Vec<String>,

    #[serde(default)]
    pub exclude: Vec<String>,
}
