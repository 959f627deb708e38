//! HTTP fetcher implementation
//!
//! Builds the shared HTTP client and classifies the outcome of page
//! fetches. All network failures are folded into `FetchOutcome` variants;
//! nothing here panics or returns an error the crawl loop has to abort on.

use crate::config::UserAgentConfig;
use reqwest::Client;
use std::time::Duration;
use url::Url;

/// Result of fetching one page
#[derive(Debug)]
pub enum FetchOutcome {
    /// Successfully fetched an HTML page
    Success {
        /// Final URL after redirects
        final_url: Url,
        /// HTTP status code
        status_code: u16,
        /// Page body content
        body: String,
    },

    /// Server answered with a non-2xx status
    HttpError {
        /// The HTTP status code
        status_code: u16,
    },

    /// The response is not an HTML document
    NotHtml {
        /// The Content-Type received
        content_type: String,
    },

    /// Network-level failure (timeout, connection refused, DNS, TLS)
    NetworkError {
        /// Error description
        error: String,
    },
}

impl FetchOutcome {
    /// Short human-readable reason for a non-success outcome
    pub fn failure_reason(&self) -> Option<String> {
        match self {
            Self::Success { .. } => None,
            Self::HttpError { status_code } => Some(format!("HTTP {}", status_code)),
            Self::NotHtml { content_type } => {
                Some(format!("Expected HTML, got {}", content_type))
            }
            Self::NetworkError { error } => Some(error.clone()),
        }
    }
}

/// Builds the HTTP client used for both page fetches and image downloads
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout_secs` - Per-request timeout in seconds
pub fn build_http_client(
    config: &UserAgentConfig,
    timeout_secs: u64,
) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(Duration::from_secs(timeout_secs))
        .connect_timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches a page and classifies the outcome
///
/// Redirects are followed by the client; the final URL is reported so
/// relative links resolve against the page that actually answered.
pub async fn fetch_page(client: &Client, url: &Url) -> FetchOutcome {
    let response = match client.get(url.clone()).send().await {
        Ok(r) => r,
        Err(e) => {
            return FetchOutcome::NetworkError {
                error: classify_request_error(&e),
            };
        }
    };

    let status = response.status();
    if !status.is_success() {
        return FetchOutcome::HttpError {
            status_code: status.as_u16(),
        };
    }

    let content_type = response
        .headers()
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();

    // Missing Content-Type is treated as HTML: small static servers often
    // omit the header and the parser degrades gracefully on non-HTML.
    if !content_type.is_empty() && !content_type.contains("text/html") {
        return FetchOutcome::NotHtml { content_type };
    }

    let final_url = response.url().clone();

    match response.text().await {
        Ok(body) => FetchOutcome::Success {
            final_url,
            status_code: status.as_u16(),
            body,
        },
        Err(e) => FetchOutcome::NetworkError {
            error: classify_request_error(&e),
        },
    }
}

/// Maps a reqwest error onto a short description
fn classify_request_error(e: &reqwest::Error) -> String {
    if e.is_timeout() {
        "Request timeout".to_string()
    } else if e.is_connect() {
        "Connection failed".to_string()
    } else {
        e.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> UserAgentConfig {
        UserAgentConfig {
            crawler_name: "TestHound".to_string(),
            crawler_version: "1.0".to_string(),
            contact_url: "https://example.com/about".to_string(),
            contact_email: "admin@example.com".to_string(),
        }
    }

    #[test]
    fn test_build_http_client() {
        let config = create_test_config();
        let client = build_http_client(&config, 30);
        assert!(client.is_ok());
    }

    #[test]
    fn test_user_agent_format() {
        let config = create_test_config();
        assert_eq!(
            config.header_value(),
            "TestHound/1.0 (+https://example.com/about; admin@example.com)"
        );
    }

    #[test]
    fn test_failure_reason() {
        let outcome = FetchOutcome::HttpError { status_code: 500 };
        assert_eq!(outcome.failure_reason(), Some("HTTP 500".to_string()));

        let outcome = FetchOutcome::NotHtml {
            content_type: "application/pdf".to_string(),
        };
        assert_eq!(
            outcome.failure_reason(),
            Some("Expected HTML, got application/pdf".to_string())
        );

        let outcome = FetchOutcome::Success {
            final_url: Url::parse("https://example.com/").unwrap(),
            status_code: 200,
            body: String::new(),
        };
        assert_eq!(outcome.failure_reason(), None);
    }

    // Network behavior is covered by the wiremock integration tests.
}
