use crate::UrlError;
use url::Url;

/// List of tracking query parameters to remove during normalization
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
    "ref",
    "source",
];

/// Normalizes a URL for visited-set membership
///
/// Two spellings of the same page must normalize to the same URL, otherwise
/// the crawler fetches it twice.
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed or not http(s)
/// 2. Lowercase the host
/// 3. Remove trailing slash from the path (except for root `/`)
/// 4. Remove fragment (everything after `#`)
/// 5. Remove tracking query parameters
/// 6. Sort remaining query parameters alphabetically
/// 7. Remove empty query string
///
/// The scheme is kept as-is: seeds may legitimately be plain http, and
/// rewriting it would make the visited set disagree with what is fetched.
///
/// # Examples
///
/// ```
/// use pichound::url::normalize_url;
///
/// let url = normalize_url("https://EXAMPLE.COM/page/?utm_source=x").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/page");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    // Lowercase the host
    if let Some(host) = url.host_str() {
        let normalized_host = host.to_lowercase();
        if normalized_host != host {
            url.set_host(Some(&normalized_host))
                .map_err(|e| UrlError::Malformed(format!("Failed to set host: {}", e)))?;
        }
    } else {
        return Err(UrlError::MissingHost);
    }

    // Trim trailing slash, keep root
    let path = url.path();
    if path.len() > 1 && path.ends_with('/') {
        let trimmed = path[..path.len() - 1].to_string();
        url.set_path(&trimmed);
    }

    url.set_fragment(None);

    if url.query().is_some() {
        let filtered_params = filter_and_sort_query_params(&url);

        if filtered_params.is_empty() {
            url.set_query(None);
        } else {
            let query_string = filtered_params
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join("&");
            url.set_query(Some(&query_string));
        }
    }

    Ok(url)
}

/// Filters out tracking parameters and sorts remaining query parameters
fn filter_and_sort_query_params(url: &Url) -> Vec<(String, String)> {
    let mut params: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(key, _)| !is_tracking_param(key))
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

    params.sort_by(|a, b| a.0.cmp(&b.0));

    params
}

/// Checks if a query parameter is a tracking parameter
fn is_tracking_param(key: &str) -> bool {
    if TRACKING_PARAMS.contains(&key) {
        return true;
    }

    // Catches any utm parameter, not just the well-known ones
    if key.starts_with("utm_") {
        return true;
    }

    false
}
