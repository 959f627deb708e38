use url::Url;

/// Extracts the lowercase host from a URL
///
/// # Examples
///
/// ```
/// use url::Url;
/// use pichound::url::extract_host;
///
/// let url = Url::parse("https://Sub.Example.COM/path").unwrap();
/// assert_eq!(extract_host(&url), Some("sub.example.com".to_string()));
/// ```
pub fn extract_host(url: &Url) -> Option<String> {
    url.host_str().map(|h| h.to_lowercase())
}

/// Returns true if both URLs share the same network location
///
/// The host comparison is case-insensitive; the port must match as well,
/// since `example.com:8080` and `example.com:9090` are different servers.
/// This is the cross-domain barrier: links that fail this check never
/// become crawl tasks.
pub fn same_host(a: &Url, b: &Url) -> bool {
    match (extract_host(a), extract_host(b)) {
        (Some(ha), Some(hb)) => ha == hb && a.port_or_known_default() == b.port_or_known_default(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_extract_simple_host() {
        assert_eq!(
            extract_host(&url("https://example.com/")),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_extract_host_lowercases() {
        assert_eq!(
            extract_host(&url("https://EXAMPLE.COM/")),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_extract_host_with_port() {
        assert_eq!(
            extract_host(&url("https://example.com:8080/")),
            Some("example.com".to_string())
        );
    }

    #[test]
    fn test_same_host_matches() {
        assert!(same_host(
            &url("https://example.com/a"),
            &url("https://example.com/b/c")
        ));
    }

    #[test]
    fn test_same_host_case_insensitive() {
        assert!(same_host(
            &url("https://Example.COM/a"),
            &url("https://example.com/b")
        ));
    }

    #[test]
    fn test_different_host_rejected() {
        assert!(!same_host(
            &url("https://example.com/"),
            &url("https://other.com/")
        ));
    }

    #[test]
    fn test_subdomain_is_a_different_host() {
        assert!(!same_host(
            &url("https://example.com/"),
            &url("https://blog.example.com/")
        ));
    }

    #[test]
    fn test_different_port_rejected() {
        assert!(!same_host(
            &url("http://example.com:8080/"),
            &url("http://example.com:9090/")
        ));
    }

    #[test]
    fn test_default_port_matches_explicit() {
        assert!(same_host(
            &url("http://example.com/"),
            &url("http://example.com:80/")
        ));
    }
}
