use crate::config::FilterConfig;
use url::Url;

/// Substring-based link filter
///
/// A link passes when it contains at least one include pattern (or the
/// include list is empty) and contains no exclude pattern. Exclusion wins
/// over inclusion.
#[derive(Debug, Clone, Default)]
pub struct LinkFilter {
    include: Vec<String>,
    exclude: Vec<String>,
}

impl LinkFilter {
    /// Builds a filter from configuration, dropping empty patterns
    pub fn from_config(config: &FilterConfig) -> Self {
        Self {
            include: config
                .include
                .iter()
                .filter(|p| !p.trim().is_empty())
                .map(|p| p.trim().to_string())
                .collect(),
            exclude: config
                .exclude
                .iter()
                .filter(|p| !p.trim().is_empty())
                .map(|p| p.trim().to_string())
                .collect(),
        }
    }

    /// Returns true if the link should be followed
    pub fn allows(&self, url: &Url) -> bool {
        let link = url.as_str();

        if self.exclude.iter().any(|p| link.contains(p.as_str())) {
            return false;
        }

        if self.include.is_empty() {
            return true;
        }

        self.include.iter().any(|p| link.contains(p.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    fn filter(include: &[&str], exclude: &[&str]) -> LinkFilter {
        LinkFilter::from_config(&FilterConfig {
            include: include.iter().map(|s| s.to_string()).collect(),
            exclude: exclude.iter().map(|s| s.to_string()).collect(),
        })
    }

    #[test]
    fn test_empty_filter_allows_everything() {
        let f = filter(&[], &[]);
        assert!(f.allows(&url("https://example.com/anything")));
    }

    #[test]
    fn test_exclude_pattern_blocks() {
        let f = filter(&[], &["/admin"]);
        assert!(!f.allows(&url("https://example.com/admin/users")));
        assert!(f.allows(&url("https://example.com/blog")));
    }

    #[test]
    fn test_include_pattern_restricts() {
        let f = filter(&["/blog"], &[]);
        assert!(f.allows(&url("https://example.com/blog/post-1")));
        assert!(!f.allows(&url("https://example.com/shop")));
    }

    #[test]
    fn test_exclude_wins_over_include() {
        let f = filter(&["/blog"], &["draft"]);
        assert!(f.allows(&url("https://example.com/blog/post")));
        assert!(!f.allows(&url("https://example.com/blog/draft-post")));
    }

    #[test]
    fn test_blank_patterns_ignored() {
        let f = filter(&["", "  "], &[""]);
        assert!(f.allows(&url("https://example.com/anything")));
    }
}
