//! Link and image extraction
//!
//! Extraction sits behind the `Extractor` trait so site-specific selector
//! logic can be swapped without touching the crawl loop. `HtmlExtractor`
//! is the default: plain `<a href>` and `<img src>` harvesting.

use scraper::{Html, Selector};
use url::Url;

/// Everything the crawler needs from one parsed page
#[derive(Debug, Clone, Default)]
pub struct PageContent {
    /// Anchor targets resolved to absolute URLs (not yet host-filtered)
    pub links: Vec<Url>,

    /// Image sources resolved to absolute URLs
    pub images: Vec<Url>,
}

/// Extraction seam between the crawl loop and the page markup
///
/// Implementations must be best-effort: malformed markup yields empty
/// link/image sets, never an error.
pub trait Extractor: Send + Sync {
    fn extract(&self, html: &str, base_url: &Url) -> PageContent;
}

/// Default extractor for ordinary HTML pages
#[derive(Debug, Default)]
pub struct HtmlExtractor;

impl Extractor for HtmlExtractor {
    /// Parses HTML and extracts links and image sources
    ///
    /// **Links**: `<a href="...">`, skipping `javascript:`, `mailto:`,
    /// `tel:`, `data:` schemes, fragment-only hrefs, and anchors with the
    /// `download` attribute.
    ///
    /// **Images**: `<img src="...">` resolved against the page URL.
    fn extract(&self, html: &str, base_url: &Url) -> PageContent {
        let document = Html::parse_document(html);

        let mut content = PageContent::default();

        // Selectors are compile-time constants; parse failures would be a
        // programming error, so fall through to the empty set instead
        if let Ok(a_selector) = Selector::parse("a[href]") {
            for element in document.select(&a_selector) {
                if element.value().attr("download").is_some() {
                    continue;
                }

                if let Some(href) = element.value().attr("href") {
                    if let Some(absolute) = resolve_link(href, base_url) {
                        content.links.push(absolute);
                    }
                }
            }
        }

        if let Ok(img_selector) = Selector::parse("img[src]") {
            for element in document.select(&img_selector) {
                if let Some(src) = element.value().attr("src") {
                    if let Some(absolute) = resolve_link(src, base_url) {
                        content.images.push(absolute);
                    }
                }
            }
        }

        content
    }
}

/// Resolves an href to an absolute URL and validates it
///
/// Returns None for special schemes (`javascript:`, `mailto:`, `tel:`,
/// `data:`), fragment-only hrefs, unparseable hrefs, and anything that
/// resolves to a non-HTTP(S) URL.
fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() {
        return None;
    }

    if href.starts_with("javascript:")
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("data:")
    {
        return None;
    }

    // Same-page anchors
    if href.starts_with('#') {
        return None;
    }

    match base_url.join(href) {
        Ok(absolute) => {
            if absolute.scheme() == "http" || absolute.scheme() == "https" {
                Some(absolute)
            } else {
                None
            }
        }
        Err(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_url() -> Url {
        Url::parse("https://example.com/page").unwrap()
    }

    fn extract(html: &str) -> PageContent {
        HtmlExtractor.extract(html, &base_url())
    }

    #[test]
    fn test_extract_absolute_link() {
        let content = extract(r#"<html><body><a href="https://other.com/page">Link</a></body></html>"#);
        assert_eq!(content.links.len(), 1);
        assert_eq!(content.links[0].as_str(), "https://other.com/page");
    }

    #[test]
    fn test_extract_relative_link() {
        let content = extract(r#"<html><body><a href="/other">Link</a></body></html>"#);
        assert_eq!(content.links.len(), 1);
        assert_eq!(content.links[0].as_str(), "https://example.com/other");
    }

    #[test]
    fn test_extract_relative_path_link() {
        let content = extract(r#"<html><body><a href="other">Link</a></body></html>"#);
        assert_eq!(content.links.len(), 1);
        assert_eq!(content.links[0].as_str(), "https://example.com/other");
    }

    #[test]
    fn test_extract_images() {
        let content = extract(
            r#"<html><body>
            <img src="/img/logo.png">
            <img src="https://cdn.example.com/banner.jpg">
            </body></html>"#,
        );
        assert_eq!(content.images.len(), 2);
        assert_eq!(
            content.images[0].as_str(),
            "https://example.com/img/logo.png"
        );
        assert_eq!(
            content.images[1].as_str(),
            "https://cdn.example.com/banner.jpg"
        );
    }

    #[test]
    fn test_img_without_src_ignored() {
        let content = extract(r#"<html><body><img alt="no source"></body></html>"#);
        assert!(content.images.is_empty());
    }

    #[test]
    fn test_skip_javascript_link() {
        let content = extract(r#"<html><body><a href="javascript:void(0)">Link</a></body></html>"#);
        assert!(content.links.is_empty());
    }

    #[test]
    fn test_skip_mailto_and_tel_links() {
        let content = extract(
            r#"<html><body>
            <a href="mailto:test@example.com">Email</a>
            <a href="tel:+1234567890">Call</a>
            </body></html>"#,
        );
        assert!(content.links.is_empty());
    }

    #[test]
    fn test_skip_data_uri() {
        let content =
            extract(r#"<html><body><a href="data:text/html,<h1>Hi</h1>">Data</a></body></html>"#);
        assert!(content.links.is_empty());
    }

    #[test]
    fn test_skip_data_uri_image() {
        let content =
            extract(r#"<html><body><img src="data:image/png;base64,iVBOR="></body></html>"#);
        assert!(content.images.is_empty());
    }

    #[test]
    fn test_skip_download_link() {
        let content = extract(r#"<html><body><a href="/file.pdf" download>Get</a></body></html>"#);
        assert!(content.links.is_empty());
    }

    #[test]
    fn test_skip_fragment_only() {
        let content = extract(r##"<html><body><a href="#section">Jump</a></body></html>"##);
        assert!(content.links.is_empty());
    }

    #[test]
    fn test_mixed_valid_and_invalid_links() {
        let content = extract(
            r#"<html><body>
            <a href="/valid">Valid</a>
            <a href="javascript:alert('no')">Invalid</a>
            <a href="/another-valid">Valid</a>
            </body></html>"#,
        );
        assert_eq!(content.links.len(), 2);
    }

    #[test]
    fn test_malformed_html_degrades_to_best_effort() {
        // html5ever recovers from broken markup; worst case is empty sets
        let content = extract("<html><body><a href='/x'><div><img src=/y.png</body>");
        assert!(content.links.len() <= 1);
    }

    #[test]
    fn test_empty_document() {
        let content = extract("");
        assert!(content.links.is_empty());
        assert!(content.images.is_empty());
    }
}
