//! Destination naming for downloaded images
//!
//! Images group by originating page: the folder slug is derived from the
//! page path, and the filename embeds a short digest of the image URL so
//! identical basenames from different URLs never overwrite each other.

use sha2::{Digest, Sha256};
use url::Url;

/// Derives the destination folder slug from a page URL
///
/// The page path with slashes replaced by hyphens, `home` for the root
/// page. Characters outside `[A-Za-z0-9._-]` are replaced with hyphens so
/// the slug is always a safe single path component.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use pichound::download::folder_slug;
///
/// let page = Url::parse("https://example.com/blog/post-1/").unwrap();
/// assert_eq!(folder_slug(&page), "blog-post-1");
///
/// let root = Url::parse("https://example.com/").unwrap();
/// assert_eq!(folder_slug(&root), "home");
/// ```
pub fn folder_slug(page_url: &Url) -> String {
    let trimmed = page_url.path().trim_matches('/');

    if trimmed.is_empty() {
        return "home".to_string();
    }

    let slug: String = trimmed
        .chars()
        .map(|c| match c {
            '/' => '-',
            c if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' => c,
            _ => '-',
        })
        .collect();

    if slug.trim_matches('-').is_empty() {
        "home".to_string()
    } else {
        slug
    }
}

/// Derives the destination filename for an image URL
///
/// Uses the basename of the URL path, with an 8-hex-character SHA-256
/// digest of the full URL inserted before the extension. The digest makes
/// the name deterministic per URL and collision-free across distinct URLs,
/// so concurrent download workers never need to coordinate on names.
///
/// # Examples
///
/// ```
/// use url::Url;
/// use pichound::download::image_filename;
///
/// let img = Url::parse("https://example.com/img/logo.png").unwrap();
/// let name = image_filename(&img);
/// assert!(name.starts_with("logo-"));
/// assert!(name.ends_with(".png"));
/// ```
pub fn image_filename(image_url: &Url) -> String {
    let digest = short_digest(image_url.as_str());

    let basename = image_url
        .path_segments()
        .and_then(|segments| segments.last())
        .unwrap_or("");

    let (stem, ext) = split_extension(basename);

    let stem = sanitize_component(stem);
    let stem = if stem.is_empty() {
        "image".to_string()
    } else {
        stem
    };

    match ext {
        Some(ext) => format!("{}-{}.{}", stem, digest, sanitize_component(ext)),
        None => format!("{}-{}", stem, digest),
    }
}

/// First 8 hex characters of the SHA-256 of the input
fn short_digest(input: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    let digest = hex::encode(hasher.finalize());
    digest[..8].to_string()
}

/// Splits `name.ext` into stem and extension
fn split_extension(basename: &str) -> (&str, Option<&str>) {
    match basename.rsplit_once('.') {
        Some((stem, ext)) if !stem.is_empty() && !ext.is_empty() => (stem, Some(ext)),
        _ => (basename, None),
    }
}

/// Keeps only filesystem-safe characters
fn sanitize_component(s: &str) -> String {
    s.chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '.' || c == '_' || c == '-' {
                c
            } else {
                '-'
            }
        })
        .collect()
}
