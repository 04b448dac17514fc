use crate::url::extract_domain;
use url::Url;

/// Path extensions that never hold a crawlable document
const NON_DOCUMENT_EXTENSIONS: &[&str] = &[
    // Documents we cannot read as markup
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx",
    // Images
    "jpg", "jpeg", "png", "gif", "bmp", "svg", "webp", "ico", "tif", "tiff",
    // Styles and scripts
    "css", "js", "mjs", "map",
    // Archives and binaries
    "zip", "gz", "tgz", "tar", "bz2", "7z", "rar", "exe", "dmg", "iso",
    // Media
    "mp3", "mp4", "wav", "ogg", "webm", "avi", "mov",
    // Fonts
    "woff", "woff2", "ttf", "otf", "eot",
];

/// Decides whether a candidate URL should be crawled
///
/// Rules, in order:
///
/// 1. Reject if the candidate has a host and it differs from `base_domain`
/// 2. Reject if the candidate carries a fragment (same-page anchors)
/// 3. Reject if the last path segment ends in a non-document extension
///
/// # Examples
///
/// ```
/// use url::Url;
/// use domain_harvester::url::is_valid_url;
///
/// let page = Url::parse("https://example.com/guide/intro.html").unwrap();
/// assert!(is_valid_url(&page, "example.com"));
///
/// let image = Url::parse("https://example.com/logo.png").unwrap();
/// assert!(!is_valid_url(&image, "example.com"));
/// ```
pub fn is_valid_url(candidate: &Url, base_domain: &str) -> bool {
    if let Some(domain) = extract_domain(candidate) {
        if !domain.eq_ignore_ascii_case(base_domain) {
            return false;
        }
    }

    if candidate.fragment().is_some() {
        return false;
    }

    !has_non_document_extension(candidate.path())
}

/// Returns true if the final path segment ends in a denylisted extension
pub fn has_non_document_extension(path: &str) -> bool {
    let segment = path.rsplit('/').next().unwrap_or("");
    match segment.rsplit_once('.') {
        Some((_, ext)) => {
            let ext = ext.to_ascii_lowercase();
            NON_DOCUMENT_EXTENSIONS.contains(&ext.as_str())
        }
        None => false,
    }
}
