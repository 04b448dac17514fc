use crate::UrlError;
use url::Url;

/// Schemes an anchor may carry that never lead to a fetchable page
const SKIPPED_SCHEMES: &[&str] = &["javascript:", "mailto:", "tel:", "data:"];

/// Parses a seed URL and strips its fragment
///
/// # Returns
///
/// * `Ok(Url)` - Absolute HTTP(S) URL without fragment
/// * `Err(UrlError)` - Malformed, non-HTTP(S) or hostless input
///
/// # Examples
///
/// ```
/// use domain_harvester::url::normalize_seed;
///
/// let url = normalize_seed("https://example.com/docs#intro").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/docs");
/// ```
pub fn normalize_seed(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str.trim()).map_err(|e| UrlError::Parse(e.to_string()))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().map_or(true, str::is_empty) {
        return Err(UrlError::MissingDomain);
    }

    Ok(strip_fragment(url))
}

/// Removes the fragment so `page#a` and `page#b` name the same document
pub fn strip_fragment(mut url: Url) -> Url {
    url.set_fragment(None);
    url
}

/// Resolves an href found on `base_url` to an absolute, fragment-free URL
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel:, data: links
/// - hrefs that fail to resolve
/// - non-HTTP(S) URLs after resolution
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if SKIPPED_SCHEMES.iter().any(|s| lowered.starts_with(s)) {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    if absolute.scheme() != "http" && absolute.scheme() != "https" {
        return None;
    }

    Some(strip_fragment(absolute))
}
