use url::Url;

/// Extracts the crawl domain from a URL
///
/// The domain is the lowercase host followed by `:port` when the URL names a
/// port other than its scheme's default, so `http://127.0.0.1:8080/` and
/// `http://127.0.0.1:9090/` are different sites while `https://example.com:443/`
/// and `https://example.com/` are the same one.
///
/// # Returns
///
/// * `Some(String)` - The domain
/// * `None` - If the URL has no host
///
/// # Examples
///
/// ```
/// use url::Url;
/// use domain_harvester::url::extract_domain;
///
/// let url = Url::parse("https://EXAMPLE.COM/path").unwrap();
/// assert_eq!(extract_domain(&url), Some("example.com".to_string()));
///
/// let url = Url::parse("http://localhost:8080/").unwrap();
/// assert_eq!(extract_domain(&url), Some("localhost:8080".to_string()));
/// ```
pub fn extract_domain(url: &Url) -> Option<String> {
    let host = url.host_str().filter(|h| !h.is_empty())?.to_lowercase();
    match url.port() {
        Some(port) => Some(format!("{}:{}", host, port)),
        None => Some(host),
    }
}
