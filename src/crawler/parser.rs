//! HTML parser for extracting links and content
//!
//! This module turns fetched markup into what the controller needs:
//! - In-domain links to follow (from `<a href>` tags)
//! - The page's visible text, when there is enough of it

use crate::crawler::content::extract_text;
use crate::url::{is_valid_url, resolve_link};
use scraper::{Html, Selector};
use url::Url;

/// Extracted information from an HTML page
#[derive(Debug, Clone)]
pub struct ParsedPage {
    /// Visible text, or None if the page fell under the content threshold
    pub text: Option<String>,

    /// Valid in-domain links in document order (may contain duplicates)
    pub links: Vec<Url>,
}

/// Parses HTML content and extracts text and links
///
/// Links are gathered from the whole document, navigation included, even
/// though navigation text is excluded from the content.
///
/// # Example
///
/// ```
/// use domain_harvester::crawler::parse_page;
/// use url::Url;
///
/// let html = r#"<html><body><a href="/next">Next</a></body></html>"#;
/// let current = Url::parse("https://example.com/start").unwrap();
/// let parsed = parse_page(html, &current, "example.com");
/// assert_eq!(parsed.links[0].as_str(), "https://example.com/next");
/// assert!(parsed.text.is_none());
/// ```
pub fn parse_page(html: &str, current_url: &Url, base_domain: &str) -> ParsedPage {
    let document = Html::parse_document(html);

    ParsedPage {
        text: extract_text(&document),
        links: extract_links(&document, current_url, base_domain),
    }
}

/// Extracts all crawlable links from a parsed document
///
/// # Link Extraction Rules
///
/// **Include:** every `<a href="...">`, resolved against `current_url` with
/// its fragment removed, that the URL validator accepts for `base_domain`.
///
/// **Exclude:**
/// - `javascript:`, `mailto:`, `tel:` and `data:` links
/// - Fragment-only links (same-page anchors)
/// - Links to other domains or to non-document files
///
/// Deduplication against the crawl frontier is the controller's job.
pub fn extract_links(document: &Html, current_url: &Url, base_domain: &str) -> Vec<Url> {
    let mut links = Vec::new();

    let Ok(a_selector) = Selector::parse("a[href]") else {
        return links;
    };

    for element in document.select(&a_selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };

        match resolve_link(href, current_url) {
            Some(absolute) if is_valid_url(&absolute, base_domain) => links.push(absolute),
            Some(absolute) => tracing::trace!("Rejected link {}", absolute),
            None => {}
        }
    }

    links
}
