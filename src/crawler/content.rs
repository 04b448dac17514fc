//! Visible-text extraction
//!
//! Navigation chrome and code never reach a document: text under `script`,
//! `style`, `noscript`, `nav`, `header` and `footer` is dropped before the
//! rest is joined.

use scraper::node::Node;
use scraper::Html;

/// Pages with fewer characters than this produce no document
pub const MIN_CONTENT_CHARS: usize = 50;

/// Elements whose text is never content
///
/// The parser runs with scripting enabled, so `noscript` children arrive as
/// one raw-markup text node and must be dropped wholesale.
const NON_CONTENT_ELEMENTS: &[&str] =
    &["script", "style", "noscript", "nav", "header", "footer"];

/// Extracts the visible text of a parsed page
///
/// Text nodes are joined with single spaces and every run of whitespace is
/// collapsed. Returns `None` when the result is shorter than
/// [`MIN_CONTENT_CHARS`] characters.
pub fn extract_text(document: &Html) -> Option<String> {
    let mut words: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| {
            ancestor
                .value()
                .as_element()
                .is_some_and(|el| NON_CONTENT_ELEMENTS.contains(&el.name()))
        });
        if hidden {
            continue;
        }

        words.extend(text.split_whitespace());
    }

    let content = words.join(" ");
    if content.chars().count() < MIN_CONTENT_CHARS {
        return None;
    }
    Some(content)
}

/// Parses `markup` and extracts its visible text
pub fn extract_text_from_markup(markup: &str) -> Option<String> {
    extract_text(&Html::parse_document(markup))
}
