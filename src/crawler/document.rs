use serde::{Deserialize, Serialize};
use url::Url;

/// A harvested page: its visible text and the URL it came from
///
/// Documents are immutable once built; the crawl hands them to the caller by value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    content: String,
    source: String,
}

impl Document {
    pub fn new(content: String, source: &Url) -> Self {
        Self {
            content,
            source: source.to_string(),
        }
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    /// Splits the document into `(content, source)`
    pub fn into_parts(self) -> (String, String) {
        (self.content, self.source)
    }
}
