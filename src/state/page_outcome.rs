//! Per-page results recorded by the crawl controller

use std::fmt;

/// What processing a single visited page produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum PageOutcome {
    /// Page fetched and a document was emitted
    Harvested,

    /// Page fetched but its text fell under the content threshold;
    /// its links were still followed
    Thin,

    /// Fetch failed; the page contributed no content and no links
    Failed,
}

impl PageOutcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Harvested => "harvested",
            Self::Thin => "thin",
            Self::Failed => "failed",
        }
    }
}

impl fmt::Display for PageOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
