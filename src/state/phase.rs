//! Lifecycle of a single crawl
//!
//! A crawl moves `Idle -> Running -> Done` exactly once; there is no way back.

use std::fmt;

/// Represents the current phase of a crawl
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CrawlPhase {
    /// Crawler built, nothing fetched yet
    Idle,

    /// Frontier is being drained
    Running,

    /// Frontier exhausted or page budget reached
    Done,
}

impl CrawlPhase {
    /// Returns true if moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: CrawlPhase) -> bool {
        matches!(
            (self, next),
            (Self::Idle, Self::Running) | (Self::Running, Self::Done)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Running => "running",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for CrawlPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
