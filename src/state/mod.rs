//! State module for tracking crawl progress
//!
//! # Components
//!
//! - `CrawlState`: Frontier, enqueued-set and visited-set owned by the controller
//! - `CrawlPhase`: Lifecycle of the crawl (idle, running, done)
//! - `PageOutcome`: What a single visited page produced

mod crawl_state;
mod page_outcome;
mod phase;

// Re-export main types
pub use crawl_state::CrawlState;
pub use page_outcome::PageOutcome;
pub use phase::CrawlPhase;
