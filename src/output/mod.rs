//! Output module for harvested documents and crawl summaries
//!
//! This module handles:
//! - Streaming documents as JSON Lines
//! - Recording crawl statistics
//! - Printing and exporting the end-of-run summary

mod jsonl;
pub mod stats;

pub use jsonl::{write_jsonl, write_summary, JsonlWriter};
pub use stats::{print_statistics, CrawlStats};
