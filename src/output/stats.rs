//! Crawl statistics
//!
//! This module tallies what a crawl did and renders the end-of-run summary.

use crate::crawler::FetchError;
use crate::state::PageOutcome;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::BTreeMap;
use url::Url;

/// Crawl statistics summary
#[derive(Debug, Clone, Serialize)]
pub struct CrawlStats {
    /// Seed URL the crawl started from
    pub seed: String,

    /// Pages popped from the frontier and processed
    pub pages_visited: u64,

    /// Documents emitted
    pub documents: u64,

    /// Pages fetched but under the content threshold
    pub thin_pages: u64,

    /// Pages whose fetch failed
    pub failed_pages: u64,

    /// URLs appended to the frontier after the seed
    pub links_enqueued: u64,

    /// Fetch failures grouped by kind
    pub failures_by_kind: BTreeMap<String, u64>,

    pub started_at: DateTime<Utc>,

    pub finished_at: Option<DateTime<Utc>>,
}

impl CrawlStats {
    pub fn new(seed: &Url) -> Self {
        Self {
            seed: seed.to_string(),
            pages_visited: 0,
            documents: 0,
            thin_pages: 0,
            failed_pages: 0,
            links_enqueued: 0,
            failures_by_kind: BTreeMap::new(),
            started_at: Utc::now(),
            finished_at: None,
        }
    }

    /// Counts one visited page
    pub fn record(&mut self, outcome: PageOutcome) {
        self.pages_visited += 1;
        match outcome {
            PageOutcome::Harvested => self.documents += 1,
            PageOutcome::Thin => self.thin_pages += 1,
            PageOutcome::Failed => self.failed_pages += 1,
        }
    }

    /// Counts a fetch failure under its kind
    pub fn record_failure(&mut self, error: &FetchError) {
        *self
            .failures_by_kind
            .entry(error.kind().to_string())
            .or_insert(0) += 1;
    }

    pub fn finish(&mut self) {
        self.finished_at = Some(Utc::now());
    }

    /// Wall-clock duration in seconds, once finished
    pub fn duration_seconds(&self) -> Option<f64> {
        self.finished_at
            .map(|finished| (finished - self.started_at).num_milliseconds() as f64 / 1000.0)
    }
}

/// Prints statistics to stderr in a formatted manner
///
/// Stdout is left free for the document stream.
pub fn print_statistics(stats: &CrawlStats) {
    eprintln!("=== Harvest Statistics ===\n");

    eprintln!("Seed: {}", stats.seed);
    eprintln!("Started: {}", stats.started_at.to_rfc3339());
    if let Some(finished) = stats.finished_at {
        eprintln!("Finished: {}", finished.to_rfc3339());
    }
    if let Some(seconds) = stats.duration_seconds() {
        eprintln!("Duration: {:.1}s", seconds);
    }
    eprintln!();

    eprintln!("Pages:");
    eprintln!("  Visited: {}", stats.pages_visited);
    eprintln!(
        "  Documents: {} ({:.1}%)",
        stats.documents,
        percentage(stats.documents, stats.pages_visited)
    );
    eprintln!("  Too short: {}", stats.thin_pages);
    eprintln!("  Failed: {}", stats.failed_pages);
    eprintln!("  Links enqueued: {}", stats.links_enqueued);

    if !stats.failures_by_kind.is_empty() {
        eprintln!("\nFailures by kind:");
        let mut kinds: Vec<_> = stats.failures_by_kind.iter().collect();
        kinds.sort_by(|a, b| b.1.cmp(a.1));
        for (kind, count) in kinds {
            eprintln!("  {}: {}", kind, count);
        }
    }
}

fn percentage(part: u64, total: u64) -> f64 {
    if total > 0 {
        (part as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}
