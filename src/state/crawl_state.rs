//! Frontier and visited-set for one crawl
//!
//! `CrawlState` is owned exclusively by the crawl controller. Every URL it
//! holds has already had its fragment stripped, so identity is
//! fragment-insensitive.

use crate::state::CrawlPhase;
use crate::HarvestError;
use std::collections::{HashSet, VecDeque};
use url::Url;

/// Mutable state of a single crawl
#[derive(Debug)]
pub struct CrawlState {
    /// Pending URLs in discovery order (breadth-first)
    frontier: VecDeque<Url>,

    /// Every URL ever appended to the frontier
    enqueued: HashSet<Url>,

    /// URLs popped and processed, successfully or not
    visited: HashSet<Url>,

    phase: CrawlPhase,
}

impl CrawlState {
    /// Creates the state for a crawl whose frontier holds only `seed`
    pub fn new(seed: Url) -> Self {
        let mut enqueued = HashSet::new();
        enqueued.insert(seed.clone());

        Self {
            frontier: VecDeque::from([seed]),
            enqueued,
            visited: HashSet::new(),
            phase: CrawlPhase::Idle,
        }
    }

    /// Returns true while there is work left and the page budget allows it
    pub fn should_continue(&self, max_pages: usize) -> bool {
        !self.frontier.is_empty() && self.visited.len() < max_pages
    }

    /// Pops the oldest pending URL
    pub fn next_url(&mut self) -> Option<Url> {
        self.frontier.pop_front()
    }

    /// Records `url` as visited
    ///
    /// Returns false if it had already been visited.
    pub fn mark_visited(&mut self, url: &Url) -> bool {
        self.visited.insert(url.clone())
    }

    /// Appends `url` to the frontier unless it was visited or enqueued before
    ///
    /// Returns true if the URL was added.
    pub fn enqueue(&mut self, url: Url) -> bool {
        if self.visited.contains(&url) || self.enqueued.contains(&url) {
            return false;
        }
        self.enqueued.insert(url.clone());
        self.frontier.push_back(url);
        true
    }

    pub fn is_visited(&self, url: &Url) -> bool {
        self.visited.contains(url)
    }

    pub fn visited_count(&self) -> usize {
        self.visited.len()
    }

    pub fn frontier_len(&self) -> usize {
        self.frontier.len()
    }

    pub fn phase(&self) -> CrawlPhase {
        self.phase
    }

    /// Moves the crawl to `next`, rejecting anything but `Idle -> Running -> Done`
    pub fn transition(&mut self, next: CrawlPhase) -> Result<(), HarvestError> {
        if !self.phase.can_transition_to(next) {
            return Err(HarvestError::InvalidTransition {
                from: self.phase,
                to: next,
            });
        }
        tracing::debug!("Crawl phase {} -> {}", self.phase, next);
        self.phase = next;
        Ok(())
    }
}
