//! Crawler module for page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Authenticated HTTP fetching over one persistent session
//! - Visible-text extraction and in-domain link extraction
//! - Breadth-first crawl coordination with a page budget and pacing

mod content;
mod coordinator;
mod document;
mod fetcher;
mod pacer;
mod parser;

pub use content::{extract_text, extract_text_from_markup, MIN_CONTENT_CHARS};
pub use coordinator::{CrawlBudget, CrawlReport, Crawler};
pub use document::Document;
pub use fetcher::{build_http_client, FetchError, FetchedPage, Fetcher};
pub use pacer::{Sleeper, TokioSleeper};
pub use parser::{extract_links, parse_page, ParsedPage};

use crate::config::Config;
use crate::HarvestError;

/// Runs a complete crawl from a loaded configuration
///
/// This is the main entry point for a one-shot harvest. It will:
/// 1. Validate the configuration and build the session
/// 2. Log in, if the auth scheme asks for it
/// 3. Crawl breadth-first within the seed's domain
/// 4. Return every harvested document with the run statistics
pub async fn crawl(config: &Config) -> Result<CrawlReport, HarvestError> {
    Crawler::from_config(config)?.crawl().await
}
