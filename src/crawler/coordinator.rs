//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the crawl loop that ties the pieces together:
//! - Owning the frontier and visited-set for one crawl
//! - Coordinating fetching, content extraction and link extraction
//! - Enforcing the page budget and the delay between requests
//! - Isolating per-page failures so one bad page never ends the crawl

use crate::config::{AuthConfig, Config, CrawlerConfig};
use crate::crawler::fetcher::Fetcher;
use crate::crawler::pacer::{Sleeper, TokioSleeper};
use crate::crawler::parser::parse_page;
use crate::crawler::Document;
use crate::output::CrawlStats;
use crate::state::{CrawlPhase, CrawlState, PageOutcome};
use crate::url::{extract_domain, normalize_seed};
use crate::{ConfigError, HarvestError, UrlError};
use std::time::{Duration, Instant};
use url::Url;

/// How far and how fast a crawl may go
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrawlBudget {
    /// Upper bound on visited pages (always >= 1)
    pub max_pages: usize,

    /// Pause between consecutive pages
    pub delay: Duration,
}

impl CrawlBudget {
    /// Creates a budget, rejecting a zero page count
    pub fn new(max_pages: usize, delay: Duration) -> Result<Self, ConfigError> {
        if max_pages == 0 {
            return Err(ConfigError::Validation(
                "max_pages must be >= 1, got 0".to_string(),
            ));
        }
        Ok(Self { max_pages, delay })
    }
}

/// Everything a finished crawl produced
#[derive(Debug, Clone)]
pub struct CrawlReport {
    /// Documents in the order they were harvested
    pub documents: Vec<Document>,

    pub stats: CrawlStats,
}

impl CrawlReport {
    pub fn into_documents(self) -> Vec<Document> {
        self.documents
    }
}

/// Breadth-first, single-domain crawler
///
/// Built once per crawl; [`Crawler::crawl`] consumes it, so a finished crawl
/// cannot be resumed or rerun.
pub struct Crawler<S = TokioSleeper> {
    fetcher: Fetcher,
    seed: Url,
    base_domain: String,
    budget: CrawlBudget,
    sleeper: S,
}

impl Crawler<TokioSleeper> {
    /// Creates a crawler from crawler settings and an auth scheme
    ///
    /// All validation happens here, before any network activity.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use domain_harvester::config::{AuthConfig, CrawlerConfig};
    /// use domain_harvester::Crawler;
    ///
    /// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
    /// let mut settings = CrawlerConfig::new("https://docs.example.com/index.htm");
    /// settings.max_pages = 50;
    /// let auth = AuthConfig::from_credentials(Some("alice"), Some("secret"));
    ///
    /// let report = Crawler::new(&settings, auth)?.crawl().await?;
    /// println!("Harvested {} documents", report.documents.len());
    /// # Ok(())
    /// # }
    /// ```
    pub fn new(settings: &CrawlerConfig, auth: AuthConfig) -> Result<Self, ConfigError> {
        crate::config::validate_crawler_config(settings)?;
        crate::config::validate_auth_config(&auth)?;

        let seed = normalize_seed(&settings.base_url)?;
        let base_domain = extract_domain(&seed).ok_or(UrlError::MissingDomain)?;
        let budget = CrawlBudget::new(settings.max_pages as usize, settings.delay())?;
        let fetcher = Fetcher::new(settings, auth)?;

        Ok(Self {
            fetcher,
            seed,
            base_domain,
            budget,
            sleeper: TokioSleeper,
        })
    }

    /// Creates a crawler from a loaded configuration file
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        Self::new(&config.crawler, config.auth.clone())
    }
}

impl<S: Sleeper> Crawler<S> {
    /// Replaces the pacing implementation
    pub fn with_sleeper<T: Sleeper>(self, sleeper: T) -> Crawler<T> {
        Crawler {
            fetcher: self.fetcher,
            seed: self.seed,
            base_domain: self.base_domain,
            budget: self.budget,
            sleeper,
        }
    }

    pub fn seed(&self) -> &Url {
        &self.seed
    }

    /// Domain every crawled URL must share with the seed
    pub fn base_domain(&self) -> &str {
        &self.base_domain
    }

    pub fn budget(&self) -> CrawlBudget {
        self.budget
    }

    /// Runs the crawl and collects every document
    pub async fn crawl(self) -> Result<CrawlReport, HarvestError> {
        let mut documents = Vec::new();
        let stats = self.crawl_streaming(|doc| documents.push(doc)).await?;
        Ok(CrawlReport { documents, stats })
    }

    /// Runs the crawl, handing each document to `on_document` as soon as it is harvested
    ///
    /// # Crawl Loop
    ///
    /// While the frontier is non-empty and fewer than `max_pages` pages were visited:
    ///
    /// 1. Pop the oldest URL (breadth-first)
    /// 2. Skip it if already visited, otherwise mark it visited
    /// 3. Fetch it; a failure yields no content and no links
    /// 4. Emit a document if the page has enough text
    /// 5. Append every extracted link not seen before
    /// 6. Sleep `delay` if another page will follow
    pub async fn crawl_streaming<F>(self, mut on_document: F) -> Result<CrawlStats, HarvestError>
    where
        F: FnMut(Document),
    {
        let mut state = CrawlState::new(self.seed.clone());
        let mut stats = CrawlStats::new(&self.seed);
        let start_time = Instant::now();

        state.transition(CrawlPhase::Running)?;
        tracing::info!(
            "Starting crawl at {} (domain {}, max {} pages, delay {:?}, auth {})",
            self.seed,
            self.base_domain,
            self.budget.max_pages,
            self.budget.delay,
            self.fetcher.auth().method()
        );

        if let Err(e) = self.fetcher.establish_session().await {
            tracing::warn!("Session login failed, continuing without it: {}", e);
        }

        while state.should_continue(self.budget.max_pages) {
            let Some(url) = state.next_url() else {
                break;
            };

            if !state.mark_visited(&url) {
                tracing::debug!("Skipping already visited {}", url);
                continue;
            }

            let (outcome, document) = self.process_url(&url, &mut state, &mut stats).await;
            stats.record(outcome);
            if let Some(document) = document {
                on_document(document);
            }

            if stats.pages_visited % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages visited, {} documents, {} in frontier",
                    stats.pages_visited,
                    stats.documents,
                    state.frontier_len()
                );
            }

            if !self.budget.delay.is_zero() && state.should_continue(self.budget.max_pages) {
                self.sleeper.sleep(self.budget.delay).await;
            }
        }

        state.transition(CrawlPhase::Done)?;
        stats.finish();

        tracing::info!(
            "Crawling completed. Visited {} pages, harvested {} documents in {:?}",
            state.visited_count(),
            stats.documents,
            start_time.elapsed()
        );

        Ok(stats)
    }

    /// Fetches and processes a single URL
    ///
    /// Never fails: fetch errors are logged and turned into `PageOutcome::Failed`.
    async fn process_url(
        &self,
        url: &Url,
        state: &mut CrawlState,
        stats: &mut CrawlStats,
    ) -> (PageOutcome, Option<Document>) {
        tracing::info!("Scraping: {}", url);

        let page = match self.fetcher.fetch(url).await {
            Ok(page) => page,
            Err(e) => {
                tracing::warn!("Error scraping {}: {}", url, e);
                stats.record_failure(&e);
                return (PageOutcome::Failed, None);
            }
        };

        // Links resolve against where the page was actually served from
        let parsed = parse_page(&page.body, &page.url, &self.base_domain);

        let (outcome, document) = match parsed.text {
            Some(text) => {
                tracing::info!("Extracted text length: {}", text.chars().count());
                (PageOutcome::Harvested, Some(Document::new(text, url)))
            }
            None => {
                tracing::warn!("Skipping {} - insufficient content", url);
                (PageOutcome::Thin, None)
            }
        };

        for link in parsed.links {
            if state.enqueue(link.clone()) {
                tracing::debug!("Enqueued {}", link);
                stats.links_enqueued += 1;
            }
        }

        (outcome, document)
    }
}
