//! Domain-Harvester: a polite single-domain text harvester
//!
//! This crate crawls one website breadth-first from a seed URL, authenticating
//! if required, and turns every page with real content into a [`Document`]
//! ready for downstream chunking and indexing.

pub mod config;
pub mod crawler;
pub mod output;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for Domain-Harvester operations
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Invalid crawl transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlPhase,
        to: state::CrawlPhase,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to serialize document: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors
///
/// Every variant is raised before the first network request is made.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),

    #[error("Invalid seed URL: {0}")]
    Seed(#[from] UrlError),

    #[error("Failed to build HTTP client: {0}")]
    Client(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing domain in URL")]
    MissingDomain,
}

/// Result type alias for Domain-Harvester operations
pub type Result<T> = std::result::Result<T, HarvestError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::{AuthConfig, Config};
pub use crawler::{CrawlReport, Crawler, Document, FetchError};
pub use state::{CrawlPhase, PageOutcome};
pub use url::{extract_domain, is_valid_url};
