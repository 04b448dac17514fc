//! Configuration module for Domain-Harvester
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every check runs before the crawler touches the network.
//!
//! # Example
//!
//! ```no_run
//! use domain_harvester::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("harvest.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    AuthConfig, Config, CrawlerConfig, OutputConfig, DEFAULT_CONNECT_TIMEOUT_SECS,
    DEFAULT_DELAY_MS, DEFAULT_MAX_PAGES, DEFAULT_TIMEOUT_SECS,
};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};

pub use validation::{validate, validate_auth_config, validate_crawler_config};
