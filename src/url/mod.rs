//! URL handling module for Domain-Harvester
//!
//! This module provides seed normalization, link resolution, domain extraction
//! and the same-domain validator that gates the crawl frontier.

mod domain;
mod filter;
mod normalize;

// Re-export main functions
pub use domain::extract_domain;
pub use filter::{has_non_document_extension, is_valid_url};
pub use normalize::{normalize_seed, resolve_link, strip_fragment};
