//! Crawl engine: tree expansion and fan-out aggregation.
//!
//! - [`TreeWalker`] - Expands a listing address into matching leaf targets
//! - [`CrawlOrchestrator`] - Fetches, tokenizes and merges every leaf concurrently
//! - [`CrawlError`] - Fatal and per-leaf failure taxonomy

mod error;
mod orchestrator;
mod walker;

pub use error::CrawlError;
pub use orchestrator::{CrawlOrchestrator, CrawlStats};
pub use walker::{DEFAULT_LISTING_CONCURRENCY, DEFAULT_MAX_DEPTH, TreeWalker};

/// Minimum allowed concurrency value.
pub const MIN_CONCURRENCY: usize = 1;

/// Maximum allowed concurrency value.
pub const MAX_CONCURRENCY: usize = 100;

/// Default concurrency if not specified.
pub const DEFAULT_CONCURRENCY: usize = 10;
