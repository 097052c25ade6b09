//! Letterfreq Core Library
//!
//! Crawls a remote directory tree exposed over HTTP, fetches every file whose
//! name matches a suffix filter, and computes one letter-frequency histogram
//! across all of them, sorted by descending count.
//!
//! # Architecture
//!
//! - [`fetch`] - Listing/content provider seams, HTTP client, retry policy
//! - [`listing`] - Listing entry model and leaf filter
//! - [`frequency`] - Tokenizer, per-crawl aggregator, sorted result
//! - [`crawl`] - Tree walker and crawl orchestrator
//! - [`server`] - REST trigger surface

// Clippy lints - strict for library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod crawl;
pub mod fetch;
pub mod frequency;
pub mod listing;
pub mod server;
mod user_agent;

// Re-export commonly used types
pub use crawl::{CrawlError, CrawlOrchestrator, CrawlStats, DEFAULT_CONCURRENCY, TreeWalker};
pub use fetch::{
    ContentSource, DEFAULT_MAX_RETRIES, FetchError, HttpClient, ListingSource, RetryPolicy,
};
pub use frequency::{CrawlResult, FrequencyAggregator, FrequencyMap, tokenize};
pub use listing::{LeafTarget, ListingEntry, SuffixFilter};
