//! Error types for crawl operations.

use thiserror::Error;

use crate::fetch::FetchError;

use super::{MAX_CONCURRENCY, MIN_CONCURRENCY};

/// Errors that can occur while crawling.
///
/// `ListingUnavailable`, `TraversalDepthExceeded` and `SemaphoreClosed` abort
/// the whole crawl. `FetchFailed` describes a single leaf and is only ever
/// logged by the orchestrator; the leaf's contribution is dropped.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// A directory listing could not be retrieved or decoded.
    #[error("listing unavailable at {address}: {source}")]
    ListingUnavailable {
        /// The listing address.
        address: String,
        /// The final fetch error.
        #[source]
        source: FetchError,
    },

    /// A leaf's content could not be retrieved.
    #[error("fetch failed for {address}: {source}")]
    FetchFailed {
        /// The content address.
        address: String,
        /// The final fetch error.
        #[source]
        source: FetchError,
    },

    /// The tree is deeper than the configured limit.
    #[error("traversal depth limit {limit} exceeded at {address}")]
    TraversalDepthExceeded {
        /// The listing address that would have exceeded the limit.
        address: String,
        /// The configured maximum depth.
        limit: usize,
    },

    /// Invalid concurrency value provided.
    #[error(
        "invalid concurrency value {value}: must be between {MIN_CONCURRENCY} and {MAX_CONCURRENCY}"
    )]
    InvalidConcurrency {
        /// The invalid value that was provided.
        value: usize,
    },

    /// Semaphore was closed unexpectedly.
    #[error("semaphore closed unexpectedly")]
    SemaphoreClosed,
}

impl CrawlError {
    /// Creates a listing-unavailable error.
    pub fn listing_unavailable(address: impl Into<String>, source: FetchError) -> Self {
        Self::ListingUnavailable {
            address: address.into(),
            source,
        }
    }

    /// Creates a leaf fetch-failed error.
    pub fn fetch_failed(address: impl Into<String>, source: FetchError) -> Self {
        Self::FetchFailed {
            address: address.into(),
            source,
        }
    }

    /// Creates a depth-exceeded error.
    pub fn depth_exceeded(address: impl Into<String>, limit: usize) -> Self {
        Self::TraversalDepthExceeded {
            address: address.into(),
            limit,
        }
    }
}
