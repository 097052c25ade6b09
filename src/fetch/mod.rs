//! Listing and content retrieval.
//!
//! The crawl core talks to the remote tree through two seams:
//!
//! - [`ListingSource`] - one request per directory, returns its entries
//! - [`ContentSource`] - one request per leaf, returns its raw bytes
//!
//! [`HttpClient`] implements both against an HTTP provider. Tests and
//! alternative providers can implement the traits directly.
//!
//! Neither seam retries on its own; callers wrap requests in
//! [`retry_fetch`] with a [`RetryPolicy`].

mod client;
mod constants;
mod error;
mod retry;

pub use client::HttpClient;
pub use constants::{CONNECT_TIMEOUT_SECS, LISTING_MEDIA_TYPE, READ_TIMEOUT_SECS};
pub use error::FetchError;
pub use retry::{
    DEFAULT_MAX_RETRIES, FailureType, RetryDecision, RetryPolicy, classify_error,
    parse_retry_after, retry_fetch,
};

use async_trait::async_trait;
use bytes::Bytes;

use crate::listing::ListingEntry;

/// Provider of directory listings.
///
/// Uses `async_trait` so walkers can hold an `Arc<dyn ListingSource>`.
#[async_trait]
pub trait ListingSource: Send + Sync {
    /// Fetches and decodes the listing at `url`.
    async fn fetch_listing(&self, url: &str) -> Result<Vec<ListingEntry>, FetchError>;
}

/// Provider of raw leaf content.
#[async_trait]
pub trait ContentSource: Send + Sync {
    /// Fetches the raw bytes at `url`.
    async fn fetch_content(&self, url: &str) -> Result<Bytes, FetchError>;
}
