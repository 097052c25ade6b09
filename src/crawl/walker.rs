//! Recursive expansion of a remote directory tree into leaf targets.
//!
//! The walker issues one listing request per directory. Sibling
//! sub-directories are expanded concurrently, and their results are stitched
//! back in listing order, so the output is exactly what a sequential
//! depth-first walk would produce. Every listing request in one walk draws a
//! permit from a single semaphore, so at most `listing_concurrency` requests
//! are in flight across the whole tree regardless of depth.
//!
//! A directory that cannot be listed fails the whole expansion: a missing
//! subtree must not look like an empty one.

use std::collections::HashSet;
use std::sync::Arc;

use futures_util::future::BoxFuture;
use futures_util::{FutureExt, StreamExt, TryStreamExt, stream};
use tokio::sync::Semaphore;
use tracing::{debug, info, instrument, warn};

use super::CrawlError;
use crate::fetch::{ListingSource, RetryPolicy, retry_fetch};
use crate::listing::{LeafTarget, ListingEntry, SuffixFilter};

/// Default maximum directory depth below the root.
pub const DEFAULT_MAX_DEPTH: usize = 32;

/// Default number of listings fetched at once across one walk.
pub const DEFAULT_LISTING_CONCURRENCY: usize = 8;

enum Slot {
    Leaf(LeafTarget),
    Dir,
}

/// Expands a listing address into the matching leaf targets below it.
pub struct TreeWalker {
    source: Arc<dyn ListingSource>,
    filter: SuffixFilter,
    retry_policy: RetryPolicy,
    max_depth: usize,
    listing_concurrency: usize,
}

impl std::fmt::Debug for TreeWalker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TreeWalker")
            .field("filter", &self.filter)
            .field("retry_policy", &self.retry_policy)
            .field("max_depth", &self.max_depth)
            .field("listing_concurrency", &self.listing_concurrency)
            .finish_non_exhaustive()
    }
}

impl TreeWalker {
    /// Creates a walker with default depth limit, listing concurrency and
    /// retry policy.
    #[must_use]
    pub fn new(source: Arc<dyn ListingSource>, filter: SuffixFilter) -> Self {
        Self {
            source,
            filter,
            retry_policy: RetryPolicy::default(),
            max_depth: DEFAULT_MAX_DEPTH,
            listing_concurrency: DEFAULT_LISTING_CONCURRENCY,
        }
    }

    /// Sets the maximum depth below the root (the root is depth 0).
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Sets the retry policy used for listing requests.
    #[must_use]
    pub fn with_retry_policy(mut self, retry_policy: RetryPolicy) -> Self {
        self.retry_policy = retry_policy;
        self
    }

    /// Sets how many listings one walk may fetch at once (at least 1).
    #[must_use]
    pub fn with_listing_concurrency(mut self, listing_concurrency: usize) -> Self {
        self.listing_concurrency = listing_concurrency.max(1);
        self
    }

    /// Returns the configured depth limit.
    #[must_use]
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Returns the leaf filter.
    #[must_use]
    pub fn filter(&self) -> &SuffixFilter {
        &self.filter
    }

    /// Expands `address` into its matching leaf targets, in depth-first
    /// listing order with duplicate addresses removed.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::ListingUnavailable`] if any listing in the tree
    /// cannot be fetched or decoded, and [`CrawlError::TraversalDepthExceeded`]
    /// if the tree is deeper than the configured limit.
    #[instrument(skip(self), fields(max_depth = self.max_depth))]
    pub async fn expand(&self, address: &str) -> Result<Vec<LeafTarget>, CrawlError> {
        let permits = Semaphore::new(self.listing_concurrency);
        let leaves = self.expand_at(address.to_string(), 0, &permits).await?;

        let mut seen = HashSet::new();
        let discovered = leaves.len();
        let unique: Vec<LeafTarget> = leaves
            .into_iter()
            .filter(|leaf| seen.insert(leaf.address.clone()))
            .collect();

        if unique.len() < discovered {
            debug!(
                duplicates = discovered - unique.len(),
                "dropped duplicate leaf addresses"
            );
        }
        info!(leaves = unique.len(), "tree expansion complete");
        Ok(unique)
    }

    fn expand_at<'a>(
        &'a self,
        address: String,
        depth: usize,
        permits: &'a Semaphore,
    ) -> BoxFuture<'a, Result<Vec<LeafTarget>, CrawlError>> {
        async move {
            if depth > self.max_depth {
                warn!(address = %address, depth, limit = self.max_depth, "depth limit exceeded");
                return Err(CrawlError::depth_exceeded(address, self.max_depth));
            }

            let permit = permits
                .acquire()
                .await
                .map_err(|_| CrawlError::SemaphoreClosed)?;
            let source = &self.source;
            let url: &str = &address;
            let (entries, _attempts) = retry_fetch(&self.retry_policy, url, move || {
                source.fetch_listing(url)
            })
            .await
            .map_err(|(e, attempts)| {
                warn!(address = %address, attempts, error = %e, "listing unavailable");
                CrawlError::listing_unavailable(address.as_str(), e)
            })?;
            // Children wait on the same semaphore.
            drop(permit);

            let mut slots = Vec::with_capacity(entries.len());
            let mut subdirs = Vec::new();

            for entry in entries {
                match entry {
                    ListingEntry::File { name, download_url } => {
                        if self.filter.matches(&name) {
                            debug!(name = %name, depth, "matched file");
                            slots.push(Slot::Leaf(LeafTarget {
                                name,
                                address: download_url,
                            }));
                        } else {
                            debug!(name = %name, "skipping non-matching file");
                        }
                    }
                    ListingEntry::Dir { name, url } => {
                        debug!(name = %name, depth = depth + 1, "descending into directory");
                        slots.push(Slot::Dir);
                        subdirs.push(url);
                    }
                    ListingEntry::Unrecognized { kind } => {
                        warn!(address = %address, kind = %kind, "skipping unrecognized entry");
                    }
                }
            }

            let expanded: Vec<Vec<LeafTarget>> = stream::iter(subdirs)
                .map(|url| self.expand_at(url, depth + 1, permits))
                .buffered(self.listing_concurrency)
                .try_collect()
                .await?;

            let mut expanded = expanded.into_iter();
            let mut leaves = Vec::new();
            for slot in slots {
                match slot {
                    Slot::Leaf(leaf) => leaves.push(leaf),
                    Slot::Dir => leaves.extend(expanded.next().unwrap_or_default()),
                }
            }
            Ok(leaves)
        }
        .boxed()
    }
}
