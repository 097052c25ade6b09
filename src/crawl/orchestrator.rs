//! Crawl orchestration: expand, fan out, join, sort.
//!
//! [`CrawlOrchestrator::run`] resolves the complete leaf set before any
//! content is fetched, then runs one fetch-tokenize-merge unit per leaf on a
//! [`JoinSet`], gated by a semaphore.
//!
//! # Failure model
//!
//! - Listing failures and depth overruns abort the crawl.
//! - A leaf whose content cannot be fetched is logged and skipped; its
//!   siblings keep running and the crawl still succeeds.
//!
//! # Cancellation
//!
//! Dropping the future returned by `run` drops the `JoinSet`, which aborts
//! every in-flight unit. The per-crawl aggregator goes with it, so a
//! cancelled crawl never yields a partial histogram.
//!
//! # Example
//!
//! ```no_run
//! use std::sync::Arc;
//!
//! use letterfreq_core::crawl::{CrawlOrchestrator, DEFAULT_CONCURRENCY, TreeWalker};
//! use letterfreq_core::fetch::{HttpClient, RetryPolicy};
//! use letterfreq_core::listing::SuffixFilter;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Arc::new(HttpClient::new(None));
//! let walker = TreeWalker::new(client.clone(), SuffixFilter::default());
//! let orchestrator =
//!     CrawlOrchestrator::new(walker, client, DEFAULT_CONCURRENCY, RetryPolicy::default())?;
//! let result = orchestrator
//!     .run("https://api.github.com/repos/lodash/lodash/contents/")
//!     .await?;
//! for (letter, count) in result.entries() {
//!     println!("{letter}: {count}");
//! }
//! # Ok(())
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{debug, info, instrument, warn};

use super::{CrawlError, MAX_CONCURRENCY, MIN_CONCURRENCY, TreeWalker};
use crate::fetch::{ContentSource, RetryPolicy, retry_fetch};
use crate::frequency::{CrawlResult, FrequencyAggregator, tokenize};
use crate::listing::LeafTarget;

/// Unit counters for one crawl.
///
/// Uses atomic counters so concurrent units can update it without a lock.
#[derive(Debug, Default)]
pub struct CrawlStats {
    discovered: AtomicUsize,
    completed: AtomicUsize,
    failed: AtomicUsize,
    retried: AtomicUsize,
}

impl CrawlStats {
    /// Creates a new stats tracker with zero counts.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of leaf targets discovered by tree expansion.
    #[must_use]
    pub fn discovered(&self) -> usize {
        self.discovered.load(Ordering::SeqCst)
    }

    /// Number of leaves fetched and merged.
    #[must_use]
    pub fn completed(&self) -> usize {
        self.completed.load(Ordering::SeqCst)
    }

    /// Number of leaves dropped after failing.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.failed.load(Ordering::SeqCst)
    }

    /// Number of retry attempts made across all leaves.
    #[must_use]
    pub fn retried(&self) -> usize {
        self.retried.load(Ordering::SeqCst)
    }

    fn set_discovered(&self, count: usize) {
        self.discovered.store(count, Ordering::SeqCst);
    }

    fn increment_completed(&self) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn increment_failed(&self) {
        self.failed.fetch_add(1, Ordering::SeqCst);
    }

    fn add_retried(&self, count: usize) {
        self.retried.fetch_add(count, Ordering::SeqCst);
    }

    fn snapshot(&self) -> Self {
        Self {
            discovered: AtomicUsize::new(self.discovered()),
            completed: AtomicUsize::new(self.completed()),
            failed: AtomicUsize::new(self.failed()),
            retried: AtomicUsize::new(self.retried()),
        }
    }
}

/// Top-level crawl coordinator.
///
/// The semaphore belongs to the orchestrator, so crawls running at the same
/// time through one orchestrator share the concurrency budget. Every crawl
/// gets its own [`FrequencyAggregator`].
pub struct CrawlOrchestrator {
    walker: TreeWalker,
    content: Arc<dyn ContentSource>,
    semaphore: Arc<Semaphore>,
    concurrency: usize,
    retry_policy: RetryPolicy,
}

impl std::fmt::Debug for CrawlOrchestrator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CrawlOrchestrator")
            .field("walker", &self.walker)
            .field("concurrency", &self.concurrency)
            .field("retry_policy", &self.retry_policy)
            .finish_non_exhaustive()
    }
}

impl CrawlOrchestrator {
    /// Creates an orchestrator.
    ///
    /// `retry_policy` applies to leaf content requests; the walker carries its
    /// own policy for listings.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::InvalidConcurrency`] if `concurrency` is outside
    /// 1..=100.
    #[instrument(level = "debug", skip(walker, content, retry_policy))]
    pub fn new(
        walker: TreeWalker,
        content: Arc<dyn ContentSource>,
        concurrency: usize,
        retry_policy: RetryPolicy,
    ) -> Result<Self, CrawlError> {
        if !(MIN_CONCURRENCY..=MAX_CONCURRENCY).contains(&concurrency) {
            return Err(CrawlError::InvalidConcurrency { value: concurrency });
        }

        debug!(
            concurrency,
            max_attempts = retry_policy.max_attempts(),
            max_depth = walker.max_depth(),
            "creating crawl orchestrator"
        );

        Ok(Self {
            walker,
            content,
            semaphore: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            retry_policy,
        })
    }

    /// Returns the configured concurrency limit.
    #[must_use]
    pub fn concurrency(&self) -> usize {
        self.concurrency
    }

    /// Returns the retry policy used for leaf content.
    #[must_use]
    pub fn retry_policy(&self) -> &RetryPolicy {
        &self.retry_policy
    }

    /// Returns the tree walker.
    #[must_use]
    pub fn walker(&self) -> &TreeWalker {
        &self.walker
    }

    /// Crawls the tree at `root` and returns its letter histogram.
    ///
    /// # Errors
    ///
    /// See [`run_with_stats`](Self::run_with_stats).
    pub async fn run(&self, root: &str) -> Result<CrawlResult, CrawlError> {
        self.run_with_stats(root).await.map(|(result, _)| result)
    }

    /// Crawls the tree at `root` and returns the histogram with unit counters.
    ///
    /// # Errors
    ///
    /// Returns [`CrawlError::ListingUnavailable`] or
    /// [`CrawlError::TraversalDepthExceeded`] from tree expansion, and
    /// [`CrawlError::SemaphoreClosed`] if the semaphore is closed.
    ///
    /// Individual leaf failures do NOT cause this method to error.
    #[instrument(skip(self), fields(concurrency = self.concurrency))]
    pub async fn run_with_stats(
        &self,
        root: &str,
    ) -> Result<(CrawlResult, CrawlStats), CrawlError> {
        info!("starting crawl");

        let targets = self.walker.expand(root).await?;
        let stats = Arc::new(CrawlStats::new());
        stats.set_discovered(targets.len());

        if targets.is_empty() {
            info!("no matching files, returning empty histogram");
            return Ok((CrawlResult::empty(), stats.snapshot()));
        }

        let aggregator = Arc::new(FrequencyAggregator::new());
        let mut units = JoinSet::new();

        for target in targets {
            let permit = self
                .semaphore
                .clone()
                .acquire_owned()
                .await
                .map_err(|_| CrawlError::SemaphoreClosed)?;

            let content = Arc::clone(&self.content);
            let retry_policy = self.retry_policy.clone();
            let aggregator = Arc::clone(&aggregator);
            let stats = Arc::clone(&stats);

            units.spawn(async move {
                let _permit = permit;
                process_leaf(content.as_ref(), &target, &retry_policy, &aggregator, &stats).await;
            });
        }

        debug!(unit_count = units.len(), "waiting for units to complete");

        while let Some(joined) = units.join_next().await {
            if let Err(e) = joined {
                warn!(error = %e, "crawl unit panicked");
                stats.increment_failed();
            }
        }

        let totals = match Arc::try_unwrap(aggregator) {
            Ok(aggregator) => aggregator.into_totals(),
            Err(shared) => shared.snapshot(),
        };
        let result = totals.into_sorted();

        info!(
            discovered = stats.discovered(),
            completed = stats.completed(),
            failed = stats.failed(),
            retried = stats.retried(),
            letters = result.len(),
            total = result.total(),
            "crawl complete"
        );

        Ok((result, stats.snapshot()))
    }
}

/// Fetches one leaf, counts its letters and merges them into the crawl total.
#[instrument(skip_all, fields(name = %target.name, address = %target.address))]
async fn process_leaf(
    content: &dyn ContentSource,
    target: &LeafTarget,
    retry_policy: &RetryPolicy,
    aggregator: &FrequencyAggregator,
    stats: &CrawlStats,
) {
    let address = target.address.as_str();
    let outcome = retry_fetch(retry_policy, address, || content.fetch_content(address)).await;

    match outcome {
        Ok((body, attempts)) => {
            stats.add_retried(attempts.saturating_sub(1) as usize);
            let local = tokenize(&body);
            debug!(
                bytes = body.len(),
                letters = local.total(),
                "counted letters"
            );
            aggregator.merge(&local);
            stats.increment_completed();
        }
        Err((e, attempts)) => {
            stats.add_retried(attempts.saturating_sub(1) as usize);
            let error = CrawlError::fetch_failed(address, e);
            warn!(attempts, error = %error, "dropping leaf after failed fetch");
            stats.increment_failed();
        }
    }
}
