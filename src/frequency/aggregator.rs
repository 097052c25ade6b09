//! Per-crawl accumulation of local frequency maps.

use std::sync::{Mutex, MutexGuard, PoisonError};

use tracing::trace;

use super::FrequencyMap;

/// Owns the global histogram for one crawl.
///
/// Create one per crawl and share it with the crawl's units through an
/// `Arc`; it is never process-wide, so unrelated crawls cannot see each
/// other's counts. `merge` holds the lock only for the in-memory addition.
#[derive(Debug, Default)]
pub struct FrequencyAggregator {
    totals: Mutex<FrequencyMap>,
}

impl FrequencyAggregator {
    /// Creates an aggregator with an empty total.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds every count in `local` to the global total.
    pub fn merge(&self, local: &FrequencyMap) {
        let mut totals = self.lock();
        totals.add_all(local);
        trace!(
            merged_letters = local.len(),
            merged_total = local.total(),
            "merged local frequency map"
        );
    }

    /// Point-in-time copy of the global total.
    ///
    /// Only meaningful once every merge for the crawl has been awaited.
    #[must_use]
    pub fn snapshot(&self) -> FrequencyMap {
        self.lock().clone()
    }

    /// Consumes the aggregator and returns the global total.
    #[must_use]
    pub fn into_totals(self) -> FrequencyMap {
        self.totals
            .into_inner()
            .unwrap_or_else(PoisonError::into_inner)
    }

    // A panic while merging leaves the map consistent: `add_all` only ever
    // adds whole counts, so a poisoned lock is still safe to read.
    fn lock(&self) -> MutexGuard<'_, FrequencyMap> {
        self.totals.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
