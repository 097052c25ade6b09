//! Letter-frequency histograms.
//!
//! - [`tokenize`] turns one file's bytes into a local [`FrequencyMap`]
//! - [`FrequencyAggregator`] merges local maps into the per-crawl total
//! - [`CrawlResult`] is the total sorted by descending count

mod aggregator;
mod tokenizer;

pub use aggregator::FrequencyAggregator;
pub use tokenizer::{fold_case, is_letter, tokenize};

use std::collections::BTreeMap;

use serde::ser::{Serialize, SerializeMap, Serializer};

/// Mapping from case-folded letter to occurrence count.
///
/// Iteration order is ascending by character, which is the tie order kept by
/// [`FrequencyMap::into_sorted`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FrequencyMap {
    counts: BTreeMap<char, u64>,
}

impl FrequencyMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn add(&mut self, letter: char, count: u64) {
        if count == 0 {
            return;
        }
        *self.counts.entry(letter).or_insert(0) += count;
    }

    pub(crate) fn add_all(&mut self, other: &Self) {
        for (letter, count) in other.iter() {
            self.add(letter, count);
        }
    }

    /// Count for `letter` (0 when absent).
    #[must_use]
    pub fn get(&self, letter: char) -> u64 {
        self.counts.get(&letter).copied().unwrap_or(0)
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.counts.values().sum()
    }

    /// Number of distinct letters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.counts.len()
    }

    /// Returns true when no letter has been counted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.counts.is_empty()
    }

    /// Iterates `(letter, count)` pairs in map order.
    pub fn iter(&self) -> impl Iterator<Item = (char, u64)> + '_ {
        self.counts.iter().map(|(letter, count)| (*letter, *count))
    }

    /// Sorts by descending count. The sort is stable, so ties keep map order.
    #[must_use]
    pub fn into_sorted(self) -> CrawlResult {
        let mut entries: Vec<(char, u64)> = self.counts.into_iter().collect();
        entries.sort_by(|a, b| b.1.cmp(&a.1));
        CrawlResult { entries }
    }
}

impl FromIterator<(char, u64)> for FrequencyMap {
    fn from_iter<I: IntoIterator<Item = (char, u64)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (letter, count) in iter {
            map.add(letter, count);
        }
        map
    }
}

/// Final histogram of a crawl, ordered by descending count.
///
/// Serializes as a JSON object whose key order follows the result order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CrawlResult {
    entries: Vec<(char, u64)>,
}

impl CrawlResult {
    /// An empty result (no matching files, or no letters in them).
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// The ordered `(letter, count)` pairs.
    #[must_use]
    pub fn entries(&self) -> &[(char, u64)] {
        &self.entries
    }

    /// Count for `letter` (0 when absent).
    #[must_use]
    pub fn get(&self, letter: char) -> u64 {
        self.entries
            .iter()
            .find(|(c, _)| *c == letter)
            .map_or(0, |(_, count)| *count)
    }

    /// Sum of all counts.
    #[must_use]
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    /// Number of distinct letters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true when the histogram has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Consumes the result into its ordered pairs.
    #[must_use]
    pub fn into_entries(self) -> Vec<(char, u64)> {
        self.entries
    }
}

impl Serialize for CrawlResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (letter, count) in &self.entries {
            map.serialize_entry(letter, count)?;
        }
        map.end()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_into_sorted_orders_by_descending_count() {
        let map: FrequencyMap = [('a', 1), ('b', 5), ('c', 3)].into_iter().collect();
        let result = map.into_sorted();
        assert_eq!(result.entries(), &[('b', 5), ('c', 3), ('a', 1)]);
    }

    #[test]
    fn test_into_sorted_is_non_increasing_with_ties() {
        let map: FrequencyMap = [('z', 2), ('a', 2), ('m', 7), ('q', 1)]
            .into_iter()
            .collect();
        let result = map.into_sorted();
        assert!(result.entries().windows(2).all(|w| w[0].1 >= w[1].1));
        assert_eq!(result.total(), 12);
    }

    #[test]
    fn test_zero_counts_are_not_stored() {
        let map: FrequencyMap = [('a', 0), ('b', 1)].into_iter().collect();
        assert_eq!(map.len(), 1);
        assert_eq!(map.get('a'), 0);
    }

    #[test]
    fn test_from_iter_sums_repeated_letters() {
        let map: FrequencyMap = [('a', 1), ('a', 2)].into_iter().collect();
        assert_eq!(map.get('a'), 3);
        assert_eq!(map.total(), 3);
    }

    #[test]
    fn test_crawl_result_serializes_in_result_order() {
        let map: FrequencyMap = [('a', 1), ('z', 9), ('é', 4)].into_iter().collect();
        let json = serde_json::to_string(&map.into_sorted()).unwrap();
        assert_eq!(json, r#"{"z":9,"é":4,"a":1}"#);
    }

    #[test]
    fn test_empty_result_serializes_as_empty_object() {
        let json = serde_json::to_string(&CrawlResult::empty()).unwrap();
        assert_eq!(json, "{}");
    }
}
