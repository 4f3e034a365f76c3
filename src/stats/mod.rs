//! Selection statistics
//!
//! Counts how often each matcher of a distribution index was selected, so a run
//! can report the observed query mix next to the configured one. Each worker owns
//! its own `SelectionStats`; results are merged once the workers finish.
//!
//! # Example
//!
//! ```
//! use sqlpulse::stats::SelectionStats;
//!
//! let mut a = SelectionStats::new(2);
//! a.record(0, 1);
//! let mut b = SelectionStats::new(2);
//! b.record(1, 3);
//! b.record(1, 3);
//!
//! a.merge(&b);
//! assert_eq!(a.samples(), 3);
//! assert_eq!(a.queries(), 7);
//! assert_eq!(a.hits(1), 2);
//! ```

use serde::Serialize;

/// Per-matcher selection counters
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SelectionStats {
    hits: Vec<u64>,
    samples: u64,
    queries: u64,
    errors: u64,
}

impl SelectionStats {
    /// Create counters for an index with `matchers` entries
    pub fn new(matchers: usize) -> Self {
        Self {
            hits: vec![0; matchers],
            ..Default::default()
        }
    }

    /// Record one sample of `matcher` that rendered `queries` queries
    #[inline]
    pub fn record(&mut self, matcher: usize, queries: usize) {
        if matcher >= self.hits.len() {
            self.hits.resize(matcher + 1, 0);
        }
        self.hits[matcher] += 1;
        self.samples += 1;
        self.queries += queries as u64;
    }

    /// Record a failed sample
    pub fn record_error(&mut self) {
        self.errors += 1;
    }

    /// Merge counters from another worker
    pub fn merge(&mut self, other: &SelectionStats) {
        if other.hits.len() > self.hits.len() {
            self.hits.resize(other.hits.len(), 0);
        }
        for (hits, other_hits) in self.hits.iter_mut().zip(&other.hits) {
            *hits += other_hits;
        }
        self.samples += other.samples;
        self.queries += other.queries;
        self.errors += other.errors;
    }

    /// Times `matcher` was selected
    pub fn hits(&self, matcher: usize) -> u64 {
        self.hits.get(matcher).copied().unwrap_or(0)
    }

    pub fn all_hits(&self) -> &[u64] {
        &self.hits
    }

    /// Total successful samples
    pub fn samples(&self) -> u64 {
        self.samples
    }

    /// Total rendered queries
    pub fn queries(&self) -> u64 {
        self.queries
    }

    pub fn errors(&self) -> u64 {
        self.errors
    }

    /// Observed share of `matcher` in percent (0.0 when nothing was sampled)
    pub fn observed_share(&self, matcher: usize) -> f64 {
        if self.samples == 0 {
            return 0.0;
        }
        self.hits(matcher) as f64 * 100.0 / self.samples as f64
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_and_share() {
        let mut stats = SelectionStats::new(3);
        stats.record(0, 1);
        stats.record(2, 2);
        stats.record(2, 2);
        stats.record(2, 2);

        assert_eq!(stats.samples(), 4);
        assert_eq!(stats.queries(), 7);
        assert_eq!(stats.hits(1), 0);
        assert_eq!(stats.observed_share(0), 25.0);
        assert_eq!(stats.observed_share(2), 75.0);
    }

    #[test]
    fn test_empty_share() {
        let stats = SelectionStats::new(1);
        assert_eq!(stats.observed_share(0), 0.0);
        assert_eq!(stats.hits(5), 0);
    }

    #[test]
    fn test_merge_grows_hits() {
        let mut a = SelectionStats::new(1);
        a.record(0, 1);
        a.record_error();

        let mut b = SelectionStats::default();
        b.record(3, 1);

        a.merge(&b);
        assert_eq!(a.all_hits(), &[1, 0, 0, 1]);
        assert_eq!(a.errors(), 1);
        assert_eq!(a.samples(), 2);
    }
}
