//! Run reporting
//!
//! Builds a [`RunSummary`] that pairs every entry of the distribution index with
//! its configured and observed share, and renders it as text or JSON.

pub mod json;
pub mod text;

use crate::distribution::{DistributionIndex, WeightedRange};
use crate::stats::SelectionStats;
use serde::Serialize;
use std::time::Duration;

/// Configured vs observed selection of one entry
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntrySummary {
    pub label: String,
    pub range: WeightedRange,
    pub queries_per_sample: usize,
    /// Configured share in percent
    pub expected_share: f64,
    pub hits: u64,
    /// Observed share in percent
    pub observed_share: f64,
}

/// Summary of a complete run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RunSummary {
    pub total_frequency: u64,
    pub samples: u64,
    pub queries: u64,
    pub errors: u64,
    pub elapsed_secs: f64,
    pub entries: Vec<EntrySummary>,
}

impl RunSummary {
    pub fn new(index: &DistributionIndex, stats: &SelectionStats, elapsed: Duration) -> Self {
        let total = index.total_frequency() as f64;
        let entries = index
            .matchers()
            .iter()
            .enumerate()
            .map(|(i, matcher)| EntrySummary {
                label: matcher.label().to_string(),
                range: matcher.range(),
                queries_per_sample: matcher.queries().len(),
                expected_share: matcher.range().width() as f64 * 100.0 / total,
                hits: stats.hits(i),
                observed_share: stats.observed_share(i),
            })
            .collect();

        Self {
            total_frequency: index.total_frequency(),
            samples: stats.samples(),
            queries: stats.queries(),
            errors: stats.errors(),
            elapsed_secs: elapsed.as_secs_f64(),
            entries,
        }
    }
}
