//! Typed errors for index construction and sampling
//!
//! Construction errors abort the whole build: an index is either fully valid or
//! not returned at all. Sampling errors are defensive and only surface when the
//! range layout of an index is broken.

use crate::distribution::WeightedRange;
use thiserror::Error;

/// Configuration problems detected while building a distribution index
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    /// Entry has neither a direct query nor a group reference
    #[error("query entry {index} has neither a query nor a queryGroup")]
    MissingQuerySource { index: usize },

    /// Entry has both a direct query and a group reference
    #[error("query entry {index} sets both query and queryGroup ({group:?}); exactly one is allowed")]
    AmbiguousQuerySource { index: usize, group: String },

    /// Entry references a group name that is not configured
    #[error("query entry {index} references unknown query group {name:?}")]
    UnknownGroup { index: usize, name: String },

    /// Entry references a group that holds no queries
    #[error("query group {name:?} (referenced by query entry {index}) has no queries")]
    EmptyGroup { index: usize, name: String },

    /// Sum of all frequencies is zero, nothing can be sampled
    #[error("total query frequency is 0; at least one entry needs a positive frequency")]
    ZeroTotalFrequency,

    /// Sum of all frequencies does not fit in a u64
    #[error("total query frequency overflows at query entry {index}")]
    FrequencyOverflow { index: usize },
}

/// Failures while sampling an already built index
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SampleError {
    /// No weighted range contains the picked value
    #[error("no query matched pick {pick}; configured ranges: {}", format_ranges(.ranges))]
    NoMatchingRange {
        pick: u64,
        ranges: Vec<WeightedRange>,
    },
}

fn format_ranges(ranges: &[WeightedRange]) -> String {
    if ranges.is_empty() {
        return "none".to_string();
    }
    ranges
        .iter()
        .map(|r| r.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}
