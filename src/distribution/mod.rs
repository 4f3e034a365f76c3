//! Weighted query distribution
//!
//! This module turns a [`Config`] into a [`DistributionIndex`]: an ordered list of
//! query matchers, each owning a half-open range of integers. Sampling draws a
//! uniform integer in `[0, total_frequency)` and executes the matcher whose range
//! contains it, so every entry is picked with probability `frequency / total`.
//!
//! # Range Layout
//!
//! Ranges are assigned in configuration order from a running total:
//!
//! ```text
//! entries:   A (freq 1)   B (freq 3)       C (freq 0)   D (freq 2)
//! ranges:    [0, 1)       [1, 4)           [4, 4)       [4, 6)
//! ```
//!
//! They are contiguous, ascending and never overlap; entries with frequency 0 get
//! an empty range and are never selected.
//!
//! # Example
//!
//! ```
//! use sqlpulse::config::{Config, QueryEntry};
//! use sqlpulse::distribution::{DistributionIndex, WeightedRange};
//!
//! let config = Config {
//!     queries: vec![QueryEntry::direct(1, "A"), QueryEntry::direct(3, "B")],
//!     query_groups: vec![],
//! };
//! let index = DistributionIndex::build(&config).unwrap();
//!
//! assert_eq!(index.total_frequency(), 4);
//! assert_eq!(index.ranges(), vec![WeightedRange::new(0, 1), WeightedRange::new(1, 4)]);
//! ```

pub mod sampler;

use crate::config::{Config, ParameterPool};
use crate::error::{BuildError, SampleError};
use crate::query::{render::render, Template};
use rand::Rng;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Half-open integer interval `[min, max)` owned by one query entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct WeightedRange {
    pub min: u64,
    pub max: u64,
}

impl WeightedRange {
    pub fn new(min: u64, max: u64) -> Self {
        Self { min, max }
    }

    /// Whether `pick` falls inside the range
    #[inline(always)]
    pub fn contains(&self, pick: u64) -> bool {
        pick >= self.min && pick < self.max
    }

    /// Number of picks owned by the range (the entry's frequency)
    pub fn width(&self) -> u64 {
        self.max - self.min
    }
}

impl fmt::Display for WeightedRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.min, self.max)
    }
}

/// A template together with the parameter pool used to render it
#[derive(Debug, Clone)]
pub struct ResolvedQuery {
    pub template: Template,
    pub parameters: Arc<ParameterPool>,
}

impl ResolvedQuery {
    /// Render the template with fresh random parameter values
    pub fn render<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        render(&self.template, &self.parameters, rng)
    }
}

/// A query entry after group references are expanded
#[derive(Debug, Clone)]
pub struct QueryMatcher {
    range: WeightedRange,
    queries: Vec<ResolvedQuery>,
    label: String,
}

impl QueryMatcher {
    pub fn range(&self) -> WeightedRange {
        self.range
    }

    /// Queries rendered together when this matcher is selected
    pub fn queries(&self) -> &[ResolvedQuery] {
        &self.queries
    }

    /// Human-readable source of the matcher (query text or `group:<name>`)
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Render every query of the matcher, preserving their order
    pub fn render<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<String> {
        self.queries.iter().map(|q| q.render(rng)).collect()
    }
}

/// Immutable weighted index over all configured query entries
///
/// Built once at startup and shared read-only between samplers. Each caller
/// brings its own random source, so concurrent sampling needs no locking.
#[derive(Debug, Clone)]
pub struct DistributionIndex {
    matchers: Vec<QueryMatcher>,
    total_frequency: u64,
}

impl DistributionIndex {
    /// Build the index from a configuration
    ///
    /// Construction is all-or-nothing: the first malformed entry aborts the
    /// build and no index is returned.
    ///
    /// # Errors
    ///
    /// - [`BuildError::MissingQuerySource`]: entry has neither `query` nor `queryGroup`
    /// - [`BuildError::AmbiguousQuerySource`]: entry has both
    /// - [`BuildError::UnknownGroup`]: referenced group is not configured
    /// - [`BuildError::EmptyGroup`]: referenced group has no queries
    /// - [`BuildError::ZeroTotalFrequency`]: frequencies sum to 0
    /// - [`BuildError::FrequencyOverflow`]: frequencies overflow `u64`
    pub fn build(config: &Config) -> Result<Self, BuildError> {
        let mut matchers = Vec::with_capacity(config.queries.len());
        let mut running: u64 = 0;

        for (index, entry) in config.queries.iter().enumerate() {
            let min = running;
            running = running
                .checked_add(entry.frequency)
                .ok_or(BuildError::FrequencyOverflow { index })?;
            let range = WeightedRange::new(min, running);

            let parameters = Arc::new(entry.parameters.clone().unwrap_or_default());

            let (label, texts) = match (entry.query_text(), entry.group_name()) {
                (Some(query), None) => (query.to_string(), vec![query]),
                (None, Some(name)) => (format!("group:{}", name), resolve_group(config, index, name)?),
                (Some(_), Some(name)) => {
                    return Err(BuildError::AmbiguousQuerySource {
                        index,
                        group: name.to_string(),
                    })
                }
                (None, None) => return Err(BuildError::MissingQuerySource { index }),
            };

            let queries = texts
                .into_iter()
                .map(|text| ResolvedQuery {
                    template: Template::new(text),
                    parameters: Arc::clone(&parameters),
                })
                .collect::<Vec<_>>();

            tracing::debug!(
                entry = index,
                range = %range,
                queries = queries.len(),
                "resolved query entry {}",
                label
            );

            matchers.push(QueryMatcher { range, queries, label });
        }

        if running == 0 {
            return Err(BuildError::ZeroTotalFrequency);
        }

        tracing::info!(
            entries = matchers.len(),
            total_frequency = running,
            "built query distribution"
        );

        Ok(Self {
            matchers,
            total_frequency: running,
        })
    }

    /// Sum of all configured frequencies
    pub fn total_frequency(&self) -> u64 {
        self.total_frequency
    }

    /// Matchers in configuration order
    pub fn matchers(&self) -> &[QueryMatcher] {
        &self.matchers
    }

    /// Ranges of all matchers in configuration order
    pub fn ranges(&self) -> Vec<WeightedRange> {
        self.matchers.iter().map(|m| m.range).collect()
    }

    /// Position of the first matcher whose range contains `pick`
    ///
    /// Linear scan; entry counts are configuration-sized.
    pub fn position(&self, pick: u64) -> Option<usize> {
        self.matchers.iter().position(|m| m.range.contains(pick))
    }

    /// Matcher owning `pick`
    pub fn find(&self, pick: u64) -> Result<&QueryMatcher, SampleError> {
        self.position(pick)
            .map(|i| &self.matchers[i])
            .ok_or_else(|| SampleError::NoMatchingRange {
                pick,
                ranges: self.ranges(),
            })
    }

    /// Uniform pick in `[0, total_frequency)`
    pub fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> u64 {
        rng.gen_range(0..self.total_frequency)
    }

    /// Select a matcher at random and render its queries
    pub fn sample<R: Rng + ?Sized>(&self, rng: &mut R) -> Result<Vec<String>, SampleError> {
        let pick = self.pick(rng);
        self.sample_at(pick, rng)
    }

    /// Render the queries of the matcher owning `pick`
    pub fn sample_at<R: Rng + ?Sized>(&self, pick: u64, rng: &mut R) -> Result<Vec<String>, SampleError> {
        Ok(self.find(pick)?.render(rng))
    }
}

/// Collect the queries of every group named `name`, in configuration order
fn resolve_group<'a>(config: &'a Config, index: usize, name: &str) -> Result<Vec<&'a str>, BuildError> {
    let texts = config.group_queries(name).ok_or_else(|| BuildError::UnknownGroup {
        index,
        name: name.to_string(),
    })?;

    if texts.is_empty() {
        return Err(BuildError::EmptyGroup {
            index,
            name: name.to_string(),
        });
    }

    Ok(texts)
}
