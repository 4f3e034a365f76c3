//! Per-caller sampler
//!
//! A [`Sampler`] pairs a shared, read-only [`DistributionIndex`] with a random
//! source it owns. Each worker thread builds its own sampler, so sampling never
//! contends on shared state.
//!
//! # Performance
//!
//! Uses the xoshiro256++ PRNG by default, which is fast and has good statistical
//! properties. Any [`rand::Rng`] can be injected with [`Sampler::new`].
//!
//! # Example
//!
//! ```
//! use sqlpulse::config::{Config, QueryEntry};
//! use sqlpulse::distribution::{DistributionIndex, sampler::Sampler};
//!
//! let config = Config {
//!     queries: vec![QueryEntry::direct(1, "select :n").with_parameter("n", [1, 2, 3])],
//!     query_groups: vec![],
//! };
//! let index = DistributionIndex::build(&config).unwrap();
//!
//! let mut sampler = Sampler::with_seed(&index, 42);
//! for _ in 0..10 {
//!     let queries = sampler.sample().unwrap();
//!     assert!(["select 1", "select 2", "select 3"].contains(&queries[0].as_str()));
//! }
//! ```

use super::{DistributionIndex, QueryMatcher};
use crate::error::SampleError;
use rand::Rng;
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256PlusPlus;

/// Selected matcher together with its rendered queries
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    /// Value drawn in `[0, total_frequency)`
    pub pick: u64,
    /// Position of the selected matcher in the index
    pub matcher: usize,
    /// Rendered queries, in the matcher's order
    pub queries: Vec<String>,
}

/// Samples rendered queries from a shared index
pub struct Sampler<'a, R = Xoshiro256PlusPlus> {
    index: &'a DistributionIndex,
    rng: R,
}

impl<'a> Sampler<'a, Xoshiro256PlusPlus> {
    /// Create a sampler with a random seed
    pub fn from_entropy(index: &'a DistributionIndex) -> Self {
        Self::new(index, Xoshiro256PlusPlus::from_entropy())
    }

    /// Create a sampler with a specific seed
    ///
    /// Useful for reproducible runs and tests.
    pub fn with_seed(index: &'a DistributionIndex, seed: u64) -> Self {
        Self::new(index, Xoshiro256PlusPlus::seed_from_u64(seed))
    }
}

impl<'a, R: Rng> Sampler<'a, R> {
    /// Create a sampler with an explicit random source
    pub fn new(index: &'a DistributionIndex, rng: R) -> Self {
        Self { index, rng }
    }

    pub fn index(&self) -> &'a DistributionIndex {
        self.index
    }

    /// Pick a matcher and render its queries
    pub fn sample(&mut self) -> Result<Vec<String>, SampleError> {
        self.index.sample(&mut self.rng)
    }

    /// Like [`Sampler::sample`], also reporting which matcher was selected
    pub fn sample_detailed(&mut self) -> Result<Sample, SampleError> {
        let pick = self.index.pick(&mut self.rng);
        let matcher = self.index.position(pick).ok_or_else(|| SampleError::NoMatchingRange {
            pick,
            ranges: self.index.ranges(),
        })?;
        let queries = self.index.matchers()[matcher].render(&mut self.rng);

        Ok(Sample { pick, matcher, queries })
    }

    /// Pick a matcher without rendering
    pub fn select(&mut self) -> Result<&'a QueryMatcher, SampleError> {
        let pick = self.index.pick(&mut self.rng);
        self.index.find(pick)
    }
}
