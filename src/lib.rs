//! SQLPulse - Weighted SQL query selection for stress runs
//!
//! SQLPulse decides, on every iteration of a stress run, which SQL statement(s) to
//! execute and with which literal parameter values. A configuration of weighted
//! query entries is turned once into an immutable [`DistributionIndex`], which is
//! then sampled repeatedly (and concurrently) to produce ready-to-execute queries.
//!
//! # Architecture
//!
//! - **Configuration**: JSON or TOML query entries, query groups and parameter pools
//! - **Distribution index**: contiguous weighted ranges, built once, read-only afterwards
//! - **Sampler**: uniform pick over the total weight, one owned RNG per caller
//! - **Templates**: `:name` tokens substituted with a fresh random value per occurrence
//! - **Engines**: pluggable sink for rendered batches (stdout, null, mock)
//!
//! # Example
//!
//! ```
//! use sqlpulse::config::{Config, QueryEntry};
//! use sqlpulse::distribution::{DistributionIndex, sampler::Sampler};
//!
//! let config = Config {
//!     queries: vec![
//!         QueryEntry::direct(1, "select 1"),
//!         QueryEntry::direct(3, "select 2"),
//!     ],
//!     query_groups: vec![],
//! };
//!
//! let index = DistributionIndex::build(&config)?;
//! let mut sampler = Sampler::with_seed(&index, 7);
//! let queries = sampler.sample()?;
//! assert_eq!(queries.len(), 1);
//! # Ok::<(), anyhow::Error>(())
//! ```

pub mod config;
pub mod distribution;
pub mod engine;
pub mod error;
pub mod output;
pub mod query;
pub mod stats;
pub mod worker;

// Re-export commonly used types
pub use config::Config;
pub use distribution::DistributionIndex;
pub use engine::QueryEngine;
pub use error::{BuildError, SampleError};

/// Result type used throughout SQLPulse
pub type Result<T> = anyhow::Result<T>;
