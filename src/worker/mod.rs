//! Worker threads
//!
//! A [`Worker`] repeatedly samples the shared distribution index and hands each
//! rendered batch to its own [`QueryEngine`], counting selections as it goes.
//! [`run_workers`] runs one worker per thread over the same index and merges
//! their statistics.
//!
//! # Seeding
//!
//! With a base seed, worker `n` uses `seed + n`, so a multi-threaded run is
//! reproducible per worker. Without one, every worker seeds from entropy.
//!
//! # Example
//!
//! ```
//! use sqlpulse::config::{Config, QueryEntry};
//! use sqlpulse::distribution::DistributionIndex;
//! use sqlpulse::engine::NullEngine;
//! use sqlpulse::worker::{run_workers, RunConfig};
//!
//! let config = Config {
//!     queries: vec![QueryEntry::direct(1, "select 1"), QueryEntry::direct(1, "select 2")],
//!     query_groups: vec![],
//! };
//! let index = DistributionIndex::build(&config)?;
//!
//! let run = RunConfig { threads: 4, iterations: 100, seed: Some(7), continue_on_error: false };
//! let stats = run_workers(&index, &run, |_| NullEngine)?;
//! assert_eq!(stats.samples(), 400);
//! # Ok::<(), anyhow::Error>(())
//! ```

use crate::distribution::{sampler::Sampler, DistributionIndex};
use crate::engine::QueryEngine;
use crate::stats::SelectionStats;
use crate::Result;
use anyhow::Context;

/// How a run is executed
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunConfig {
    /// Number of worker threads
    pub threads: usize,
    /// Samples per worker
    pub iterations: u64,
    /// Base seed for reproducible runs
    pub seed: Option<u64>,
    /// Count engine failures instead of aborting the worker
    pub continue_on_error: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            threads: 1,
            iterations: 10,
            seed: None,
            continue_on_error: false,
        }
    }
}

/// Single sampling loop bound to one engine
pub struct Worker<'a, E: QueryEngine> {
    id: usize,
    sampler: Sampler<'a>,
    engine: E,
    stats: SelectionStats,
    continue_on_error: bool,
}

impl<'a, E: QueryEngine> Worker<'a, E> {
    /// Create a worker; `seed` is used as-is when given
    pub fn new(id: usize, index: &'a DistributionIndex, engine: E, seed: Option<u64>) -> Self {
        let sampler = match seed {
            Some(seed) => Sampler::with_seed(index, seed),
            None => Sampler::from_entropy(index),
        };

        Self {
            id,
            sampler,
            engine,
            stats: SelectionStats::new(index.matchers().len()),
            continue_on_error: false,
        }
    }

    /// Keep going when the engine rejects a batch
    pub fn set_continue_on_error(&mut self, continue_on_error: bool) {
        self.continue_on_error = continue_on_error;
    }

    /// Run `iterations` samples and return the collected statistics
    ///
    /// Sampling errors always abort: they mean the index itself is broken.
    /// The engine is finished on every exit path, so buffered output is flushed
    /// even when the run aborts.
    pub fn run(&mut self, iterations: u64) -> Result<SelectionStats> {
        tracing::debug!(worker = self.id, iterations, "worker starting");

        if let Err(e) = self.run_iterations(iterations) {
            if let Err(finish_err) = self.engine.finish() {
                tracing::warn!(worker = self.id, error = %finish_err, "engine finish failed after abort");
            }
            return Err(e);
        }

        self.engine.finish()?;
        tracing::debug!(worker = self.id, samples = self.stats.samples(), "worker finished");

        Ok(self.stats.clone())
    }

    fn run_iterations(&mut self, iterations: u64) -> Result<()> {
        for _ in 0..iterations {
            let sample = self
                .sampler
                .sample_detailed()
                .with_context(|| format!("worker {} failed to sample", self.id))?;

            match self.engine.execute(self.id, &sample.queries) {
                Ok(()) => self.stats.record(sample.matcher, sample.queries.len()),
                Err(e) if self.continue_on_error => {
                    tracing::warn!(worker = self.id, error = %e, "query batch failed");
                    self.stats.record_error();
                }
                Err(e) => {
                    return Err(e.context(format!("worker {} query batch failed", self.id)));
                }
            }
        }

        Ok(())
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    pub fn stats(&self) -> &SelectionStats {
        &self.stats
    }

    pub fn into_engine(self) -> E {
        self.engine
    }
}

/// Run `config.threads` workers over one shared index and merge their stats
///
/// `make_engine` is called once per worker with the worker id.
pub fn run_workers<E, F>(index: &DistributionIndex, config: &RunConfig, make_engine: F) -> Result<SelectionStats>
where
    E: QueryEngine,
    F: Fn(usize) -> E + Sync,
{
    if config.threads == 0 {
        anyhow::bail!("threads must be at least 1");
    }

    tracing::info!(
        threads = config.threads,
        iterations = config.iterations,
        seed = ?config.seed,
        "starting workers"
    );

    let make_engine = &make_engine;
    let results: Vec<Result<SelectionStats>> = std::thread::scope(|scope| {
        let handles: Vec<_> = (0..config.threads)
            .map(|id| {
                scope.spawn(move || {
                    let seed = config.seed.map(|s| s.wrapping_add(id as u64));
                    let mut worker = Worker::new(id, index, make_engine(id), seed);
                    worker.set_continue_on_error(config.continue_on_error);
                    worker.run(config.iterations)
                })
            })
            .collect();

        handles
            .into_iter()
            .enumerate()
            .map(|(id, handle)| {
                handle
                    .join()
                    .unwrap_or_else(|_| Err(anyhow::anyhow!("worker {} panicked", id)))
            })
            .collect()
    });

    let mut total = SelectionStats::new(index.matchers().len());
    for result in results {
        total.merge(&result?);
    }

    Ok(total)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, QueryEntry, QueryGroup};
    use crate::engine::mock::MockEngine;
    use crate::engine::NullEngine;

    fn index() -> DistributionIndex {
        DistributionIndex::build(&Config {
            queries: vec![
                QueryEntry::direct(1, "select * from t where id = :id").with_parameter("id", [1, 2]),
                QueryEntry::group(1, "txn"),
            ],
            query_groups: vec![QueryGroup::new("txn", ["begin", "commit"])],
        })
        .unwrap()
    }

    #[test]
    fn test_worker_sends_every_sample_to_engine() {
        let index = index();
        let engine = MockEngine::new();
        let mut worker = Worker::new(5, &index, engine.clone(), Some(1));

        let stats = worker.run(50).unwrap();
        assert_eq!(stats.samples(), 50);
        assert_eq!(engine.batch_count(), 50);
        assert_eq!(engine.finish_count(), 1);
        assert_eq!(stats.queries(), engine.batches().iter().map(|b| b.len() as u64).sum::<u64>());

        for record in engine.records() {
            assert_eq!(record.worker_id, 5);
            assert!(
                record.queries == vec!["begin", "commit"]
                    || record.queries == vec!["select * from t where id = 1"]
                    || record.queries == vec!["select * from t where id = 2"],
                "unexpected batch {:?}",
                record.queries
            );
        }
    }

    #[test]
    fn test_worker_seeded_runs_match() {
        let index = index();
        let a = MockEngine::new();
        let b = MockEngine::new();
        Worker::new(0, &index, a.clone(), Some(77)).run(30).unwrap();
        Worker::new(0, &index, b.clone(), Some(77)).run(30).unwrap();
        assert_eq!(a.batches(), b.batches());
    }

    #[test]
    fn test_worker_engine_failure_aborts() {
        let index = index();
        let engine = MockEngine::new();
        engine.set_fail_at(Some(3));

        let err = Worker::new(2, &index, engine.clone(), Some(1)).run(10).unwrap_err();
        assert!(format!("{:#}", err).contains("worker 2 query batch failed"));
        assert_eq!(engine.batch_count(), 3);
    }

    #[test]
    fn test_worker_finishes_engine_when_aborting() {
        let index = index();
        let engine = MockEngine::new();
        engine.set_fail_at(Some(0));

        let mut worker = Worker::new(0, &index, engine.clone(), Some(1));
        assert!(worker.run(10).is_err());
        assert_eq!(engine.batch_count(), 0);
        assert_eq!(engine.finish_count(), 1);
    }

    #[test]
    fn test_worker_continue_on_error_counts_failures() {
        let index = index();
        let engine = MockEngine::new();
        engine.set_fail_at(Some(3));

        let mut worker = Worker::new(0, &index, engine.clone(), Some(1));
        worker.set_continue_on_error(true);
        let stats = worker.run(10).unwrap();

        assert_eq!(stats.errors(), 1);
        assert_eq!(stats.samples(), 9);
        assert_eq!(engine.batch_count(), 9);
        assert_eq!(engine.finish_count(), 1);
    }

    #[test]
    fn test_run_workers_merges_stats() {
        let index = index();
        let config = RunConfig {
            threads: 3,
            iterations: 200,
            seed: Some(11),
            continue_on_error: false,
        };

        let stats = run_workers(&index, &config, |_| NullEngine).unwrap();
        assert_eq!(stats.samples(), 600);
        assert_eq!(stats.hits(0) + stats.hits(1), 600);
        assert!(stats.hits(0) > 0 && stats.hits(1) > 0);
    }

    #[test]
    fn test_run_workers_is_reproducible_with_seed() {
        let index = index();
        let config = RunConfig {
            threads: 2,
            iterations: 100,
            seed: Some(3),
            continue_on_error: false,
        };

        let first = run_workers(&index, &config, |_| NullEngine).unwrap();
        let second = run_workers(&index, &config, |_| NullEngine).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_run_workers_propagates_engine_error() {
        let index = index();
        let config = RunConfig {
            threads: 2,
            iterations: 5,
            seed: Some(1),
            continue_on_error: false,
        };

        let result = run_workers(&index, &config, |id| {
            let engine = MockEngine::new();
            if id == 1 {
                engine.set_fail_at(Some(0));
            }
            engine
        });
        assert!(result.is_err());
    }

    #[test]
    fn test_run_workers_rejects_zero_threads() {
        let index = index();
        let config = RunConfig {
            threads: 0,
            ..Default::default()
        };
        assert!(run_workers(&index, &config, |_| NullEngine).is_err());
    }
}
