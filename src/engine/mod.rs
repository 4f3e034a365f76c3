//! Query engine abstraction
//!
//! An engine receives the batch of rendered queries produced by one sample and is
//! responsible for doing something with it: sending it to a database, printing it,
//! or recording it. SQLPulse itself never talks to a database; the `QueryEngine`
//! trait is the seam where an executor plugs in.
//!
//! # Engine Types
//!
//! - **Stdout**: prints every batch (default preview mode)
//! - **Null**: discards batches, useful to measure the selection mix only
//! - **Mock**: records batches for tests
//!
//! # Example
//!
//! ```
//! use sqlpulse::engine::{QueryEngine, mock::MockEngine};
//!
//! let mut engine = MockEngine::new();
//! engine.execute(0, &["begin".to_string(), "commit".to_string()]).unwrap();
//! assert_eq!(engine.batches(), vec![vec!["begin".to_string(), "commit".to_string()]]);
//! ```

pub mod mock;

use crate::Result;
use std::io::Write;

/// Sink for rendered query batches
///
/// A batch is one logical unit of work: all queries of the selected entry, in
/// order. Engines must be `Send` so each worker thread can own one.
pub trait QueryEngine: Send {
    /// Handle one batch produced by worker `worker_id`
    fn execute(&mut self, worker_id: usize, queries: &[String]) -> Result<()>;

    /// Flush any buffered output; called once when the worker finishes
    fn finish(&mut self) -> Result<()> {
        Ok(())
    }
}

/// Prints every batch to stdout, one query per line
#[derive(Debug, Default)]
pub struct StdoutEngine {
    buffer: Vec<u8>,
}

impl StdoutEngine {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Flush threshold for buffered stdout output
const STDOUT_FLUSH_BYTES: usize = 64 * 1024;

impl QueryEngine for StdoutEngine {
    fn execute(&mut self, worker_id: usize, queries: &[String]) -> Result<()> {
        for query in queries {
            writeln!(self.buffer, "[worker {}] {}", worker_id, query)?;
        }
        if self.buffer.len() >= STDOUT_FLUSH_BYTES {
            self.finish()?;
        }
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        let mut stdout = std::io::stdout().lock();
        stdout.write_all(&self.buffer)?;
        stdout.flush()?;
        self.buffer.clear();
        Ok(())
    }
}

/// Discards every batch
#[derive(Debug, Default, Clone, Copy)]
pub struct NullEngine;

impl QueryEngine for NullEngine {
    #[inline(always)]
    fn execute(&mut self, _worker_id: usize, _queries: &[String]) -> Result<()> {
        Ok(())
    }
}
