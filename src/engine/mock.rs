//! Mock query engine for testing
//!
//! Records every batch it receives and can be switched into a failing mode to
//! exercise error propagation in workers. Clones share their recorded state, so a
//! test can keep a handle while a worker owns the engine.

use super::QueryEngine;
use crate::Result;
use std::sync::{Arc, Mutex};

/// Record of a received batch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchRecord {
    pub worker_id: usize,
    pub queries: Vec<String>,
}

/// Mock query engine for testing
#[derive(Clone, Default)]
pub struct MockEngine {
    /// Every batch received, in order
    received: Arc<Mutex<Vec<BatchRecord>>>,

    /// Fail on the batch with this (zero-based) position
    fail_at: Arc<Mutex<Option<usize>>>,

    /// Number of execute() calls, failed ones included
    calls: Arc<Mutex<usize>>,

    /// Number of finish() calls
    finished: Arc<Mutex<usize>>,
}

impl MockEngine {
    /// Create a new mock engine that accepts every batch
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail the `n`th batch (zero-based) instead of recording it
    pub fn set_fail_at(&self, n: Option<usize>) {
        *self.fail_at.lock().unwrap() = n;
    }

    /// All recorded batches
    pub fn records(&self) -> Vec<BatchRecord> {
        self.received.lock().unwrap().clone()
    }

    /// Queries of all recorded batches
    pub fn batches(&self) -> Vec<Vec<String>> {
        self.records().into_iter().map(|r| r.queries).collect()
    }

    pub fn batch_count(&self) -> usize {
        self.received.lock().unwrap().len()
    }

    pub fn finish_count(&self) -> usize {
        *self.finished.lock().unwrap()
    }
}

impl QueryEngine for MockEngine {
    fn execute(&mut self, worker_id: usize, queries: &[String]) -> Result<()> {
        let call = {
            let mut calls = self.calls.lock().unwrap();
            *calls += 1;
            *calls - 1
        };
        if *self.fail_at.lock().unwrap() == Some(call) {
            anyhow::bail!("mock engine failure at batch {}", call);
        }
        self.received.lock().unwrap().push(BatchRecord {
            worker_id,
            queries: queries.to_vec(),
        });
        Ok(())
    }

    fn finish(&mut self) -> Result<()> {
        *self.finished.lock().unwrap() += 1;
        Ok(())
    }
}
