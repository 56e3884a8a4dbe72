//! In-memory benchmark store for tests

use crate::error::StorageError;
use crate::{BenchmarkStore, TimeRange};
use async_trait::async_trait;
use searchbench_core::benchmark::BenchmarkEntry;
use searchbench_core::config::Environment;
use searchbench_core::Error;
use std::sync::atomic::{AtomicBool, Ordering};
use tokio::sync::RwLock;

/// Benchmark store keeping entries in a vector
#[derive(Debug, Default)]
pub struct InMemoryBenchmarkStore {
    entries: RwLock<Vec<BenchmarkEntry>>,
    fail_writes: AtomicBool,
    fail_reads: AtomicBool,
}

impl InMemoryBenchmarkStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with history
    pub fn with_entries(entries: Vec<BenchmarkEntry>) -> Self {
        Self {
            entries: RwLock::new(entries),
            fail_writes: AtomicBool::new(false),
            fail_reads: AtomicBool::new(false),
        }
    }

    /// Make every subsequent append fail with a store write error
    pub fn fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Make every subsequent history read fail with a store error
    pub fn fail_reads(&self, fail: bool) {
        self.fail_reads.store(fail, Ordering::SeqCst);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl BenchmarkStore for InMemoryBenchmarkStore {
    async fn append(&self, entry: &BenchmarkEntry) -> Result<(), Error> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StorageError::WriteFailed("store is read-only".to_string()).into());
        }
        self.entries.write().await.push(entry.clone());
        Ok(())
    }

    async fn entries(
        &self,
        environment: Environment,
        range: TimeRange,
    ) -> Result<Vec<BenchmarkEntry>, Error> {
        if self.fail_reads.load(Ordering::SeqCst) {
            return Err(StorageError::ReadFailed("store is unreachable".to_string()).into());
        }
        let mut entries: Vec<BenchmarkEntry> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|e| e.environment == environment && range.contains(e.timestamp))
            .cloned()
            .collect();
        entries.sort_by_key(|entry| entry.timestamp);
        Ok(entries)
    }
}
