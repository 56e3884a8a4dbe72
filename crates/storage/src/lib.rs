//! Benchmark history storage and trend analysis
//!
//! Runs are appended to an ordered-by-time log that is never rewritten; the
//! trend analyzer compares each new run with the trailing window of that log.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod error;
mod git;
mod jsonl;
mod memory;
mod trend;

pub use error::StorageError;
pub use git::current_commit;
pub use jsonl::JsonlBenchmarkStore;
pub use memory::InMemoryBenchmarkStore;
pub use trend::TrendAnalyzer;

use async_trait::async_trait;
use chrono::{DateTime, Duration, Utc};
use searchbench_core::benchmark::BenchmarkEntry;
use searchbench_core::config::{Environment, StorageConfig};
use searchbench_core::Error;
use std::sync::Arc;
use tracing::info;

/// Inclusive time interval for history queries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TimeRange {
    pub start: DateTime<Utc>,
    pub end: DateTime<Utc>,
}

impl TimeRange {
    pub fn new(start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self { start, end }
    }

    /// The `days` calendar days ending at `end`
    pub fn trailing_days(end: DateTime<Utc>, days: u32) -> Self {
        Self {
            start: end - Duration::days(i64::from(days)),
            end,
        }
    }

    pub fn contains(&self, timestamp: DateTime<Utc>) -> bool {
        timestamp >= self.start && timestamp <= self.end
    }
}

/// Append-only benchmark history
#[async_trait]
pub trait BenchmarkStore: Send + Sync {
    /// Append one entry; entries are never mutated or removed afterwards
    async fn append(&self, entry: &BenchmarkEntry) -> Result<(), Error>;

    /// Entries for an environment within a time range, oldest first
    async fn entries(
        &self,
        environment: Environment,
        range: TimeRange,
    ) -> Result<Vec<BenchmarkEntry>, Error>;
}

/// Open the JSON Lines store named in the configuration
///
/// Fails with a store error when the location cannot be created or written.
pub fn create_benchmark_store(config: &StorageConfig) -> Result<Arc<dyn BenchmarkStore>, Error> {
    let path = config.benchmark_path();
    let store = JsonlBenchmarkStore::open(&path)?;
    info!("Benchmark history: {}", path.display());
    Ok(Arc::new(store))
}
