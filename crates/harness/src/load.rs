//! Concurrent load burst against the search service
//!
//! `N` simultaneous searches are spawned as independent tasks and joined as they
//! finish. Each call has its own timeout. Once the burst deadline passes a
//! cancellation token is fired and stragglers are recorded as abandoned.

use crate::memory::{memory_delta, resident_set_bytes};
use crate::stats::{max, mean, percentile};
use searchbench_core::config::EnvironmentProfile;
use searchbench_core::report::LoadSummary;
use searchbench_core::test_case::TestCase;
use searchbench_search_client::SearchClient;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// How one simulated call ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOutcome {
    Succeeded,
    Failed(String),
    TimedOut,
    Abandoned,
}

/// One simulated concurrent query
#[derive(Debug, Clone, PartialEq)]
pub struct LoadSample {
    pub latency: Duration,
    pub outcome: LoadOutcome,
    pub query: String,
}

/// Issues a burst of concurrent searches and reduces it to statistics
pub struct LoadHarness {
    client: Arc<dyn SearchClient>,
    call_timeout: Duration,
    deadline: Duration,
}

impl LoadHarness {
    pub fn new(client: Arc<dyn SearchClient>, call_timeout: Duration, deadline: Duration) -> Self {
        Self {
            client,
            call_timeout,
            deadline,
        }
    }

    /// Harness with the profile's per-call timeout and burst deadline
    pub fn from_profile(client: Arc<dyn SearchClient>, profile: &EnvironmentProfile) -> Self {
        Self::new(
            client,
            profile.load_call_timeout(),
            profile.load_harness_deadline(),
        )
    }

    /// Run `users` concurrent searches, drawing queries round-robin from `cases`
    pub async fn run(&self, cases: &[TestCase], users: usize) -> LoadSummary {
        if cases.is_empty() || users == 0 {
            return reduce(&[], users, Duration::ZERO, None);
        }

        info!(
            "Starting load burst: {users} concurrent users, call timeout {:?}, deadline {:?}",
            self.call_timeout, self.deadline
        );
        let memory_before = resident_set_bytes();
        let started = Instant::now();
        let samples = self.burst(cases, users).await;
        let elapsed = started.elapsed();
        let delta = memory_delta(memory_before, resident_set_bytes());

        let summary = reduce(&samples, users, elapsed, delta);
        info!(
            "Load burst complete: {}/{} succeeded, {} timed out, {} abandoned in {:.2}s",
            summary.succeeded,
            summary.total,
            summary.timed_out,
            summary.abandoned,
            summary.elapsed_secs
        );
        summary
    }

    async fn burst(&self, cases: &[TestCase], users: usize) -> Vec<LoadSample> {
        let token = CancellationToken::new();
        let mut tasks = JoinSet::new();

        for user in 0..users {
            let case = cases[user % cases.len()].clone();
            let client = Arc::clone(&self.client);
            let token = token.clone();
            let call_timeout = self.call_timeout;

            tasks.spawn(async move {
                let started = Instant::now();
                let call = client.search(&case.query, case.max_results, case.filters.as_ref());
                let outcome = tokio::select! {
                    _ = token.cancelled() => LoadOutcome::Abandoned,
                    result = tokio::time::timeout(call_timeout, call) => match result {
                        Ok(Ok(_)) => LoadOutcome::Succeeded,
                        Ok(Err(e)) => LoadOutcome::Failed(e.to_string()),
                        Err(_) => LoadOutcome::TimedOut,
                    },
                };
                LoadSample {
                    latency: started.elapsed(),
                    outcome,
                    query: case.query,
                }
            });
        }

        let deadline = tokio::time::Instant::now() + self.deadline;
        let mut samples = Vec::with_capacity(users);
        loop {
            let joined = if token.is_cancelled() {
                tasks.join_next().await
            } else {
                match tokio::time::timeout_at(deadline, tasks.join_next()).await {
                    Ok(joined) => joined,
                    Err(_) => {
                        warn!(
                            "Load burst deadline reached with {} calls in flight; cancelling",
                            tasks.len()
                        );
                        token.cancel();
                        continue;
                    }
                }
            };

            match joined {
                Some(Ok(sample)) => {
                    debug!("Load sample '{}': {:?}", sample.query, sample.outcome);
                    samples.push(sample);
                }
                Some(Err(e)) => samples.push(LoadSample {
                    latency: Duration::ZERO,
                    outcome: LoadOutcome::Failed(format!("load task failed: {e}")),
                    query: String::new(),
                }),
                None => break,
            }
        }
        samples
    }
}

/// Reduce samples to the load block of the report
///
/// Latency statistics cover successful samples only; every other outcome counts
/// toward the failure rate.
pub fn reduce(
    samples: &[LoadSample],
    concurrent_users: usize,
    elapsed: Duration,
    memory_delta_bytes: Option<i64>,
) -> LoadSummary {
    let mut succeeded = 0;
    let mut failed = 0;
    let mut timed_out = 0;
    let mut abandoned = 0;
    for sample in samples {
        match sample.outcome {
            LoadOutcome::Succeeded => succeeded += 1,
            LoadOutcome::Failed(_) => failed += 1,
            LoadOutcome::TimedOut => timed_out += 1,
            LoadOutcome::Abandoned => abandoned += 1,
        }
    }

    let latencies: Vec<f64> = samples
        .iter()
        .filter(|s| s.outcome == LoadOutcome::Succeeded)
        .map(|s| s.latency.as_secs_f64())
        .collect();
    let total = samples.len();

    LoadSummary {
        concurrent_users,
        total,
        succeeded,
        failed,
        timed_out,
        abandoned,
        mean_latency: mean(&latencies),
        p95_latency: percentile(&latencies, 95.0),
        max_latency: max(&latencies),
        failure_rate: if total == 0 {
            0.0
        } else {
            (total - succeeded) as f64 / total as f64
        },
        memory_delta_bytes,
        elapsed_secs: elapsed.as_secs_f64(),
    }
}
