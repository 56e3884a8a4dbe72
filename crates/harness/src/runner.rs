//! End-to-end evaluation pipeline for one run

use crate::aggregate::{aggregate, RunContext};
use crate::evaluator::Evaluator;
use crate::load::LoadHarness;
use chrono::Utc;
use indicatif::{ProgressBar, ProgressStyle};
use searchbench_core::benchmark::{BenchmarkEntry, RunOutcome};
use searchbench_core::config::{Environment, HarnessConfig};
use searchbench_core::error::{ErrorCategory, Result};
use searchbench_core::report::EvaluationMode;
use searchbench_core::suites::{advanced_suite, standard_suite};
use searchbench_core::test_case::{validate_suite, TestCase};
use searchbench_metrics::ScoringOptions;
use searchbench_search_client::SearchClient;
use searchbench_storage::{current_commit, BenchmarkStore, TimeRange, TrendAnalyzer};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};

/// Drives one evaluation run: cases, load burst, aggregation, gate, trend and history
pub struct EvaluationRunner {
    config: HarnessConfig,
    environment: Environment,
    mode: EvaluationMode,
    client: Arc<dyn SearchClient>,
    store: Arc<dyn BenchmarkStore>,
    suite: Option<Vec<TestCase>>,
    load_enabled: bool,
    repository: Option<PathBuf>,
}

impl EvaluationRunner {
    pub fn new(
        config: HarnessConfig,
        environment: Environment,
        client: Arc<dyn SearchClient>,
        store: Arc<dyn BenchmarkStore>,
    ) -> Self {
        let load_enabled = config.load.enabled;
        Self {
            config,
            environment,
            mode: EvaluationMode::Standard,
            client,
            store,
            suite: None,
            load_enabled,
            repository: None,
        }
    }

    pub fn with_mode(mut self, mode: EvaluationMode) -> Self {
        self.mode = mode;
        self
    }

    /// Replace the built-in suite for the selected mode
    pub fn with_suite(mut self, cases: Vec<TestCase>) -> Self {
        self.suite = Some(cases);
        self
    }

    pub fn with_load(mut self, enabled: bool) -> Self {
        self.load_enabled = enabled;
        self
    }

    /// Directory whose git commit is recorded with the run
    pub fn with_repository(mut self, path: impl Into<PathBuf>) -> Self {
        self.repository = Some(path.into());
        self
    }

    pub fn environment(&self) -> Environment {
        self.environment
    }

    pub fn mode(&self) -> EvaluationMode {
        self.mode
    }

    /// The cases this runner evaluates
    pub fn suite(&self) -> Vec<TestCase> {
        match (&self.suite, self.mode) {
            (Some(cases), _) => cases.clone(),
            (None, EvaluationMode::Standard) => standard_suite(),
            (None, EvaluationMode::Advanced) => advanced_suite(),
        }
    }

    /// Execute the run
    ///
    /// Configuration, profile, suite and history-read problems fail before any
    /// query is issued.
    /// A benchmark history that cannot be appended to only produces a warning on
    /// the outcome; the verdict is still returned.
    pub async fn run(&self) -> Result<RunOutcome> {
        self.config.validate()?;
        let profile = self.config.profile(self.environment)?.clone();
        let cases = self.suite();
        validate_suite(&cases)?;

        // Trend window excludes this run; an unreachable store fails before any query
        let window = TimeRange::trailing_days(Utc::now(), self.config.trend.window_days);
        let history = self.store.entries(self.environment, window).await?;

        info!(
            "Running {} evaluation of {} cases against '{}' ({} environment)",
            self.mode.as_str(),
            cases.len(),
            self.client.name(),
            self.environment
        );

        let evaluator = Evaluator::new(
            Arc::clone(&self.client),
            ScoringOptions::new(self.mode, &self.config.evaluation),
            self.config.evaluation.max_concurrent_cases,
        );
        let progress = if self.config.evaluation.show_progress {
            create_progress_bar(cases.len())
        } else {
            ProgressBar::hidden()
        };
        let results = evaluator.evaluate(&cases, &progress).await;
        progress.finish_and_clear();

        let load = if self.load_enabled {
            let harness = LoadHarness::from_profile(Arc::clone(&self.client), &profile);
            Some(harness.run(&cases, profile.concurrent_users).await)
        } else {
            info!("Load burst skipped");
            None
        };

        let git_commit = self.repository.as_deref().and_then(current_commit);
        let report = aggregate(
            RunContext {
                environment: self.environment,
                mode: self.mode,
                profile,
                git_commit,
            },
            &results,
            load,
        );

        let trend = TrendAnalyzer::new(self.config.trend.clone()).analyze(&history, &report);

        let store_warning = match self.store.append(&BenchmarkEntry::from_report(&report)).await {
            Ok(()) => None,
            Err(e) if e.category() == ErrorCategory::StoreWrite => {
                warn!("[{}] Benchmark history not updated: {e}", e.category());
                Some(e.to_string())
            }
            Err(e) => {
                error!("Benchmark store failed: {e}");
                return Err(e);
            }
        };

        info!(
            "Run {} complete: pass rate {:.1}%, grade {}, gate {}",
            report.run_id,
            report.pass_rate * 100.0,
            report.grade,
            if report.gate_passed { "passed" } else { "failed" }
        );

        Ok(RunOutcome {
            report,
            cases: results,
            trend: Some(trend),
            store_warning,
        })
    }
}

/// Create a progress bar for case evaluation
fn create_progress_bar(total: usize) -> ProgressBar {
    let pb = ProgressBar::new(total as u64);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("[{elapsed_precise}] {bar:40.cyan/blue} {pos}/{len} {msg}")
            .map_err(|e| error!("Failed to set progress bar style: {}", e))
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("##-"),
    );
    pb
}
