//! Command execution behind the `searchbench` binary

use anyhow::{Context, Result};
use searchbench_core::config::{Environment, HarnessConfig};
use searchbench_core::error::ErrorCategory;
use searchbench_core::report::EvaluationMode;
use searchbench_core::suites::load_suites;
use searchbench_harness::EvaluationRunner;
use searchbench_reports::{render_summary, write_reports};
use searchbench_search_client::create_search_client;
use searchbench_storage::create_benchmark_store;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;
use tracing::{error, info, warn};

/// Settings collected from the command line
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    pub config: Option<PathBuf>,
    pub environment: String,
    pub advanced: bool,
    pub benchmark: bool,
    pub iterations: Option<u32>,
    pub suite: Option<String>,
    pub output_dir: Option<PathBuf>,
    pub search_url: Option<String>,
    pub skip_load: bool,
    pub store: Option<PathBuf>,
}

impl RunOptions {
    pub fn mode(&self) -> EvaluationMode {
        if self.advanced {
            EvaluationMode::Advanced
        } else {
            EvaluationMode::Standard
        }
    }
}

/// Load configuration and apply command-line overrides on top of it
pub fn load_config(options: &RunOptions) -> Result<HarnessConfig> {
    let mut config = HarnessConfig::load(options.config.as_deref())?;
    apply_overrides(&mut config, options);
    config.validate()?;
    Ok(config)
}

/// Command-line flags take precedence over file and environment settings
pub fn apply_overrides(config: &mut HarnessConfig, options: &RunOptions) {
    if let Some(url) = &options.search_url {
        config.search.base_url = url.clone();
    }
    if let Some(store) = &options.store {
        config.storage.benchmark_file = store.display().to_string();
    }
    if let Some(dir) = &options.output_dir {
        config.reports.output_dir = dir.display().to_string();
    }
    if let Some(iterations) = options.iterations {
        config.benchmark.iterations = iterations;
    }
    if options.skip_load {
        config.load.enabled = false;
    }
}

/// Run the evaluation (or every benchmark iteration)
///
/// Returns whether the quality gate passed for every run.
pub async fn execute(options: &RunOptions) -> Result<bool> {
    let config = load_config(options)?;
    let environment = Environment::from_str(&options.environment)?;
    let profile = config.profile(environment)?;
    info!(
        "Environment {environment}: pass rate >= {:.2}, precision >= {:.2}, mean response <= {:.2}s, {} concurrent users",
        profile.min_pass_rate,
        profile.min_precision,
        profile.max_response_time_secs,
        profile.concurrent_users
    );

    let suite = match &options.suite {
        Some(pattern) => Some(load_suites(pattern)?),
        None => None,
    };
    let client = create_search_client(&config.search)?;
    let store = create_benchmark_store(&config.storage)?;
    let repository = std::env::current_dir().context("Failed to get current directory")?;
    let output_dir = PathBuf::from(&config.reports.output_dir);

    let mut runner = EvaluationRunner::new(config.clone(), environment, client, store)
        .with_mode(options.mode())
        .with_repository(repository);
    if let Some(cases) = suite {
        runner = runner.with_suite(cases);
    }

    if !options.benchmark {
        return run_once(&runner, &config, &output_dir).await;
    }

    let iterations = config.benchmark.iterations;
    let interval = Duration::from_secs(config.benchmark.interval_secs);
    info!("Benchmark mode: {iterations} iterations, {interval:?} apart");

    let mut all_passed = true;
    for iteration in 1..=iterations {
        info!("Benchmark iteration {iteration}/{iterations}");
        let dir = output_dir.join(format!("iteration-{iteration}"));
        let passed = run_once(&runner, &config, &dir).await?;
        if !passed {
            warn!("Quality gate failed in iteration {iteration}");
        }
        all_passed &= passed;
        if iteration < iterations {
            tokio::time::sleep(interval).await;
        }
    }
    Ok(all_passed)
}

async fn run_once(
    runner: &EvaluationRunner,
    config: &HarnessConfig,
    output_dir: &Path,
) -> Result<bool> {
    let outcome = runner.run().await?;
    println!("{}", render_summary(&outcome));

    let paths = write_reports(&outcome, &config.reports, output_dir)?;
    println!("Reports:");
    for path in [&paths.json, &paths.html, &paths.junit] {
        println!("  {}", path.display());
    }
    Ok(outcome.report.gate_passed)
}

/// Map a run result to the process exit status
///
/// 0 when every quality gate passed, 1 when a gate failed, 2 when the harness
/// itself could not complete the run.
pub fn exit_code(result: &Result<bool>) -> u8 {
    match result {
        Ok(true) => 0,
        Ok(false) => 1,
        Err(e) => {
            let category = e
                .downcast_ref::<searchbench_core::Error>()
                .map(|err| err.category())
                .unwrap_or(ErrorCategory::Internal);
            error!("[{category}] {e:#}");
            2
        }
    }
}
