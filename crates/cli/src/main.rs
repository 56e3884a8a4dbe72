//! searchbench CLI - search-quality evaluation and continuous benchmarking
//!
//! This binary runs the evaluation suite against a search service and exits
//! with a status derived from the environment quality gate.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

use clap::Parser;
use searchbench::{execute, exit_code, RunOptions};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "searchbench")]
#[command(about = "Search-quality evaluation and continuous benchmarking harness")]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// Environment whose quality gate applies (development, staging, production)
    #[arg(short, long, default_value = "development")]
    environment: String,

    /// Compute the advanced metric suite
    #[arg(short, long)]
    advanced: bool,

    /// Run repeatedly and track trends across iterations
    #[arg(short, long)]
    benchmark: bool,

    /// Number of benchmark iterations (overrides benchmark.iterations)
    #[arg(long, value_name = "N")]
    iterations: Option<u32>,

    /// Load test cases from TOML/JSON files matching a glob instead of the built-in suites
    #[arg(long, value_name = "GLOB")]
    suite: Option<String>,

    /// Directory for the JSON, HTML and JUnit reports
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Base URL of the search service
    #[arg(long, value_name = "URL")]
    search_url: Option<String>,

    /// Skip the concurrent load burst
    #[arg(long)]
    skip_load: bool,

    /// Benchmark history file (JSON Lines)
    #[arg(long, value_name = "FILE")]
    store: Option<PathBuf>,
}

impl From<Cli> for RunOptions {
    fn from(cli: Cli) -> Self {
        Self {
            config: cli.config,
            environment: cli.environment,
            advanced: cli.advanced,
            benchmark: cli.benchmark,
            iterations: cli.iterations,
            suite: cli.suite,
            output_dir: cli.output_dir,
            search_url: cli.search_url,
            skip_load: cli.skip_load,
            store: cli.store,
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    init_logging(cli.verbose);

    let options = RunOptions::from(cli);
    let result = execute(&options).await;
    ExitCode::from(exit_code(&result))
}

/// Initialize logging system
///
/// `RUST_LOG` wins over the verbosity flag when set.
fn init_logging(verbose: bool) {
    let level = if verbose { "debug" } else { "info" };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("searchbench={level}")));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}
