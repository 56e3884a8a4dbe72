//! Configuration module for the searchbench harness
//!
//! This module provides configuration structures and loading mechanisms for the
//! evaluation harness. Configuration can be loaded from TOML files and/or environment
//! variables, and is validated before any query is issued.

mod defaults;
mod loading;

#[cfg(test)]
mod tests;

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use defaults::*;

/// Returns the path to the global configuration file
///
/// The global config is stored at `~/.searchbench/config.toml` and contains
/// settings that apply to every run on this machine.
pub fn global_config_path() -> Result<PathBuf> {
    let home_dir = dirs::home_dir()
        .ok_or_else(|| Error::config("Unable to determine home directory".to_string()))?;
    Ok(home_dir.join(".searchbench").join("config.toml"))
}

/// Deployment environment a run is gated against
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl Environment {
    /// All known environments, in promotion order
    pub const ALL: [Environment; 3] = [
        Environment::Development,
        Environment::Staging,
        Environment::Production,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Development => "development",
            Self::Staging => "staging",
            Self::Production => "production",
        }
    }

    /// Built-in quality gate profile for this environment
    pub fn default_profile(&self) -> EnvironmentProfile {
        match self {
            Self::Development => EnvironmentProfile {
                min_pass_rate: 0.60,
                min_precision: 0.40,
                max_response_time_secs: 2.0,
                concurrent_users: 5,
            },
            Self::Staging => EnvironmentProfile {
                min_pass_rate: 0.75,
                min_precision: 0.60,
                max_response_time_secs: 1.0,
                concurrent_users: 20,
            },
            Self::Production => EnvironmentProfile {
                min_pass_rate: 0.85,
                min_precision: 0.70,
                max_response_time_secs: 0.5,
                concurrent_users: 50,
            },
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "development" | "dev" => Ok(Self::Development),
            "staging" => Ok(Self::Staging),
            "production" | "prod" => Ok(Self::Production),
            other => Err(Error::config(format!(
                "Unknown environment '{other}'. Must be one of: development, staging, production"
            ))),
        }
    }
}

/// Quality gate thresholds and load settings for one environment
///
/// Every key is required when a profile is written out in full, and unknown
/// keys are rejected so that typos fail the run instead of silently loosening a gate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EnvironmentProfile {
    /// Minimum fraction of test cases that must pass
    pub min_pass_rate: f64,

    /// Minimum average precision across test cases
    pub min_precision: f64,

    /// Maximum mean per-query response time, in seconds
    pub max_response_time_secs: f64,

    /// Number of simultaneous searches issued by the load harness
    pub concurrent_users: usize,
}

impl EnvironmentProfile {
    /// Maximum mean response time as a duration
    pub fn max_response_time(&self) -> Duration {
        Duration::from_secs_f64(self.max_response_time_secs)
    }

    /// Per-call timeout used by the load harness (3x the response time target)
    pub fn load_call_timeout(&self) -> Duration {
        self.max_response_time() * 3
    }

    /// Deadline for the whole load burst (2x the per-call timeout)
    pub fn load_harness_deadline(&self) -> Duration {
        self.load_call_timeout() * 2
    }

    fn validate(&self, name: &str) -> Result<()> {
        if !(0.0..=1.0).contains(&self.min_pass_rate) {
            return Err(Error::config(format!(
                "profiles.{name}.min_pass_rate must be within [0, 1] (got {})",
                self.min_pass_rate
            )));
        }
        if !(0.0..=1.0).contains(&self.min_precision) {
            return Err(Error::config(format!(
                "profiles.{name}.min_precision must be within [0, 1] (got {})",
                self.min_precision
            )));
        }
        if !self.max_response_time_secs.is_finite() || self.max_response_time_secs <= 0.0 {
            return Err(Error::config(format!(
                "profiles.{name}.max_response_time_secs must be a positive number (got {})",
                self.max_response_time_secs
            )));
        }
        if self.concurrent_users == 0 {
            return Err(Error::config(format!(
                "profiles.{name}.concurrent_users must be greater than 0"
            )));
        }
        if self.concurrent_users > 1000 {
            return Err(Error::config(format!(
                "profiles.{name}.concurrent_users too large (max 1000, got {})",
                self.concurrent_users
            )));
        }
        Ok(())
    }
}

/// Connection settings for the external search service
///
/// # Providers
/// - `http` (default): JSON over HTTP against the search route
/// - `mock`: scripted in-process responses, for dry runs and tests
#[derive(Clone, Serialize, Deserialize)]
pub struct SearchServiceConfig {
    /// Provider type: "http" (default) or "mock"
    #[serde(default = "default_search_provider")]
    pub provider: String,

    /// Base URL of the search service
    #[serde(default = "default_search_base_url")]
    pub base_url: String,

    /// Route of the search endpoint, appended to `base_url`
    #[serde(default = "default_search_path")]
    pub search_path: String,

    /// Per-request timeout in milliseconds for evaluation queries
    #[serde(default = "default_search_timeout_ms")]
    pub timeout_ms: u64,

    /// Optional bearer token (or use SEARCHBENCH_API_KEY env var)
    #[serde(default)]
    pub api_key: Option<String>,
}

impl SearchServiceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }

    /// Full URL of the search endpoint
    pub fn search_url(&self) -> String {
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            self.search_path.trim_start_matches('/')
        )
    }
}

impl fmt::Debug for SearchServiceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SearchServiceConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("search_path", &self.search_path)
            .field("timeout_ms", &self.timeout_ms)
            .field("api_key", &self.api_key.as_ref().map(|_| "***REDACTED***"))
            .finish()
    }
}

/// Metric and scheduling settings for per-case evaluation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvaluationConfig {
    /// Precision floor applied to cases that do not declare their own
    #[serde(default = "default_precision_floor")]
    pub default_precision_floor: f64,

    /// Bonus added to semantic understanding for hard intent cases beating their baseline
    #[serde(default = "default_semantic_hard_bonus")]
    pub semantic_hard_bonus: f64,

    /// Maximum test cases evaluated at the same time (results keep suite order)
    #[serde(default = "default_max_concurrent_cases")]
    pub max_concurrent_cases: usize,

    /// Show a progress bar while evaluating cases
    #[serde(default = "default_show_progress")]
    pub show_progress: bool,
}

/// Load harness settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoadConfig {
    /// Whether the concurrent load burst runs at all
    #[serde(default = "default_load_enabled")]
    pub enabled: bool,
}

/// Trend analysis settings
///
/// The tolerances are heuristics for a fast feedback loop and are expected to be tuned
/// per deployment.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendConfig {
    /// Size of the trailing window, in calendar days
    #[serde(default = "default_trend_window_days")]
    pub window_days: u32,

    /// Minimum number of entries in the window before trends are reported
    #[serde(default = "default_trend_min_entries")]
    pub min_entries: usize,

    /// Relative drop in pass rate or precision that counts as a regression
    #[serde(default = "default_trend_tolerance")]
    pub tolerance: f64,

    /// Relative increase in mean response time that counts as a regression
    #[serde(default = "default_response_time_tolerance")]
    pub response_time_tolerance: f64,
}

/// Benchmark history location
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// JSON Lines file holding the append-only benchmark history
    #[serde(default = "default_benchmark_file")]
    pub benchmark_file: String,
}

impl StorageConfig {
    pub fn benchmark_path(&self) -> PathBuf {
        PathBuf::from(&self.benchmark_file)
    }
}

/// Report artifact locations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportsConfig {
    /// Directory receiving all report artifacts
    #[serde(default = "default_report_dir")]
    pub output_dir: String,

    /// Machine-readable report file name
    #[serde(default = "default_json_report")]
    pub json_file: String,

    /// Human-readable report file name
    #[serde(default = "default_html_report")]
    pub html_file: String,

    /// CI integration (JUnit XML) report file name
    #[serde(default = "default_junit_report")]
    pub junit_file: String,
}

/// Continuous benchmarking settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BenchmarkConfig {
    /// Number of runs performed in benchmark mode
    #[serde(default = "default_benchmark_iterations")]
    pub iterations: u32,

    /// Pause between runs, in seconds
    #[serde(default = "default_benchmark_interval_secs")]
    pub interval_secs: u64,
}

/// Main configuration structure for the harness
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HarnessConfig {
    /// Search service configuration
    #[serde(default)]
    pub search: SearchServiceConfig,

    /// Evaluation configuration
    #[serde(default)]
    pub evaluation: EvaluationConfig,

    /// Load harness configuration
    #[serde(default)]
    pub load: LoadConfig,

    /// Trend analysis configuration
    #[serde(default)]
    pub trend: TrendConfig,

    /// Benchmark store configuration
    #[serde(default)]
    pub storage: StorageConfig,

    /// Report configuration
    #[serde(default)]
    pub reports: ReportsConfig,

    /// Continuous benchmark configuration
    #[serde(default)]
    pub benchmark: BenchmarkConfig,

    /// Quality gate profiles keyed by environment name
    #[serde(default = "default_profiles")]
    pub profiles: BTreeMap<String, EnvironmentProfile>,
}

fn default_profiles() -> BTreeMap<String, EnvironmentProfile> {
    Environment::ALL
        .iter()
        .map(|env| (env.as_str().to_string(), env.default_profile()))
        .collect()
}

// Default implementations

impl Default for SearchServiceConfig {
    fn default() -> Self {
        Self {
            provider: default_search_provider(),
            base_url: default_search_base_url(),
            search_path: default_search_path(),
            timeout_ms: default_search_timeout_ms(),
            api_key: None,
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            default_precision_floor: default_precision_floor(),
            semantic_hard_bonus: default_semantic_hard_bonus(),
            max_concurrent_cases: default_max_concurrent_cases(),
            show_progress: default_show_progress(),
        }
    }
}

impl Default for LoadConfig {
    fn default() -> Self {
        Self {
            enabled: default_load_enabled(),
        }
    }
}

impl Default for TrendConfig {
    fn default() -> Self {
        Self {
            window_days: default_trend_window_days(),
            min_entries: default_trend_min_entries(),
            tolerance: default_trend_tolerance(),
            response_time_tolerance: default_response_time_tolerance(),
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            benchmark_file: default_benchmark_file(),
        }
    }
}

impl Default for ReportsConfig {
    fn default() -> Self {
        Self {
            output_dir: default_report_dir(),
            json_file: default_json_report(),
            html_file: default_html_report(),
            junit_file: default_junit_report(),
        }
    }
}

impl Default for BenchmarkConfig {
    fn default() -> Self {
        Self {
            iterations: default_benchmark_iterations(),
            interval_secs: default_benchmark_interval_secs(),
        }
    }
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            search: SearchServiceConfig::default(),
            evaluation: EvaluationConfig::default(),
            load: LoadConfig::default(),
            trend: TrendConfig::default(),
            storage: StorageConfig::default(),
            reports: ReportsConfig::default(),
            benchmark: BenchmarkConfig::default(),
            profiles: default_profiles(),
        }
    }
}

impl HarnessConfig {
    /// Looks up the quality gate profile for an environment
    pub fn profile(&self, environment: Environment) -> Result<&EnvironmentProfile> {
        self.profiles.get(environment.as_str()).ok_or_else(|| {
            Error::config(format!(
                "No quality gate profile configured for environment '{environment}'"
            ))
        })
    }

    /// Validates the configuration
    pub fn validate(&self) -> Result<()> {
        // Validate search service
        let valid_providers = ["http", "mock"];
        if !valid_providers.contains(&self.search.provider.as_str()) {
            return Err(Error::config(format!(
                "Invalid search provider '{}'. Must be one of: {:?}",
                self.search.provider, valid_providers
            )));
        }
        if self.search.provider == "http"
            && !(self.search.base_url.starts_with("http://")
                || self.search.base_url.starts_with("https://"))
        {
            return Err(Error::config(format!(
                "search.base_url must start with http:// or https:// (got '{}')",
                self.search.base_url
            )));
        }
        if self.search.timeout_ms == 0 {
            return Err(Error::config(
                "search.timeout_ms must be greater than 0".to_string(),
            ));
        }

        // Validate evaluation
        if !(0.0..=1.0).contains(&self.evaluation.default_precision_floor) {
            return Err(Error::config(format!(
                "evaluation.default_precision_floor must be within [0, 1] (got {})",
                self.evaluation.default_precision_floor
            )));
        }
        if !(0.0..=1.0).contains(&self.evaluation.semantic_hard_bonus) {
            return Err(Error::config(format!(
                "evaluation.semantic_hard_bonus must be within [0, 1] (got {})",
                self.evaluation.semantic_hard_bonus
            )));
        }
        if self.evaluation.max_concurrent_cases == 0 {
            return Err(Error::config(
                "evaluation.max_concurrent_cases must be greater than 0".to_string(),
            ));
        }
        if self.evaluation.max_concurrent_cases > 64 {
            return Err(Error::config(format!(
                "evaluation.max_concurrent_cases too large (max 64, got {})",
                self.evaluation.max_concurrent_cases
            )));
        }

        // Validate trend analysis
        if self.trend.window_days == 0 {
            return Err(Error::config(
                "trend.window_days must be greater than 0".to_string(),
            ));
        }
        if self.trend.min_entries == 0 {
            return Err(Error::config(
                "trend.min_entries must be greater than 0".to_string(),
            ));
        }
        if !(self.trend.tolerance > 0.0 && self.trend.tolerance < 1.0) {
            return Err(Error::config(format!(
                "trend.tolerance must be within (0, 1) (got {})",
                self.trend.tolerance
            )));
        }
        if !(self.trend.response_time_tolerance > 0.0
            && self.trend.response_time_tolerance.is_finite())
        {
            return Err(Error::config(format!(
                "trend.response_time_tolerance must be a positive number (got {})",
                self.trend.response_time_tolerance
            )));
        }

        // Validate storage and reports
        if self.storage.benchmark_file.trim().is_empty() {
            return Err(Error::config(
                "storage.benchmark_file must not be empty".to_string(),
            ));
        }
        for (key, value) in [
            ("reports.json_file", &self.reports.json_file),
            ("reports.html_file", &self.reports.html_file),
            ("reports.junit_file", &self.reports.junit_file),
        ] {
            if value.trim().is_empty() {
                return Err(Error::config(format!("{key} must not be empty")));
            }
        }

        // Validate benchmark mode
        if self.benchmark.iterations == 0 {
            return Err(Error::config(
                "benchmark.iterations must be greater than 0".to_string(),
            ));
        }

        // Validate profiles: every key must name a known environment
        for (name, profile) in &self.profiles {
            let environment = Environment::from_str(name).map_err(|_| {
                Error::config(format!(
                    "Unknown environment profile '{name}'. Must be one of: development, staging, production"
                ))
            })?;
            if environment.as_str() != name {
                return Err(Error::config(format!(
                    "Profile '{name}' must use the canonical name '{environment}'"
                )));
            }
            profile.validate(name)?;
        }

        Ok(())
    }

    /// Saves the configuration to a TOML file
    pub fn save(&self, path: &std::path::Path) -> Result<()> {
        let toml_string = toml::to_string_pretty(self)
            .map_err(|e| Error::config(format!("Failed to serialize config: {e}")))?;

        std::fs::write(path, toml_string)
            .map_err(|e| Error::config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }
}
