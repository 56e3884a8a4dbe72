//! Configuration loading from files and environment variables

use crate::error::{Error, Result};
use config::{Config as ConfigLib, ConfigBuilder as LibConfigBuilder, Environment, File};
use std::path::Path;

use super::defaults::*;
use super::{global_config_path, Environment as DeployEnvironment, HarnessConfig};

type Builder = LibConfigBuilder<config::builder::DefaultState>;

/// Helper to set a config default with consistent error mapping
fn set_config_default<T: Into<config::Value>>(
    builder: Builder,
    key: &str,
    value: T,
) -> Result<Builder> {
    builder
        .set_default(key, value)
        .map_err(|e| Error::config(format!("Failed to set {key} default: {e}")))
}

/// Profile defaults are set key by key so a file that overrides a single
/// threshold keeps the remaining built-in values for that environment.
fn set_profile_defaults(mut builder: Builder) -> Result<Builder> {
    for environment in DeployEnvironment::ALL {
        let profile = environment.default_profile();
        let prefix = format!("profiles.{}", environment.as_str());
        builder = set_config_default(
            builder,
            &format!("{prefix}.min_pass_rate"),
            profile.min_pass_rate,
        )?;
        builder = set_config_default(
            builder,
            &format!("{prefix}.min_precision"),
            profile.min_precision,
        )?;
        builder = set_config_default(
            builder,
            &format!("{prefix}.max_response_time_secs"),
            profile.max_response_time_secs,
        )?;
        builder = set_config_default(
            builder,
            &format!("{prefix}.concurrent_users"),
            profile.concurrent_users as i64,
        )?;
    }
    Ok(builder)
}

impl HarnessConfig {
    /// Loads configuration from a TOML file with environment variable overrides
    ///
    /// Environment variables are prefixed with `SEARCHBENCH_` and use double underscores
    /// for nested values. For example:
    /// - `SEARCHBENCH_SEARCH__BASE_URL=http://search.internal:8000`
    /// - `SEARCHBENCH_PROFILES__STAGING__MIN_PASS_RATE=0.8`
    pub fn from_file(path: &Path) -> Result<Self> {
        let builder = ConfigLib::builder();

        // Search service defaults
        let builder = set_config_default(builder, "search.provider", default_search_provider())?;
        let builder = set_config_default(builder, "search.base_url", default_search_base_url())?;
        let builder = set_config_default(builder, "search.search_path", default_search_path())?;
        let builder = set_config_default(
            builder,
            "search.timeout_ms",
            default_search_timeout_ms() as i64,
        )?;

        // Evaluation defaults
        let builder = set_config_default(
            builder,
            "evaluation.default_precision_floor",
            default_precision_floor(),
        )?;
        let builder = set_config_default(
            builder,
            "evaluation.semantic_hard_bonus",
            default_semantic_hard_bonus(),
        )?;
        let builder = set_config_default(
            builder,
            "evaluation.max_concurrent_cases",
            default_max_concurrent_cases() as i64,
        )?;
        let builder =
            set_config_default(builder, "evaluation.show_progress", default_show_progress())?;

        // Trend defaults
        let builder = set_config_default(
            builder,
            "trend.window_days",
            default_trend_window_days() as i64,
        )?;
        let builder = set_config_default(
            builder,
            "trend.min_entries",
            default_trend_min_entries() as i64,
        )?;
        let builder = set_config_default(builder, "trend.tolerance", default_trend_tolerance())?;
        let builder = set_config_default(
            builder,
            "trend.response_time_tolerance",
            default_response_time_tolerance(),
        )?;

        let builder = set_profile_defaults(builder)?;

        let mut builder = builder;

        // Add the config file if it exists
        if path.exists() {
            builder = builder.add_source(File::from(path));
        }

        // Add environment variables with SEARCHBENCH_ prefix
        builder = builder.add_source(
            Environment::with_prefix("SEARCHBENCH")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        // Short form for the bearer token
        if let Ok(api_key) = std::env::var("SEARCHBENCH_API_KEY") {
            builder = builder
                .set_override("search.api_key", api_key)
                .map_err(|e| Error::config(format!("Failed to set SEARCHBENCH_API_KEY: {e}")))?;
        }

        let config = builder
            .build()
            .map_err(|e| Error::config(format!("Failed to build config: {e}")))?;

        let config: Self = config
            .try_deserialize()
            .map_err(|e| Error::config(format!("Failed to deserialize config: {e}")))?;

        config.validate()?;
        Ok(config)
    }

    /// Creates a config from a TOML string (useful for testing)
    ///
    /// Unlike [`HarnessConfig::from_file`], profiles given here replace the built-in
    /// table wholesale and must spell out every key.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::config(format!("Failed to parse TOML: {e}")))
    }

    /// Load configuration from a single file
    ///
    /// Precedence (lowest to highest):
    /// 1. Hardcoded defaults
    /// 2. Config file (~/.searchbench/config.toml or custom --config path)
    /// 3. Environment variables (SEARCHBENCH_*)
    pub fn load(config_path: Option<&Path>) -> Result<Self> {
        let path = match config_path {
            Some(p) => {
                if !p.exists() {
                    return Err(Error::config(format!(
                        "Config file not found: {}",
                        p.display()
                    )));
                }
                p.to_path_buf()
            }
            None => global_config_path()?,
        };
        Self::from_file(&path)
    }
}
