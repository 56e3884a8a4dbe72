//! Tests for configuration module

use super::*;
use crate::error::{Error, ErrorCategory, Result};
use std::io::Write;
use tempfile::NamedTempFile;

fn create_temp_config_file(content: &str) -> Result<NamedTempFile> {
    let mut file = tempfile::Builder::new()
        .suffix(".toml")
        .tempfile()
        .map_err(|e| Error::config(format!("Failed to create temp file: {e}")))?;
    file.write_all(content.as_bytes())
        .map_err(|e| Error::config(format!("Failed to write temp file: {e}")))?;
    file.flush()
        .map_err(|e| Error::config(format!("Failed to flush temp file: {e}")))?;
    Ok(file)
}

#[test]
fn test_default_profiles_match_builtin_table() {
    let config = HarnessConfig::default();

    let dev = config.profile(Environment::Development).unwrap();
    assert_eq!(dev.min_pass_rate, 0.60);
    assert_eq!(dev.min_precision, 0.40);
    assert_eq!(dev.max_response_time_secs, 2.0);
    assert_eq!(dev.concurrent_users, 5);

    let staging = config.profile(Environment::Staging).unwrap();
    assert_eq!(staging.min_pass_rate, 0.75);
    assert_eq!(staging.min_precision, 0.60);
    assert_eq!(staging.max_response_time_secs, 1.0);
    assert_eq!(staging.concurrent_users, 20);

    let prod = config.profile(Environment::Production).unwrap();
    assert_eq!(prod.min_pass_rate, 0.85);
    assert_eq!(prod.min_precision, 0.70);
    assert_eq!(prod.max_response_time_secs, 0.5);
    assert_eq!(prod.concurrent_users, 50);

    assert!(config.validate().is_ok());
}

#[test]
fn test_environment_from_str() {
    assert_eq!(
        "development".parse::<Environment>().unwrap(),
        Environment::Development
    );
    assert_eq!(
        "Staging".parse::<Environment>().unwrap(),
        Environment::Staging
    );
    assert_eq!(
        "prod".parse::<Environment>().unwrap(),
        Environment::Production
    );

    let err = "qa".parse::<Environment>().unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert!(err.to_string().contains("qa"));
}

#[test]
fn test_load_timeouts_derive_from_response_time() {
    let profile = Environment::Production.default_profile();
    assert_eq!(profile.max_response_time(), Duration::from_millis(500));
    assert_eq!(profile.load_call_timeout(), Duration::from_millis(1500));
    assert_eq!(profile.load_harness_deadline(), Duration::from_millis(3000));
}

#[test]
fn test_from_toml_str_minimal() {
    let config = HarnessConfig::from_toml_str("").expect("Failed to parse empty TOML");
    assert_eq!(config.search.provider, "http");
    assert_eq!(config.search.base_url, "http://localhost:8000");
    assert_eq!(config.search.search_path, "/api/search");
    assert_eq!(config.evaluation.default_precision_floor, 0.3);
    assert_eq!(config.trend.window_days, 7);
    assert_eq!(config.trend.min_entries, 3);
    assert_eq!(config.reports.json_file, "searchbench_report.json");
    assert_eq!(config.profiles.len(), 3);
}

#[test]
fn test_from_toml_str_valid() {
    let toml = r#"
        [search]
        base_url = "https://search.example.com"
        search_path = "v2/search"
        timeout_ms = 2500

        [evaluation]
        default_precision_floor = 0.25
        max_concurrent_cases = 4

        [trend]
        tolerance = 0.05
    "#;

    let config = HarnessConfig::from_toml_str(toml).expect("Failed to parse valid TOML");
    assert_eq!(
        config.search.search_url(),
        "https://search.example.com/v2/search"
    );
    assert_eq!(config.search.timeout(), Duration::from_millis(2500));
    assert_eq!(config.evaluation.default_precision_floor, 0.25);
    assert_eq!(config.evaluation.max_concurrent_cases, 4);
    assert_eq!(config.trend.tolerance, 0.05);
    assert!(config.validate().is_ok());
}

#[test]
fn test_from_toml_str_invalid_syntax() {
    let toml = r#"
        [search
        provider = "http"
    "#;

    let result = HarnessConfig::from_toml_str(toml);
    assert!(result.is_err());
    assert!(result
        .unwrap_err()
        .to_string()
        .contains("Failed to parse TOML"));
}

#[test]
fn test_profile_rejects_unknown_keys() {
    let toml = r#"
        [profiles.staging]
        min_pass_rate = 0.75
        min_precision = 0.60
        max_response_time_secs = 1.0
        concurrent_users = 20
        max_latency = 3
    "#;

    let err = HarnessConfig::from_toml_str(toml).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[test]
fn test_profile_rejects_missing_keys() {
    let toml = r#"
        [profiles.staging]
        min_pass_rate = 0.75
        min_precision = 0.60
    "#;

    assert!(HarnessConfig::from_toml_str(toml).is_err());
}

#[test]
fn test_missing_profile_is_configuration_error() {
    let toml = r#"
        [profiles.development]
        min_pass_rate = 0.5
        min_precision = 0.5
        max_response_time_secs = 2.0
        concurrent_users = 2
    "#;

    let config = HarnessConfig::from_toml_str(toml).unwrap();
    assert!(config.profile(Environment::Development).is_ok());
    let err = config.profile(Environment::Production).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);
    assert!(err.to_string().contains("production"));
}

#[test]
fn test_validate_unknown_profile_name() {
    let mut config = HarnessConfig::default();
    config
        .profiles
        .insert("qa".to_string(), Environment::Staging.default_profile());

    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("qa"));
}

#[test]
fn test_validate_profile_ranges() {
    let mut config = HarnessConfig::default();
    if let Some(profile) = config.profiles.get_mut("staging") {
        profile.min_pass_rate = 1.5;
    }
    assert!(config.validate().is_err());

    let mut config = HarnessConfig::default();
    if let Some(profile) = config.profiles.get_mut("production") {
        profile.concurrent_users = 0;
    }
    assert!(config.validate().is_err());

    let mut config = HarnessConfig::default();
    if let Some(profile) = config.profiles.get_mut("development") {
        profile.max_response_time_secs = 0.0;
    }
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_search_settings() {
    let mut config = HarnessConfig::default();
    config.search.provider = "grpc".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("Invalid search provider"));

    let mut config = HarnessConfig::default();
    config.search.base_url = "localhost:8000".to_string();
    assert!(config.validate().is_err());

    let mut config = HarnessConfig::default();
    config.search.provider = "mock".to_string();
    config.search.base_url = String::new();
    assert!(config.validate().is_ok());
}

#[test]
fn test_validate_trend_settings() {
    let mut config = HarnessConfig::default();
    config.trend.tolerance = 0.0;
    assert!(config.validate().is_err());

    let mut config = HarnessConfig::default();
    config.trend.min_entries = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_api_key_redacted_in_debug() {
    let mut config = HarnessConfig::default();
    config.search.api_key = Some("secret-token".to_string());
    let debug = format!("{:?}", config.search);
    assert!(!debug.contains("secret-token"));
    assert!(debug.contains("REDACTED"));
}

#[test]
fn test_from_file_merges_partial_profile() {
    let file = create_temp_config_file(
        r#"
        [profiles.staging]
        min_pass_rate = 0.9
        "#,
    )
    .unwrap();

    let config = HarnessConfig::from_file(file.path()).expect("Failed to load config");
    let staging = config.profile(Environment::Staging).unwrap();
    assert_eq!(staging.min_pass_rate, 0.9);
    assert_eq!(staging.min_precision, 0.60);
    assert_eq!(staging.concurrent_users, 20);
    assert!(config.profile(Environment::Production).is_ok());
}

#[test]
fn test_from_file_rejects_unknown_profile() {
    let file = create_temp_config_file(
        r#"
        [profiles.qa]
        min_pass_rate = 0.9
        min_precision = 0.6
        max_response_time_secs = 1.0
        concurrent_users = 4
        "#,
    )
    .unwrap();

    let err = HarnessConfig::from_file(file.path()).unwrap_err();
    assert_eq!(err.category(), ErrorCategory::Configuration);
}

#[test]
fn test_load_missing_explicit_path() {
    let err = HarnessConfig::load(Some(std::path::Path::new(
        "/nonexistent/searchbench/config.toml",
    )))
    .unwrap_err();
    assert!(err.to_string().contains("Config file not found"));
}

#[test]
fn test_save_and_reload() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("config.toml");

    let mut config = HarnessConfig::default();
    config.benchmark.iterations = 5;
    config.save(&path).unwrap();

    let reloaded = HarnessConfig::from_file(&path).unwrap();
    assert_eq!(reloaded.benchmark.iterations, 5);
    assert_eq!(reloaded.profiles, config.profiles);
}

#[test]
fn test_from_file_reads_prefixed_env_overrides() {
    let file = create_temp_config_file("").unwrap();

    std::env::set_var("SEARCHBENCH_SEARCH__BASE_URL", "http://search.internal:9000");
    std::env::set_var("SEARCHBENCH_TREND__WINDOW_DAYS", "11");
    std::env::set_var("SEARCHBENCH_PROFILES__PRODUCTION__MIN_PASS_RATE", "0.95");
    let result = HarnessConfig::from_file(file.path());
    std::env::remove_var("SEARCHBENCH_SEARCH__BASE_URL");
    std::env::remove_var("SEARCHBENCH_TREND__WINDOW_DAYS");
    std::env::remove_var("SEARCHBENCH_PROFILES__PRODUCTION__MIN_PASS_RATE");

    let config = result.expect("Failed to load config");
    assert_eq!(config.search.base_url, "http://search.internal:9000");
    assert_eq!(config.trend.window_days, 11);
    let production = config.profile(Environment::Production).unwrap();
    assert_eq!(production.min_pass_rate, 0.95);
    assert_eq!(production.concurrent_users, 50);
}
