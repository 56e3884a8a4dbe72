//! Built-in expectation sets and loading of suites from disk
//!
//! Suite files are TOML or JSON documents holding a `cases` array of test cases.
//! JSON files may also be a bare array.

use crate::error::{Error, Result};
use crate::test_case::{validate_suite, AdvancedExpectations, Difficulty, QueryType, TestCase};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Debug, Deserialize)]
struct SuiteFile {
    cases: Vec<TestCase>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum JsonSuite {
    Wrapped(SuiteFile),
    Bare(Vec<TestCase>),
}

/// The eight representative queries of the standard suite
pub fn standard_suite() -> Vec<TestCase> {
    vec![
        TestCase::new("wireless headphones", QueryType::Direct, Difficulty::Easy, 0.6)
            .with_categories(["Electronics", "Audio"])
            .with_keywords(["headphone", "wireless", "bluetooth", "audio"])
            .with_description("Direct product search"),
        TestCase::new(
            "gift for fitness enthusiast",
            QueryType::Intent,
            Difficulty::Medium,
            0.4,
        )
        .with_categories(["Sports", "Electronics", "Health"])
        .with_keywords(["fitness", "tracker", "watch", "exercise", "workout", "gym"])
        .with_description("Intent-based semantic search"),
        TestCase::new(
            "work from home setup",
            QueryType::Lifestyle,
            Difficulty::Medium,
            0.4,
        )
        .with_categories(["Furniture", "Electronics", "Office"])
        .with_keywords(["chair", "desk", "monitor", "keyboard", "office", "ergonomic"])
        .with_description("Lifestyle-based search"),
        TestCase::new(
            "budget electronics under 100",
            QueryType::Budget,
            Difficulty::Medium,
            0.3,
        )
        .with_categories(["Electronics"])
        .with_keywords(["electronic", "device", "tech"])
        .with_description("Price-sensitive search"),
        TestCase::new(
            "eco-friendly kitchen products",
            QueryType::Values,
            Difficulty::Medium,
            0.3,
        )
        .with_categories(["Home & Garden", "Food & Beverage"])
        .with_keywords(["eco", "organic", "sustainable", "kitchen", "cooking"])
        .with_description("Values-based search"),
        TestCase::new("mobile phone", QueryType::Direct, Difficulty::Easy, 0.5)
            .with_categories(["Electronics"])
            .with_keywords(["phone", "mobile", "smartphone", "cell"])
            .with_description("Synonym recognition"),
        TestCase::new(
            "comfortable chair for long hours coding",
            QueryType::Lifestyle,
            Difficulty::Medium,
            0.4,
        )
        .with_categories(["Furniture"])
        .with_keywords(["chair", "office", "ergonomic", "comfortable", "desk"])
        .with_description("Complex descriptive search"),
        TestCase::new(
            "japanese green tea matcha powder",
            QueryType::Direct,
            Difficulty::Hard,
            0.4,
        )
        .with_categories(["Food & Beverage"])
        .with_keywords(["tea", "green", "matcha", "japanese", "organic"])
        .with_description("Highly specific product search"),
    ]
}

/// The five harder cases scored with the advanced metric suite
pub fn advanced_suite() -> Vec<TestCase> {
    vec![
        TestCase::new(
            "wireless bluetooth headphones for running",
            QueryType::Direct,
            Difficulty::Easy,
            0.6,
        )
        .with_categories(["Electronics", "Sports"])
        .with_keywords(["wireless", "bluetooth", "headphone", "running", "sport"])
        .with_price_range(30.0, 200.0)
        .with_description("Direct product search with specific use case")
        .with_advanced(AdvancedExpectations::default()),
        TestCase::new(
            "thoughtful gift for someone who loves cooking",
            QueryType::Intent,
            Difficulty::Hard,
            0.4,
        )
        .with_categories(["Home & Garden", "Food & Beverage"])
        .with_keywords(["cooking", "kitchen", "chef", "culinary", "food"])
        .with_description("Intent-based gift recommendation requiring semantic understanding")
        .with_advanced(AdvancedExpectations {
            category_weight: 0.6,
            keyword_weight: 0.4,
            precision_baseline: 0.5,
        }),
        TestCase::new(
            "eco-friendly sustainable products for environmentally conscious lifestyle",
            QueryType::Values,
            Difficulty::Hard,
            0.4,
        )
        .with_categories(["Home & Garden", "Personal Care", "Food & Beverage"])
        .with_keywords(["eco", "sustainable", "organic", "natural", "environment"])
        .with_description("Values-based search requiring deep semantic understanding")
        .with_advanced(AdvancedExpectations::default()),
        TestCase::new(
            "premium office chair for long coding sessions under 300 dollars",
            QueryType::Budget,
            Difficulty::Medium,
            0.5,
        )
        .with_categories(["Furniture"])
        .with_keywords(["chair", "office", "ergonomic", "coding", "desk"])
        .with_price_range(100.0, 300.0)
        .with_description("Complex query with specific use case and price constraint")
        .with_advanced(AdvancedExpectations::default()),
        TestCase::new(
            "compact fitness equipment for small apartment",
            QueryType::Lifestyle,
            Difficulty::Medium,
            0.4,
        )
        .with_categories(["Sports", "Home & Garden"])
        .with_keywords(["fitness", "compact", "small", "apartment", "exercise"])
        .with_description("Space-constrained fitness equipment search")
        .with_advanced(AdvancedExpectations::default()),
    ]
}

/// Parses one suite file, choosing the format from its extension
pub fn load_suite_file(path: &Path) -> Result<Vec<TestCase>> {
    let content = std::fs::read_to_string(path).map_err(|e| {
        Error::config(format!(
            "Failed to read suite file {}: {e}",
            path.display()
        ))
    })?;

    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    let cases = match extension.as_deref() {
        Some("toml") => {
            let suite: SuiteFile = toml::from_str(&content).map_err(|e| {
                Error::config(format!("Invalid suite file {}: {e}", path.display()))
            })?;
            suite.cases
        }
        Some("json") => {
            let suite: JsonSuite = serde_json::from_str(&content).map_err(|e| {
                Error::config(format!("Invalid suite file {}: {e}", path.display()))
            })?;
            match suite {
                JsonSuite::Wrapped(file) => file.cases,
                JsonSuite::Bare(cases) => cases,
            }
        }
        _ => {
            return Err(Error::config(format!(
                "Unsupported suite file {}: expected a .toml or .json extension",
                path.display()
            )))
        }
    };

    debug!("Loaded {} test cases from {}", cases.len(), path.display());
    Ok(cases)
}

/// Loads and validates every suite file matching a glob pattern, in path order
pub fn load_suites(pattern: &str) -> Result<Vec<TestCase>> {
    let entries = glob::glob(pattern)
        .map_err(|e| Error::config(format!("Invalid suite pattern '{pattern}': {e}")))?;

    let mut paths: Vec<PathBuf> = Vec::new();
    for entry in entries {
        let path =
            entry.map_err(|e| Error::config(format!("Failed to read suite path: {e}")))?;
        if path.is_file() {
            paths.push(path);
        }
    }
    paths.sort();

    if paths.is_empty() {
        return Err(Error::config(format!(
            "No suite files match pattern '{pattern}'"
        )));
    }

    let mut cases = Vec::new();
    for path in &paths {
        cases.extend(load_suite_file(path)?);
    }

    validate_suite(&cases)?;
    info!(
        "Loaded {} test cases from {} suite file(s)",
        cases.len(),
        paths.len()
    );
    Ok(cases)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    #[test]
    fn test_builtin_suites_are_valid() {
        let standard = standard_suite();
        assert_eq!(standard.len(), 8);
        assert!(validate_suite(&standard).is_ok());

        let advanced = advanced_suite();
        assert_eq!(advanced.len(), 5);
        assert!(validate_suite(&advanced).is_ok());
        assert!(advanced.iter().all(|case| case.advanced.is_some()));
    }

    #[test]
    fn test_load_suites_from_toml_and_json() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("a.toml"),
            r#"
            [[cases]]
            query = "trail running shoes"
            expected_categories = ["Sports"]
            expected_keywords = ["running", "trail"]
            min_score_threshold = 0.5
            query_type = "direct"
            difficulty = "easy"
            "#,
        )
        .unwrap();
        std::fs::write(
            dir.path().join("b.json"),
            r#"[{"query": "gift for a new parent", "min_score_threshold": 0.3,
                 "query_type": "intent", "price_range": {"min": 10, "max": 80}}]"#,
        )
        .unwrap();

        let pattern = format!("{}/*", dir.path().display());
        let cases = load_suites(&pattern).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].query, "trail running shoes");
        assert_eq!(cases[1].query_type, QueryType::Intent);
        assert_eq!(cases[1].difficulty, Difficulty::Medium);
    }

    #[test]
    fn test_load_suites_rejects_invalid_case() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("bad.toml"),
            r#"
            [[cases]]
            query = "desk lamp"
            min_score_threshold = 2.0
            query_type = "direct"
            "#,
        )
        .unwrap();

        let pattern = format!("{}/*.toml", dir.path().display());
        let err = load_suites(&pattern).unwrap_err();
        assert_eq!(err.category(), ErrorCategory::Configuration);
    }

    #[test]
    fn test_load_suites_no_match() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/*.toml", dir.path().display());
        assert!(load_suites(&pattern).is_err());
    }
}
