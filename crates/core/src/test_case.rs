//! Expectation model: hand-authored test cases and their validation

use crate::error::{Error, Result};
use crate::search_models::SearchFilters;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

/// Difficulty tier of a test case
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    Easy,
    #[default]
    Medium,
    Hard,
}

impl Difficulty {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Easy => "easy",
            Self::Medium => "medium",
            Self::Hard => "hard",
        }
    }

    /// Rough number of relevant products the catalog is expected to hold for a query
    pub fn estimated_relevant_total(&self) -> usize {
        match self {
            Self::Easy => 20,
            Self::Medium => 10,
            Self::Hard => 5,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of information need a query expresses
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    Direct,
    Intent,
    Lifestyle,
    Budget,
    Values,
}

impl QueryType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Direct => "direct",
            Self::Intent => "intent",
            Self::Lifestyle => "lifestyle",
            Self::Budget => "budget",
            Self::Values => "values",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Inclusive price constraint
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceRange {
    pub min: f64,
    pub max: f64,
}

/// Weight hints used by the advanced metrics
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdvancedExpectations {
    #[serde(default = "default_half")]
    pub category_weight: f64,
    #[serde(default = "default_half")]
    pub keyword_weight: f64,
    /// Precision@5 the case is expected to beat before a hard-case bonus applies
    #[serde(default = "default_half")]
    pub precision_baseline: f64,
}

fn default_half() -> f64 {
    0.5
}

impl Default for AdvancedExpectations {
    fn default() -> Self {
        Self {
            category_weight: default_half(),
            keyword_weight: default_half(),
            precision_baseline: default_half(),
        }
    }
}

fn default_max_results() -> usize {
    10
}

/// A representative query and the expectations its results are scored against
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TestCase {
    pub query: String,
    #[serde(default)]
    pub expected_categories: Vec<String>,
    #[serde(default)]
    pub expected_keywords: Vec<String>,
    pub min_score_threshold: f64,
    #[serde(default)]
    pub difficulty: Difficulty,
    pub query_type: QueryType,
    #[serde(default)]
    pub description: String,
    /// Result limit requested from the search service
    #[serde(default = "default_max_results")]
    pub max_results: usize,
    /// Overrides `evaluation.default_precision_floor` for this case
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub precision_floor: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_brands: Option<Vec<String>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price_range: Option<PriceRange>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filters: Option<SearchFilters>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced: Option<AdvancedExpectations>,
}

impl TestCase {
    /// Creates a case with the required fields; everything else takes its default
    pub fn new(
        query: impl Into<String>,
        query_type: QueryType,
        difficulty: Difficulty,
        min_score_threshold: f64,
    ) -> Self {
        Self {
            query: query.into(),
            expected_categories: Vec::new(),
            expected_keywords: Vec::new(),
            min_score_threshold,
            difficulty,
            query_type,
            description: String::new(),
            max_results: default_max_results(),
            precision_floor: None,
            expected_brands: None,
            price_range: None,
            filters: None,
            advanced: None,
        }
    }

    pub fn with_categories<I, S>(mut self, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_categories = categories.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_keywords<I, S>(mut self, keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_keywords = keywords.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn with_brands<I, S>(mut self, brands: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.expected_brands = Some(brands.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_price_range(mut self, min: f64, max: f64) -> Self {
        self.price_range = Some(PriceRange { min, max });
        self
    }

    pub fn with_precision_floor(mut self, floor: f64) -> Self {
        self.precision_floor = Some(floor);
        self
    }

    pub fn with_advanced(mut self, advanced: AdvancedExpectations) -> Self {
        self.advanced = Some(advanced);
        self
    }

    /// Precision floor for the pass rule, falling back to the configured default
    pub fn effective_precision_floor(&self, default_floor: f64) -> f64 {
        self.precision_floor.unwrap_or(default_floor)
    }

    /// Advanced payload, or the default payload when the case carries none
    pub fn advanced_or_default(&self) -> AdvancedExpectations {
        self.advanced.clone().unwrap_or_default()
    }

    /// Validates a single case
    pub fn validate(&self) -> Result<()> {
        if self.query.trim().is_empty() {
            return Err(Error::config("Test case query must not be empty"));
        }
        let label = &self.query;

        check_unit(label, "min_score_threshold", self.min_score_threshold)?;
        if let Some(floor) = self.precision_floor {
            check_unit(label, "precision_floor", floor)?;
        }
        if self.max_results == 0 {
            return Err(Error::config(format!(
                "Test case '{label}': max_results must be at least 1"
            )));
        }

        if let Some(range) = &self.price_range {
            if !range.min.is_finite() || !range.max.is_finite() || range.min < 0.0 {
                return Err(Error::config(format!(
                    "Test case '{label}': price_range bounds must be finite and non-negative"
                )));
            }
            if range.min > range.max {
                return Err(Error::config(format!(
                    "Test case '{label}': price_range min ({}) exceeds max ({})",
                    range.min, range.max
                )));
            }
        }

        if let Some(advanced) = &self.advanced {
            if advanced.category_weight < 0.0 || advanced.keyword_weight < 0.0 {
                return Err(Error::config(format!(
                    "Test case '{label}': advanced weights must be non-negative"
                )));
            }
            if advanced.category_weight + advanced.keyword_weight <= 0.0 {
                return Err(Error::config(format!(
                    "Test case '{label}': advanced weights must have a positive sum"
                )));
            }
            check_unit(label, "precision_baseline", advanced.precision_baseline)?;
        }

        Ok(())
    }
}

fn check_unit(label: &str, field: &str, value: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&value) {
        return Err(Error::config(format!(
            "Test case '{label}': {field} must be within [0, 1] (got {value})"
        )));
    }
    Ok(())
}

/// Validates every case and rejects duplicate queries
pub fn validate_suite(cases: &[TestCase]) -> Result<()> {
    if cases.is_empty() {
        return Err(Error::config("Test suite contains no test cases"));
    }
    let mut seen = HashSet::with_capacity(cases.len());
    for case in cases {
        case.validate()?;
        if !seen.insert(case.query.trim().to_lowercase()) {
            return Err(Error::config(format!(
                "Duplicate test case query '{}'",
                case.query
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorCategory;

    fn sample() -> TestCase {
        TestCase::new("wireless headphones", QueryType::Direct, Difficulty::Easy, 0.5)
            .with_categories(["Electronics"])
            .with_keywords(["wireless", "headphones"])
    }

    #[test]
    fn test_defaults_from_toml() {
        let case: TestCase = toml::from_str(
            r#"
            query = "gift for a runner"
            min_score_threshold = 0.4
            query_type = "intent"
            "#,
        )
        .unwrap();
        assert_eq!(case.difficulty, Difficulty::Medium);
        assert_eq!(case.max_results, 10);
        assert!(case.advanced.is_none());
        assert_eq!(case.advanced_or_default().category_weight, 0.5);
        assert_eq!(case.effective_precision_floor(0.3), 0.3);
    }

    #[test]
    fn test_validate_accepts_sample() {
        assert!(sample().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fields() {
        let mut case = sample();
        case.query = "  ".to_string();
        assert_eq!(
            case.validate().unwrap_err().category(),
            ErrorCategory::Configuration
        );

        let case = TestCase::new("q", QueryType::Direct, Difficulty::Easy, 1.2);
        assert!(case.validate().is_err());

        let case = sample().with_price_range(100.0, 50.0);
        assert!(case.validate().is_err());

        let case = sample().with_advanced(AdvancedExpectations {
            category_weight: 0.0,
            keyword_weight: 0.0,
            precision_baseline: 0.5,
        });
        assert!(case.validate().is_err());

        let mut case = sample();
        case.max_results = 0;
        assert!(case.validate().is_err());
    }

    #[test]
    fn test_validate_suite_rejects_duplicates() {
        let suite = vec![sample(), sample()];
        let err = validate_suite(&suite).unwrap_err();
        assert!(err.to_string().contains("Duplicate"));

        assert!(validate_suite(&[]).is_err());
    }
}
