//! Per-case results and the aggregate run report

use crate::config::Environment;
use crate::test_case::{Difficulty, QueryType};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Named metric recorded for a test case
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Metric {
    Score,
    Precision,
    PrecisionAt5,
    CategoryAccuracy,
    KeywordCoverage,
    SemanticUnderstanding,
    BrandAccuracy,
    PriceRelevance,
    RecallEstimate,
    IntentAlignment,
    /// Wall-clock seconds; the only metric not bounded by [0, 1]
    ResponseTime,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Score => "score",
            Self::Precision => "precision",
            Self::PrecisionAt5 => "precision_at_5",
            Self::CategoryAccuracy => "category_accuracy",
            Self::KeywordCoverage => "keyword_coverage",
            Self::SemanticUnderstanding => "semantic_understanding",
            Self::BrandAccuracy => "brand_accuracy",
            Self::PriceRelevance => "price_relevance",
            Self::RecallEstimate => "recall_estimate",
            Self::IntentAlignment => "intent_alignment",
            Self::ResponseTime => "response_time",
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of evaluating one test case
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaseResult {
    /// Position of the case in its suite
    pub index: usize,
    pub query: String,
    pub description: String,
    pub difficulty: Difficulty,
    pub query_type: QueryType,
    pub metrics: BTreeMap<Metric, f64>,
    pub passed: bool,
    pub results_count: usize,
    /// Names of the top three results
    pub top_results: Vec<String>,
    pub failure_reasons: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaseResult {
    pub fn metric(&self, metric: Metric) -> Option<f64> {
        self.metrics.get(&metric).copied()
    }

    pub fn score(&self) -> f64 {
        self.metric(Metric::Score).unwrap_or(0.0)
    }

    pub fn precision(&self) -> f64 {
        self.metric(Metric::Precision).unwrap_or(0.0)
    }

    /// Response time in seconds, absent when the search call never answered
    pub fn response_time(&self) -> Option<f64> {
        if self.error.is_some() {
            return None;
        }
        self.metric(Metric::ResponseTime)
    }
}

/// Whether the advanced metric suite was computed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EvaluationMode {
    #[default]
    Standard,
    Advanced,
}

impl EvaluationMode {
    pub fn is_advanced(&self) -> bool {
        matches!(self, Self::Advanced)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Standard => "standard",
            Self::Advanced => "advanced",
        }
    }
}

/// Averages of the advanced metrics; optional metrics are averaged only over the
/// cases where they were computed
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct AdvancedAverages {
    pub precision_at_5: f64,
    pub category_accuracy: f64,
    pub keyword_coverage: f64,
    pub recall_estimate: f64,
    pub semantic_understanding: Option<f64>,
    pub brand_accuracy: Option<f64>,
    pub price_relevance: Option<f64>,
    pub intent_alignment: Option<f64>,
}

/// Statistics for one slice of the suite
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct BreakdownEntry {
    pub count: usize,
    pub passed: usize,
    pub pass_rate: f64,
    pub average_precision: f64,
    pub average_semantic_understanding: Option<f64>,
}

/// Results sliced by difficulty and by query type
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Breakdown {
    pub by_difficulty: BTreeMap<Difficulty, BreakdownEntry>,
    pub by_query_type: BTreeMap<QueryType, BreakdownEntry>,
}

/// Result of the concurrent load burst
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LoadSummary {
    pub concurrent_users: usize,
    pub total: usize,
    pub succeeded: usize,
    pub failed: usize,
    pub timed_out: usize,
    pub abandoned: usize,
    /// Latency statistics over successful samples, in seconds
    pub mean_latency: Option<f64>,
    pub p95_latency: Option<f64>,
    pub max_latency: Option<f64>,
    pub failure_rate: f64,
    /// Resident-set growth across the burst, where the platform exposes it
    pub memory_delta_bytes: Option<i64>,
    pub elapsed_secs: f64,
}

/// Per-query response time statistics plus the optional load block
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PerformanceSummary {
    /// Number of cases that received a response
    pub measured_cases: usize,
    pub mean_response_time: Option<f64>,
    pub p95_response_time: Option<f64>,
    pub load: Option<LoadSummary>,
}

/// Letter grade derived from the composite score
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Grade {
    #[serde(rename = "A+")]
    APlus,
    #[serde(rename = "A")]
    A,
    #[serde(rename = "B+")]
    BPlus,
    #[serde(rename = "B")]
    B,
    #[serde(rename = "C+")]
    CPlus,
    #[serde(rename = "C")]
    C,
}

impl Grade {
    /// Maps a 0-100 composite score onto a grade band
    pub fn from_composite(composite: f64) -> Self {
        if composite >= 90.0 {
            Self::APlus
        } else if composite >= 85.0 {
            Self::A
        } else if composite >= 80.0 {
            Self::BPlus
        } else if composite >= 75.0 {
            Self::B
        } else if composite >= 70.0 {
            Self::CPlus
        } else {
            Self::C
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::APlus => "A+",
            Self::A => "A",
            Self::BPlus => "B+",
            Self::B => "B",
            Self::CPlus => "C+",
            Self::C => "C",
        }
    }
}

impl fmt::Display for Grade {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Quality gate clause identifiers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GateClauseKind {
    PassRate,
    Precision,
    ResponseTime,
}

impl GateClauseKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PassRate => "pass_rate",
            Self::Precision => "precision",
            Self::ResponseTime => "response_time",
        }
    }
}

impl fmt::Display for GateClauseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One evaluated clause of the quality gate
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GateClause {
    pub clause: GateClauseKind,
    /// Observed value; `None` when it could not be measured
    pub observed: Option<f64>,
    pub threshold: f64,
    pub passed: bool,
}

/// Merged result of one evaluation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateReport {
    pub run_id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub environment: Environment,
    pub mode: EvaluationMode,
    pub total_cases: usize,
    pub passed_cases: usize,
    pub failed_cases: usize,
    pub pass_rate: f64,
    pub average_score: f64,
    pub average_precision: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub advanced: Option<AdvancedAverages>,
    pub breakdown: Breakdown,
    pub performance: PerformanceSummary,
    /// 0-100 blend of pass rate, precision and responsiveness
    pub composite_score: f64,
    pub grade: Grade,
    pub gate_passed: bool,
    pub gate_clauses: Vec<GateClause>,
    pub failed_gate_clauses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub git_commit: Option<String>,
}

impl AggregateReport {
    pub fn mean_response_time(&self) -> Option<f64> {
        self.performance.mean_response_time
    }
}
