//! Benchmark history records and trend verdicts

use crate::config::Environment;
use crate::report::{AggregateReport, CaseResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// One append-only line of the benchmark history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BenchmarkEntry {
    pub id: Uuid,
    pub timestamp: DateTime<Utc>,
    pub environment: Environment,
    pub report: AggregateReport,
}

impl BenchmarkEntry {
    pub fn from_report(report: &AggregateReport) -> Self {
        Self {
            id: Uuid::new_v4(),
            timestamp: report.timestamp,
            environment: report.environment,
            report: report.clone(),
        }
    }
}

/// Direction of a metric across the trend window
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TrendDirection {
    Improving,
    Declining,
    Stable,
}

impl TrendDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Improving => "improving",
            Self::Declining => "declining",
            Self::Stable => "stable",
        }
    }
}

/// Window means the current run is compared against
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct TrendBaseline {
    pub pass_rate: f64,
    pub average_precision: f64,
    pub mean_response_time: Option<f64>,
}

/// A metric that moved past its tolerance
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Regression {
    pub metric: String,
    pub baseline: f64,
    pub current: f64,
    /// Signed relative change from the baseline
    pub relative_change: f64,
}

/// Trend verdict for one run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TrendAnalysis {
    InsufficientData {
        entries: usize,
        required: usize,
    },
    Analyzed {
        entries: usize,
        window_days: u32,
        baseline: TrendBaseline,
        regressions: Vec<Regression>,
        directions: BTreeMap<String, TrendDirection>,
    },
}

impl TrendAnalysis {
    pub fn regression_detected(&self) -> bool {
        match self {
            Self::InsufficientData { .. } => false,
            Self::Analyzed { regressions, .. } => !regressions.is_empty(),
        }
    }

    pub fn regressions(&self) -> &[Regression] {
        match self {
            Self::InsufficientData { .. } => &[],
            Self::Analyzed { regressions, .. } => regressions,
        }
    }
}

/// Everything one run produced; the single source every report artifact renders from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunOutcome {
    pub report: AggregateReport,
    pub cases: Vec<CaseResult>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<TrendAnalysis>,
    /// Set when the run could not be appended to the benchmark history
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub store_warning: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_trend_status_tag() {
        let trend = TrendAnalysis::InsufficientData {
            entries: 2,
            required: 3,
        };
        let json = serde_json::to_value(&trend).unwrap();
        assert_eq!(json["status"], "insufficient_data");
        assert_eq!(json["entries"], 2);
        assert!(!trend.regression_detected());
        assert!(trend.regressions().is_empty());
    }
}
