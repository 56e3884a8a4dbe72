//! Regression detection against the trailing benchmark window

use searchbench_core::benchmark::{
    BenchmarkEntry, Regression, TrendAnalysis, TrendBaseline, TrendDirection,
};
use searchbench_core::config::TrendConfig;
use searchbench_core::report::AggregateReport;
use std::collections::BTreeMap;
use tracing::{info, warn};

/// Relative change below which a metric counts as stable
const STABLE_BAND: f64 = 0.01;

/// Compares a run with the mean of its trailing window
#[derive(Debug, Clone)]
pub struct TrendAnalyzer {
    config: TrendConfig,
}

impl TrendAnalyzer {
    pub fn new(config: TrendConfig) -> Self {
        Self { config }
    }

    /// Analyze `current` against `history` (the window, excluding `current`)
    ///
    /// A regression is a relative drop in pass rate or average precision beyond
    /// `tolerance`, or a relative increase in mean response time beyond
    /// `response_time_tolerance`.
    pub fn analyze(&self, history: &[BenchmarkEntry], current: &AggregateReport) -> TrendAnalysis {
        if history.len() < self.config.min_entries {
            info!(
                "Trend analysis skipped: {} of {} required entries in window",
                history.len(),
                self.config.min_entries
            );
            return TrendAnalysis::InsufficientData {
                entries: history.len(),
                required: self.config.min_entries,
            };
        }

        let baseline = baseline(history);
        let mut regressions = Vec::new();

        for (metric, base, observed) in [
            ("pass_rate", baseline.pass_rate, current.pass_rate),
            (
                "average_precision",
                baseline.average_precision,
                current.average_precision,
            ),
        ] {
            if base > 0.0 {
                let change = (observed - base) / base;
                if change < -self.config.tolerance {
                    regressions.push(Regression {
                        metric: metric.to_string(),
                        baseline: base,
                        current: observed,
                        relative_change: change,
                    });
                }
            }
        }

        if let (Some(base), Some(observed)) =
            (baseline.mean_response_time, current.mean_response_time())
        {
            if base > 0.0 {
                let change = (observed - base) / base;
                if change > self.config.response_time_tolerance {
                    regressions.push(Regression {
                        metric: "mean_response_time".to_string(),
                        baseline: base,
                        current: observed,
                        relative_change: change,
                    });
                }
            }
        }

        for regression in &regressions {
            warn!(
                "Regression in {}: {:.3} -> {:.3} ({:+.1}%)",
                regression.metric,
                regression.baseline,
                regression.current,
                regression.relative_change * 100.0
            );
        }

        TrendAnalysis::Analyzed {
            entries: history.len(),
            window_days: self.config.window_days,
            baseline,
            regressions,
            directions: directions(history),
        }
    }
}

fn mean(values: impl Iterator<Item = f64>) -> Option<f64> {
    let (sum, count) = values.fold((0.0, 0usize), |(s, c), v| (s + v, c + 1));
    (count > 0).then(|| sum / count as f64)
}

fn baseline(history: &[BenchmarkEntry]) -> TrendBaseline {
    TrendBaseline {
        pass_rate: mean(history.iter().map(|e| e.report.pass_rate)).unwrap_or(0.0),
        average_precision: mean(history.iter().map(|e| e.report.average_precision))
            .unwrap_or(0.0),
        mean_response_time: mean(history.iter().filter_map(|e| e.report.mean_response_time())),
    }
}

fn direction(first: f64, last: f64, higher_is_better: bool) -> TrendDirection {
    let scale = first.abs().max(f64::EPSILON);
    let change = (last - first) / scale;
    if change.abs() <= STABLE_BAND {
        TrendDirection::Stable
    } else if (change > 0.0) == higher_is_better {
        TrendDirection::Improving
    } else {
        TrendDirection::Declining
    }
}

/// Direction of each tracked metric from the first to the last entry of the window
fn directions(history: &[BenchmarkEntry]) -> BTreeMap<String, TrendDirection> {
    let mut directions = BTreeMap::new();
    let (Some(first), Some(last)) = (history.first(), history.last()) else {
        return directions;
    };

    directions.insert(
        "pass_rate".to_string(),
        direction(first.report.pass_rate, last.report.pass_rate, true),
    );
    directions.insert(
        "average_precision".to_string(),
        direction(
            first.report.average_precision,
            last.report.average_precision,
            true,
        ),
    );
    if let (Some(a), Some(b)) = (
        first.report.mean_response_time(),
        last.report.mean_response_time(),
    ) {
        directions.insert("mean_response_time".to_string(), direction(a, b, false));
    }
    directions
}
