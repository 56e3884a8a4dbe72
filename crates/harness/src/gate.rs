//! Environment quality gate

use searchbench_core::config::EnvironmentProfile;
use searchbench_core::report::{GateClause, GateClauseKind};

/// Outcome of applying an environment profile to a run
#[derive(Debug, Clone, PartialEq)]
pub struct GateVerdict {
    pub passed: bool,
    pub clauses: Vec<GateClause>,
}

impl GateVerdict {
    /// Names of the clauses that failed, in evaluation order
    pub fn failed_clauses(&self) -> Vec<String> {
        self.clauses
            .iter()
            .filter(|c| !c.passed)
            .map(|c| c.clause.as_str().to_string())
            .collect()
    }
}

/// Apply the profile's thresholds
///
/// Every clause is evaluated and reported, not just the first failure. A run
/// without a measured mean response time fails the response time clause.
pub fn evaluate_gate(
    pass_rate: f64,
    average_precision: f64,
    mean_response_time: Option<f64>,
    profile: &EnvironmentProfile,
) -> GateVerdict {
    let clauses = vec![
        GateClause {
            clause: GateClauseKind::PassRate,
            observed: Some(pass_rate),
            threshold: profile.min_pass_rate,
            passed: pass_rate >= profile.min_pass_rate,
        },
        GateClause {
            clause: GateClauseKind::Precision,
            observed: Some(average_precision),
            threshold: profile.min_precision,
            passed: average_precision >= profile.min_precision,
        },
        GateClause {
            clause: GateClauseKind::ResponseTime,
            observed: mean_response_time,
            threshold: profile.max_response_time_secs,
            passed: mean_response_time.is_some_and(|t| t <= profile.max_response_time_secs),
        },
    ];
    let passed = clauses.iter().all(|c| c.passed);
    GateVerdict { passed, clauses }
}
