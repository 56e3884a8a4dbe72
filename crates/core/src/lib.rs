//! Core types for the searchbench search-quality harness
//!
//! This crate provides the foundational abstractions shared by every other
//! searchbench crate:
//!
//! - **Test cases**: hand-authored expectation sets and the built-in suites
//! - **Search models**: the contract with the external search service
//! - **Reports**: per-case results, the aggregate report and benchmark history records
//! - **Configuration**: layered harness configuration with per-environment gate profiles
//! - **Error handling**: the error taxonomy and its categories
//!

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod benchmark;
pub mod config;
pub mod error;
pub mod report;
pub mod search_models;
pub mod suites;
pub mod test_case;

// Re-export main types for convenience
pub use benchmark::{
    BenchmarkEntry, Regression, RunOutcome, TrendAnalysis, TrendBaseline, TrendDirection,
};
pub use config::{Environment, EnvironmentProfile, HarnessConfig, SearchServiceConfig};
pub use error::{Error, ErrorCategory, Result, ResultExt};
pub use report::{
    AdvancedAverages, AggregateReport, Breakdown, BreakdownEntry, CaseResult, EvaluationMode,
    GateClause, GateClauseKind, Grade, LoadSummary, Metric, PerformanceSummary,
};
pub use search_models::{ProductRef, SearchFilters, SearchResultItem};
pub use test_case::{AdvancedExpectations, Difficulty, PriceRange, QueryType, TestCase};

/// Version of the core library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

