//! Evaluation harness
//!
//! Runs a suite of test cases against the search service, drives the concurrent
//! load burst, merges everything into the aggregate report and applies the
//! environment quality gate.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod aggregate;
pub mod evaluator;
pub mod gate;
pub mod load;
pub mod memory;
pub mod runner;
mod stats;

pub use aggregate::{aggregate, composite_score, performance_factor, RunContext};
pub use evaluator::Evaluator;
pub use gate::{evaluate_gate, GateVerdict};
pub use load::{LoadHarness, LoadOutcome, LoadSample};
pub use runner::EvaluationRunner;
