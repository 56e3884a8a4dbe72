//! Library interface for the searchbench CLI
//!
//! This module exposes the command execution for integration testing while
//! keeping argument parsing in main.rs.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

pub mod app;

pub use app::{apply_overrides, execute, exit_code, load_config, RunOptions};
