//! Report emitters
//!
//! Every artifact is rendered from the same [`RunOutcome`], so the JSON, HTML
//! and JUnit outputs of one run always agree on pass rate, grade and verdict.

#![deny(warnings)]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]

mod console;
mod escape;
mod html;
mod json;
mod junit;
mod recommendations;

pub use console::render_summary;
pub use html::to_html;
pub use json::to_json;
pub use junit::to_junit;
pub use recommendations::recommendations;

use searchbench_core::benchmark::RunOutcome;
use searchbench_core::config::ReportsConfig;
use searchbench_core::error::{Result, ResultExt};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::info;

/// Locations of the artifacts written for one run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportPaths {
    pub json: PathBuf,
    pub html: PathBuf,
    pub junit: PathBuf,
}

/// Write the JSON, HTML and JUnit reports into `output_dir`
///
/// File names come from the `[reports]` configuration.
pub fn write_reports(
    outcome: &RunOutcome,
    config: &ReportsConfig,
    output_dir: &Path,
) -> Result<ReportPaths> {
    fs::create_dir_all(output_dir).context(format!(
        "Failed to create report directory {}",
        output_dir.display()
    ))?;

    let paths = ReportPaths {
        json: output_dir.join(&config.json_file),
        html: output_dir.join(&config.html_file),
        junit: output_dir.join(&config.junit_file),
    };

    let json = to_json(outcome)?;
    for (path, content) in [
        (&paths.json, json),
        (&paths.html, to_html(outcome)),
        (&paths.junit, to_junit(outcome)),
    ] {
        fs::write(path, content).context(format!("Failed to write {}", path.display()))?;
    }

    info!(
        "Reports written to {} ({}, {}, {})",
        output_dir.display(),
        config.json_file,
        config.html_file,
        config.junit_file
    );
    Ok(paths)
}
