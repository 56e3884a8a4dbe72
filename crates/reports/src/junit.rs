//! JUnit XML for CI test report ingestion
//!
//! One testcase per test case plus a `quality_gate` testcase; the suite
//! properties carry the run's headline numbers.

use crate::escape::escape_xml;
use searchbench_core::benchmark::RunOutcome;
use std::fmt::Write;

const SUITE_NAME: &str = "searchbench";

pub fn to_junit(outcome: &RunOutcome) -> String {
    let report = &outcome.report;
    let gate_failures = usize::from(!report.gate_passed);
    let tests = outcome.cases.len() + 1;
    let failures = outcome.cases.iter().filter(|c| !c.passed).count() + gate_failures;
    let elapsed: f64 = outcome
        .cases
        .iter()
        .filter_map(|c| c.response_time())
        .sum();

    let mut xml = String::new();
    xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    let _ = writeln!(
        xml,
        "<testsuites name=\"{SUITE_NAME}\" tests=\"{tests}\" failures=\"{failures}\" time=\"{elapsed:.3}\">"
    );
    let _ = writeln!(
        xml,
        "  <testsuite name=\"{SUITE_NAME}.{}\" tests=\"{tests}\" failures=\"{failures}\" errors=\"0\" time=\"{elapsed:.3}\" timestamp=\"{}\">",
        report.environment,
        report.timestamp.format("%Y-%m-%dT%H:%M:%S")
    );

    xml.push_str("    <properties>\n");
    let mut properties = vec![
        ("run_id", report.run_id.to_string()),
        ("environment", report.environment.to_string()),
        ("mode", report.mode.as_str().to_string()),
        ("pass_rate", report.pass_rate.to_string()),
        ("average_precision", report.average_precision.to_string()),
        ("composite_score", report.composite_score.to_string()),
        ("grade", report.grade.to_string()),
        ("gate_passed", report.gate_passed.to_string()),
    ];
    if let Some(commit) = &report.git_commit {
        properties.push(("git_commit", commit.clone()));
    }
    for (name, value) in properties {
        let _ = writeln!(
            xml,
            "      <property name=\"{name}\" value=\"{}\"/>",
            escape_xml(&value)
        );
    }
    xml.push_str("    </properties>\n");

    for case in &outcome.cases {
        let classname = format!("{SUITE_NAME}.{}", case.query_type.as_str());
        let time = case.response_time().unwrap_or(0.0);
        let _ = write!(
            xml,
            "    <testcase classname=\"{}\" name=\"{}\" time=\"{time:.3}\"",
            escape_xml(&classname),
            escape_xml(&case.query)
        );
        if case.passed {
            xml.push_str("/>\n");
            continue;
        }
        xml.push_str(">\n");
        let message = case.failure_reasons.join("; ");
        let _ = writeln!(
            xml,
            "      <failure message=\"{}\" type=\"{}\">{}</failure>",
            escape_xml(&message),
            if case.error.is_some() { "error" } else { "threshold" },
            escape_xml(case.error.as_deref().unwrap_or(&message))
        );
        xml.push_str("    </testcase>\n");
    }

    let _ = write!(
        xml,
        "    <testcase classname=\"{SUITE_NAME}.gate\" name=\"quality_gate\" time=\"0.000\""
    );
    if report.gate_passed {
        xml.push_str("/>\n");
    } else {
        xml.push_str(">\n");
        let _ = writeln!(
            xml,
            "      <failure message=\"failed clauses: {}\" type=\"quality_gate\"/>",
            escape_xml(&report.failed_gate_clauses.join(", "))
        );
        xml.push_str("    </testcase>\n");
    }

    xml.push_str("  </testsuite>\n</testsuites>\n");
    xml
}
