//! Default values and functions for configuration

// Default constants
pub(crate) const DEFAULT_SEARCH_PROVIDER: &str = "http";
pub(crate) const DEFAULT_SEARCH_BASE_URL: &str = "http://localhost:8000";
pub(crate) const DEFAULT_SEARCH_PATH: &str = "/api/search";
pub(crate) const DEFAULT_BENCHMARK_FILE: &str = ".searchbench/benchmarks.jsonl";
pub(crate) const DEFAULT_REPORT_DIR: &str = "searchbench-reports";
pub(crate) const DEFAULT_JSON_REPORT: &str = "searchbench_report.json";
pub(crate) const DEFAULT_HTML_REPORT: &str = "searchbench_report.html";
pub(crate) const DEFAULT_JUNIT_REPORT: &str = "searchbench_junit.xml";

pub(crate) fn default_search_provider() -> String {
    DEFAULT_SEARCH_PROVIDER.to_string()
}

pub(crate) fn default_search_base_url() -> String {
    DEFAULT_SEARCH_BASE_URL.to_string()
}

pub(crate) fn default_search_path() -> String {
    DEFAULT_SEARCH_PATH.to_string()
}

pub(crate) fn default_search_timeout_ms() -> u64 {
    10_000
}

pub(crate) fn default_precision_floor() -> f64 {
    0.3
}

pub(crate) fn default_semantic_hard_bonus() -> f64 {
    0.1
}

pub(crate) fn default_max_concurrent_cases() -> usize {
    1
}

pub(crate) fn default_show_progress() -> bool {
    true
}

pub(crate) fn default_load_enabled() -> bool {
    true
}

pub(crate) fn default_trend_window_days() -> u32 {
    7
}

pub(crate) fn default_trend_min_entries() -> usize {
    3
}

pub(crate) fn default_trend_tolerance() -> f64 {
    0.10
}

pub(crate) fn default_response_time_tolerance() -> f64 {
    0.50
}

pub(crate) fn default_benchmark_file() -> String {
    DEFAULT_BENCHMARK_FILE.to_string()
}

pub(crate) fn default_report_dir() -> String {
    DEFAULT_REPORT_DIR.to_string()
}

pub(crate) fn default_json_report() -> String {
    DEFAULT_JSON_REPORT.to_string()
}

pub(crate) fn default_html_report() -> String {
    DEFAULT_HTML_REPORT.to_string()
}

pub(crate) fn default_junit_report() -> String {
    DEFAULT_JUNIT_REPORT.to_string()
}

pub(crate) fn default_benchmark_iterations() -> u32 {
    3
}

pub(crate) fn default_benchmark_interval_secs() -> u64 {
    60
}
