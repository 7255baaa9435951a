//! Result model and output schemas.
//!
//! Every result is terminal once produced: the runner owns the record list
//! and the aggregator only ever sees completed records. Page visits carry a
//! flat `success` flag; functional probes carry a nested list of leaf
//! checks. The summary tallies both shapes.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::error::ErrorPayload;
use crate::route::Route;
use crate::viewport::Viewport;

/// Schema version for output payloads.
pub const PVR_OUTPUT_VERSION: &str = "0.1.0";

/// Minimum rendered body text length for a page to count as non-empty.
pub const MIN_BODY_TEXT_CHARS: usize = 50;

/// One leaf check inside a functional probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckOutcome {
    pub name: String,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

impl CheckOutcome {
    pub fn new(name: impl Into<String>, passed: bool) -> Self {
        Self {
            name: name.into(),
            passed,
            details: None,
        }
    }

    pub fn with_details(name: impl Into<String>, passed: bool, details: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            passed,
            details: Some(details.into()),
        }
    }

    pub fn failed(name: impl Into<String>, details: impl Into<String>) -> Self {
        Self::with_details(name, false, details)
    }
}

/// Result of a single route visit.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageResult {
    pub name: String,
    pub description: String,
    pub path: String,
    pub dark_mode: bool,
    pub success: bool,
    /// Navigation time in seconds, rounded to 2 decimals.
    pub load_time: f64,
    pub errors: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub screenshot: Option<PathBuf>,
}

impl PageResult {
    pub fn from_route(route: &Route) -> Self {
        Self {
            name: route.name.clone(),
            description: route.description.clone(),
            path: route.path.clone(),
            dark_mode: route.dark_mode,
            success: false,
            load_time: 0.0,
            errors: Vec::new(),
            screenshot: None,
        }
    }
}

/// Result of a multi-step functional probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProbeResult {
    pub name: String,
    pub description: String,
    pub checks: Vec<CheckOutcome>,
}

impl ProbeResult {
    pub fn new(name: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: description.into(),
            checks: Vec::new(),
        }
    }
}

/// A completed record: either a page visit or a functional probe.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum RunRecord {
    Page(PageResult),
    Probe(ProbeResult),
}

impl RunRecord {
    /// Number of leaf checks this record contributes to the summary.
    pub fn leaf_count(&self) -> usize {
        match self {
            RunRecord::Page(_) => 1,
            RunRecord::Probe(probe) => probe.checks.len(),
        }
    }

    pub fn passed_count(&self) -> usize {
        match self {
            RunRecord::Page(page) => usize::from(page.success),
            RunRecord::Probe(probe) => probe.checks.iter().filter(|c| c.passed).count(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub passed: usize,
    pub failed: usize,
    pub total: usize,
}

impl Summary {
    /// Tally leaf checks: flat `success` fields plus nested probe checks.
    pub fn tally(records: &[RunRecord]) -> Self {
        let total: usize = records.iter().map(RunRecord::leaf_count).sum();
        let passed: usize = records.iter().map(RunRecord::passed_count).sum();
        Self {
            passed,
            failed: total - passed,
            total,
        }
    }

    pub fn all_passed(&self) -> bool {
        self.failed == 0
    }
}

/// Full report for one run.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RunReport {
    pub version: String,
    pub base_url: String,
    pub viewport: Viewport,
    pub screenshot_dir: PathBuf,
    pub records: Vec<RunRecord>,
    pub summary: Summary,
}

impl RunReport {
    pub fn new(
        base_url: impl Into<String>,
        viewport: Viewport,
        screenshot_dir: PathBuf,
        records: Vec<RunRecord>,
    ) -> Self {
        let summary = Summary::tally(&records);
        Self {
            version: PVR_OUTPUT_VERSION.to_string(),
            base_url: base_url.into(),
            viewport,
            screenshot_dir,
            records,
            summary,
        }
    }
}

/// Top-level output envelope, one mode per subcommand.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "kebab-case")]
pub enum PvrOutput {
    Run(RunReport),
    Routes(RoutesOutput),
    Error(ErrorOutput),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoutesOutput {
    pub version: String,
    pub routes: Vec<Route>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorOutput {
    pub version: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub error: ErrorPayload,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ErrorCategory, ErrorPayload};

    fn page(success: bool) -> RunRecord {
        RunRecord::Page(PageResult {
            name: "shop_en".to_string(),
            description: "Shop Page (English)".to_string(),
            path: "/en/shop".to_string(),
            dark_mode: false,
            success,
            load_time: 1.23,
            errors: if success {
                Vec::new()
            } else {
                vec!["HTTP 404".to_string()]
            },
            screenshot: Some(PathBuf::from("/tmp/shots/shop_en.png")),
        })
    }

    fn probe(passed: &[bool]) -> RunRecord {
        let mut result = ProbeResult::new("shop_functionality", "Shop Page Functionality");
        for (i, &p) in passed.iter().enumerate() {
            result.checks.push(CheckOutcome::new(format!("check {i}"), p));
        }
        RunRecord::Probe(result)
    }

    #[test]
    fn summary_counts_flat_and_nested_checks() {
        let records = vec![page(true), page(false), probe(&[true, true, false])];
        let summary = Summary::tally(&records);
        assert_eq!(summary.total, 5);
        assert_eq!(summary.passed, 3);
        assert_eq!(summary.failed, 2);
        assert_eq!(summary.passed + summary.failed, summary.total);
        assert!(!summary.all_passed());
    }

    #[test]
    fn summary_of_empty_probe_adds_no_leaves() {
        let summary = Summary::tally(&[probe(&[])]);
        assert_eq!(summary.total, 0);
        assert!(summary.all_passed());
    }

    #[test]
    fn run_output_serializes_with_mode_tag() {
        let report = RunReport::new(
            "https://shop.example.com",
            Viewport::default(),
            PathBuf::from("/tmp/shots"),
            vec![page(true)],
        );
        let json = serde_json::to_string(&PvrOutput::Run(report)).expect("serialize run output");
        assert!(json.contains("\"mode\":\"run\""));
        assert!(json.contains("\"kind\":\"page\""));
        assert!(json.contains("\"loadTime\":1.23"));
        assert!(json.contains("\"summary\""));
    }

    #[test]
    fn probe_record_serializes_checks() {
        let json = serde_json::to_string(&probe(&[true])).expect("serialize probe");
        assert!(json.contains("\"kind\":\"probe\""));
        assert!(json.contains("\"checks\""));
        assert!(json.contains("\"passed\":true"));
    }

    #[test]
    fn error_output_serializes() {
        let output = PvrOutput::Error(ErrorOutput {
            version: PVR_OUTPUT_VERSION.to_string(),
            message: Some("bad input".to_string()),
            error: ErrorPayload::new(
                ErrorCategory::Config,
                "bad input".to_string(),
                "check flags",
            ),
        });
        let json = serde_json::to_string(&output).expect("serialize error output");
        assert!(json.contains("\"mode\":\"error\""));
        assert!(json.contains("\"category\":\"config\""));
    }

    #[test]
    fn check_outcome_omits_absent_details() {
        let json = serde_json::to_string(&CheckOutcome::new("Product Image", true)).unwrap();
        assert!(!json.contains("details"));
        let json =
            serde_json::to_string(&CheckOutcome::failed("Product Links", "No product links found"))
                .unwrap();
        assert!(json.contains("\"details\":\"No product links found\""));
    }
}
