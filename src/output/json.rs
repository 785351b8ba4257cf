//! JSON output formatter

use serde::Serialize;

use super::Reporter;
use crate::core::{RunSummary, Violation};
use crate::rules::RuleReport;

/// Machine-readable JSON reporter
pub struct JsonReporter;

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonReport<'a> {
    summary: &'a RunSummary,
    violations: &'a [Violation],
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct JsonDocument<'a> {
    total_violations: usize,
    reports: Vec<JsonReport<'a>>,
}

impl JsonReporter {
    pub fn new() -> Self {
        Self
    }
}

impl Default for JsonReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl Reporter for JsonReporter {
    fn format(&self, reports: &[RuleReport]) -> String {
        let document = JsonDocument {
            total_violations: reports.iter().map(|r| r.summary.total).sum(),
            reports: reports
                .iter()
                .map(|r| JsonReport {
                    summary: &r.summary,
                    violations: &r.violations,
                })
                .collect(),
        };
        serde_json::to_string_pretty(&document).unwrap_or_else(|_| "{}".to_string())
    }

    fn format_violation(&self, violation: &Violation) -> String {
        serde_json::to_string(violation).unwrap_or_else(|_| "{}".to_string())
    }
}
