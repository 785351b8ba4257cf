//! Human-readable text output formatter

use super::Reporter;
use crate::core::Violation;
use crate::rules::RuleReport;

/// How many fix suggestions to print per rule before eliding the rest.
const SUGGESTION_CAP: usize = 5;

/// Text reporter with optional color support
pub struct TextReporter {
    colored: bool,
}

impl TextReporter {
    pub fn new(colored: bool) -> Self {
        Self { colored }
    }

    fn reset(&self) -> &'static str {
        if self.colored { "\x1b[0m" } else { "" }
    }

    fn bold(&self) -> &'static str {
        if self.colored { "\x1b[1m" } else { "" }
    }

    fn red(&self) -> &'static str {
        if self.colored { "\x1b[1;31m" } else { "" }
    }

    fn green(&self) -> &'static str {
        if self.colored { "\x1b[1;32m" } else { "" }
    }

    fn dim(&self) -> &'static str {
        if self.colored { "\x1b[2m" } else { "" }
    }

    fn format_report(&self, report: &RuleReport) -> String {
        let mut output = String::new();
        let summary = &report.summary;

        output.push_str(&format!(
            "{}WCAG {} Compliance Summary:{}\n",
            self.bold(),
            summary.guideline,
            self.reset()
        ));

        for (category, count) in &summary.counts {
            output.push_str(&format!(
                "   {}: {} violations\n",
                category.display_name(),
                count
            ));
        }

        if summary.fallback_used {
            output.push_str(&format!(
                "   {}(reduced scan: results may be incomplete){}\n",
                self.dim(),
                self.reset()
            ));
        }

        if summary.total == 0 {
            output.push_str(&format!(
                "   {}No violations found - content appears compliant{}\n",
                self.green(),
                self.reset()
            ));
            return output;
        }

        output.push_str(&format!(
            "   {}Total: {} violations found{}\n",
            self.red(),
            summary.total,
            self.reset()
        ));

        let suggestions: Vec<&str> = report
            .violations
            .iter()
            .filter_map(|v| v.suggestion.as_deref())
            .collect();
        for suggestion in suggestions.iter().take(SUGGESTION_CAP) {
            output.push_str(&format!("   - {}\n", suggestion));
        }
        if suggestions.len() > SUGGESTION_CAP {
            output.push_str(&format!(
                "   {}... and {} more{}\n",
                self.dim(),
                suggestions.len() - SUGGESTION_CAP,
                self.reset()
            ));
        }

        output
    }
}

impl Reporter for TextReporter {
    fn format(&self, reports: &[RuleReport]) -> String {
        let mut output = String::new();
        for report in reports {
            output.push_str(&self.format_report(report));
            output.push('\n');
        }

        let total: usize = reports.iter().map(|r| r.summary.total).sum();
        if total == 0 {
            output.push_str(&format!(
                "{}All checks passed{}\n",
                self.green(),
                self.reset()
            ));
        } else {
            output.push_str(&format!(
                "{}{} total violations{}\n",
                self.red(),
                total,
                self.reset()
            ));
        }
        output
    }

    fn format_violation(&self, violation: &Violation) -> String {
        let mut line = format!(
            "{}[{}]{} {} {}{}{}",
            self.red(),
            violation.rule,
            self.reset(),
            violation.message,
            self.dim(),
            violation.locator,
            self.reset()
        );
        if let Some(suggestion) = &violation.suggestion {
            line.push_str(&format!(" ({})", suggestion));
        }
        line
    }
}
