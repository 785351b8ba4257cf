//! WCAG Audit - rule-based accessibility checks for HTML documents
//!
//! This library runs a set of WCAG success-criterion rules against a
//! parsed HTML snapshot:
//! - 1.1.1 Non-text Content: alt text, media names, control labels
//! - 1.2 Time-based Media: captions and transcripts
//! - 1.3.1 Info and Relationships: headings, lists, tables, form labels
//! - 1.3.4 Orientation: single-orientation locks
//! - 1.3.5 Identify Input Purpose: autocomplete tokens on user fields
//!
//! Each rule resolves a query capability (full CSS selectors when the
//! enhanced engine is present, a simple-selector baseline otherwise),
//! scans independently, and reports through an append-only recorder.
//! Violating elements are marked in a highlight overlay that can be
//! re-serialized into annotated HTML.
//!
//! # Example
//!
//! ```
//! use wcag_audit::{Auditor, Config, DocumentSnapshot};
//!
//! let doc = DocumentSnapshot::parse("<main><img src='logo.png'></main>");
//! let outcome = Auditor::new(Config::default()).run(&doc);
//!
//! for report in &outcome.reports {
//!     println!("{}: {} violations", report.summary.rule, report.summary.total);
//! }
//! ```

pub mod classify;
pub mod config;
pub mod core;
pub mod output;
pub mod rules;

// Re-export main types
pub use crate::config::{Config, RuleConfig, CONFIG_FILE_NAME};
pub use crate::core::{
    AuditError, Category, DocumentSnapshot, Highlighter, QueryAdapter, QueryCapability,
    RunSummary, Violation, ViolationRecorder, VisualStyle,
};
pub use crate::output::{get_reporter, OutputFormat, Reporter};
pub use crate::rules::{default_rules, AuditOutcome, Auditor, Rule, RuleReport};

/// Audit an HTML string with the given configuration.
pub fn audit(html: &str, config: Config) -> AuditOutcome {
    let doc = DocumentSnapshot::parse(html);
    Auditor::new(config).run(&doc)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audit_convenience() {
        let outcome = audit("<main><img src='x.png'></main>", Config::default());
        assert_eq!(outcome.total_violations(), 1);
    }
}
