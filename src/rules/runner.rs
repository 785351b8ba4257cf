//! Rule lifecycle and the audit orchestrator
//!
//! Each rule run walks a fixed phase sequence: capability resolution,
//! the primary scan, an optional reduced fallback scan when the primary
//! fails, then reporting. A failing rule never aborts the audit; its
//! partial findings are kept and the remaining rules still run.

use std::time::Duration;

use tracing::{debug, error, info};

use crate::config::{Config, RuleConfig};
use crate::core::{
    DocumentSnapshot, Highlighter, QueryAdapter, QueryCapability, RunSummary, Violation,
    ViolationRecorder,
};

use super::{default_rules, Rule, RuleContext};

/// Lifecycle phases of a single rule run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    CapabilityResolving,
    Scanning,
    FallbackScanning,
    Reporting,
    Done,
}

/// Everything one rule run produced.
#[derive(Debug)]
pub struct RuleReport {
    pub summary: RunSummary,
    pub violations: Vec<Violation>,
}

/// Result of a whole audit: one report per executed rule, plus the
/// accumulated highlight overlay for annotation.
pub struct AuditOutcome {
    pub reports: Vec<RuleReport>,
    pub highlighter: Highlighter,
}

impl AuditOutcome {
    pub fn total_violations(&self) -> usize {
        self.reports.iter().map(|r| r.summary.total).sum()
    }
}

/// Run one rule through its full lifecycle against a document.
pub fn run_rule(
    rule: &dyn Rule,
    doc: &DocumentSnapshot,
    adapter: &QueryAdapter,
    config: &RuleConfig,
    highlighter: &mut Highlighter,
) -> RuleReport {
    let mut phase = Phase::Idle;
    advance(&mut phase, Phase::CapabilityResolving, rule.id());

    let mut capability = adapter.resolve_or_baseline();
    debug!(rule = rule.id(), enhanced = capability.is_enhanced(), "capability resolved");

    let mut recorder = ViolationRecorder::new(rule.categories());
    let mut fallback_used = false;

    advance(&mut phase, Phase::Scanning, rule.id());
    let scan_result = {
        let mut ctx = RuleContext::new(
            doc,
            &capability,
            config,
            rule.label(),
            &mut recorder,
            highlighter,
        );
        rule.scan(&mut ctx)
    };

    if let Err(err) = scan_result {
        error!(rule = rule.id(), error = %err, "scan failed, entering fallback");
        fallback_used = true;
        // Findings recorded before the failure are kept; the fallback
        // only ever appends. The fallback always runs on the baseline
        // capability so a broken enhanced engine cannot fail it again.
        capability = QueryCapability::baseline();
        advance(&mut phase, Phase::FallbackScanning, rule.id());
        let fallback_result = {
            let mut ctx = RuleContext::new(
                doc,
                &capability,
                config,
                rule.label(),
                &mut recorder,
                highlighter,
            );
            rule.fallback_scan(&mut ctx)
        };
        if let Err(err) = fallback_result {
            error!(rule = rule.id(), error = %err, "fallback scan failed, reporting partial results");
        }
    }

    advance(&mut phase, Phase::Reporting, rule.id());
    let summary = RunSummary {
        rule: rule.id().to_string(),
        guideline: rule.guideline().to_string(),
        counts: recorder.counts_by_category(),
        total: recorder.total(),
        fallback_used,
    };
    advance(&mut phase, Phase::Done, rule.id());

    RuleReport {
        summary,
        violations: recorder.into_violations(),
    }
}

fn advance(phase: &mut Phase, next: Phase, rule: &str) {
    let from = *phase;
    debug!(rule, from = ?from, to = ?next, "phase transition");
    *phase = next;
}

/// Runs the configured rule set sequentially over a document.
pub struct Auditor {
    rules: Vec<Box<dyn Rule>>,
    adapter: QueryAdapter,
    config: Config,
}

impl Auditor {
    pub fn new(config: Config) -> Self {
        let rules = default_rules()
            .into_iter()
            .filter(|rule| config.is_rule_enabled(rule.id()))
            .collect();
        let adapter = QueryAdapter::with_grace(Duration::from_millis(config.capability_grace_ms));
        Self {
            rules,
            adapter,
            config,
        }
    }

    /// Replace the capability probe, mainly for tests and embedding.
    pub fn with_adapter(mut self, adapter: QueryAdapter) -> Self {
        self.adapter = adapter;
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn rule_ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// Run every enabled rule, in order, sharing one highlight overlay.
    pub fn run(&self, doc: &DocumentSnapshot) -> AuditOutcome {
        let rule_config = self.config.rule_config();
        let mut highlighter = Highlighter::new(rule_config.styles.clone());
        let mut reports = Vec::with_capacity(self.rules.len());

        for rule in &self.rules {
            info!(rule = rule.id(), "running rule");
            let report = run_rule(rule.as_ref(), doc, &self.adapter, &rule_config, &mut highlighter);
            info!(
                rule = rule.id(),
                violations = report.summary.total,
                fallback = report.summary.fallback_used,
                "rule finished"
            );
            reports.push(report);
        }

        AuditOutcome {
            reports,
            highlighter,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{Category, NodeExt, ScanError, Violation};
    use std::time::Duration;

    struct FailingRule;

    impl Rule for FailingRule {
        fn id(&self) -> &'static str {
            "WCAG-TEST"
        }

        fn guideline(&self) -> &'static str {
            "Test guideline"
        }

        fn label(&self) -> &'static str {
            "WCAG TEST"
        }

        fn categories(&self) -> &'static [Category] {
            &[Category::Image]
        }

        fn scan(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
            // One finding lands before the failure.
            let img = ctx.doc.select_tag("img")[0];
            ctx.report(Violation::new(
                img.node_id(),
                ctx.doc.node_path(img),
                Category::Image,
                self.id(),
                "Recorded before failure",
            ));
            Err(ScanError::Other("midway failure".to_string()))
        }

        fn fallback_scan(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
            let img = ctx.doc.select_tag("img")[0];
            ctx.report(Violation::new(
                img.node_id(),
                ctx.doc.node_path(img),
                Category::Image,
                self.id(),
                "Recorded by fallback",
            ));
            Ok(())
        }
    }

    #[test]
    fn test_failed_scan_keeps_partial_results_and_runs_fallback() {
        let doc = DocumentSnapshot::parse("<img src='a.png'>");
        let config = Config::default().rule_config();
        let mut highlighter = Highlighter::disabled();
        let report = run_rule(
            &FailingRule,
            &doc,
            &QueryAdapter::new(),
            &config,
            &mut highlighter,
        );

        assert!(report.summary.fallback_used);
        assert_eq!(report.summary.total, 2);
        assert!(report.violations[0].message.contains("before failure"));
        assert!(report.violations[1].message.contains("by fallback"));
    }

    #[test]
    fn test_clean_scan_does_not_use_fallback() {
        let doc = DocumentSnapshot::parse("<img src='a.png' alt='ok'><main>x</main>");
        let outcome = Auditor::new(Config::default()).run(&doc);
        for report in &outcome.reports {
            assert!(!report.summary.fallback_used);
        }
    }

    #[test]
    fn test_rule_failure_isolation_across_audit() {
        // A probe that errors forces baseline resolution but the audit
        // still completes every rule.
        let doc = DocumentSnapshot::parse("<img src='a.png'><main>x</main>");
        let adapter = QueryAdapter::with_probe(
            Box::new(|| Err(crate::core::QueryError::ProbeFailed("gone".to_string()))),
            Duration::from_millis(1),
        );
        let outcome = Auditor::new(Config::default()).with_adapter(adapter).run(&doc);
        assert_eq!(outcome.reports.len(), 5);
        assert!(outcome.total_violations() >= 1);
    }

    #[test]
    fn test_grace_interval_comes_from_config() {
        let mut config = Config::default();
        config.capability_grace_ms = 25;
        let auditor = Auditor::new(config);
        assert_eq!(auditor.adapter.grace(), Duration::from_millis(25));
    }

    #[test]
    fn test_disabled_rules_are_skipped() {
        let mut config = Config::default();
        config.rules.orientation = false;
        config.rules.captions = false;
        let auditor = Auditor::new(config);
        assert_eq!(auditor.rule_ids(), ["WCAG-1.1.1", "WCAG-1.3.1", "WCAG-1.3.5"]);
    }

    #[test]
    fn test_summary_counts_match_violations() {
        let doc = DocumentSnapshot::parse("<img src='a.png'><img src='b.png'><main>x</main>");
        let outcome = Auditor::new(Config::default()).run(&doc);
        let report = outcome
            .reports
            .iter()
            .find(|r| r.summary.rule == "WCAG-1.1.1")
            .unwrap();
        assert_eq!(report.summary.total, 2);
        assert_eq!(report.summary.counts[&Category::Image], 2);
        assert_eq!(report.summary.counts[&Category::Media], 0);
        assert_eq!(report.violations.len(), 2);
    }
}
