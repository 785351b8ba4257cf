//! Violation accumulation for one rule run

use std::collections::BTreeMap;

use super::types::{Category, Violation};

/// Append-only violation store, created fresh for every rule run.
///
/// Insertion order is preserved and nothing is de-duplicated: two
/// independent checks flagging the same node produce two violations,
/// each carrying its own evidence. Counts always include every category
/// the rule declared, so summaries report explicit zeroes.
pub struct ViolationRecorder {
    declared: &'static [Category],
    violations: Vec<Violation>,
}

impl ViolationRecorder {
    pub fn new(declared: &'static [Category]) -> Self {
        Self {
            declared,
            violations: Vec::new(),
        }
    }

    /// Append a violation. The category must be one the rule declared.
    pub fn record(&mut self, violation: Violation) {
        debug_assert!(
            self.declared.contains(&violation.category),
            "rule {} recorded undeclared category {:?}",
            violation.rule,
            violation.category
        );
        self.violations.push(violation);
    }

    pub fn total(&self) -> usize {
        self.violations.len()
    }

    pub fn counts_by_category(&self) -> BTreeMap<Category, usize> {
        let mut counts: BTreeMap<Category, usize> =
            self.declared.iter().map(|c| (*c, 0)).collect();
        for v in &self.violations {
            *counts.entry(v.category).or_insert(0) += 1;
        }
        counts
    }

    pub fn violations(&self) -> &[Violation] {
        &self.violations
    }

    pub fn into_violations(self) -> Vec<Violation> {
        self.violations
    }
}
