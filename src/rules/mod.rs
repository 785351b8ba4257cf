//! WCAG rule implementations
//!
//! Each rule covers one success criterion and runs as an independent
//! scan over the document snapshot. Rules share no state with each
//! other; everything they produce flows through the [`RuleContext`].

pub mod context;
pub mod runner;

mod captions;
mod info_relationships;
mod input_purpose;
mod non_text_content;
mod orientation;

pub use captions::CaptionsRule;
pub use context::RuleContext;
pub use info_relationships::InfoRelationshipsRule;
pub use input_purpose::InputPurposeRule;
pub use non_text_content::NonTextContentRule;
pub use orientation::OrientationRule;
pub use runner::{AuditOutcome, Auditor, Phase, RuleReport};

use crate::core::{Category, ScanError};

/// A single WCAG success-criterion check.
///
/// `scan` runs with whatever capability was resolved for this run.
/// `fallback_scan` is the reduced-scope pass the runner invokes after a
/// primary scan fails; it must confine itself to baseline-expressible
/// selectors and should cover only the rule's highest-value checks.
pub trait Rule {
    /// Stable identifier, e.g. `WCAG-1.3.5`.
    fn id(&self) -> &'static str;

    /// Success criterion name for reports.
    fn guideline(&self) -> &'static str;

    /// Short label used as the highlight hint prefix, e.g. `WCAG 1.3.5`.
    fn label(&self) -> &'static str;

    /// The categories this rule may emit. The recorder is seeded with
    /// these so summaries always show every declared category.
    fn categories(&self) -> &'static [Category];

    fn scan(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError>;

    fn fallback_scan(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError>;
}

/// The built-in rule set, in execution order.
pub fn default_rules() -> Vec<Box<dyn Rule>> {
    vec![
        Box::new(NonTextContentRule),
        Box::new(CaptionsRule),
        Box::new(InfoRelationshipsRule),
        Box::new(OrientationRule),
        Box::new(InputPurposeRule),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_rules_order_and_ids() {
        let rules = default_rules();
        let ids: Vec<&str> = rules.iter().map(|r| r.id()).collect();
        assert_eq!(
            ids,
            ["WCAG-1.1.1", "WCAG-1.2", "WCAG-1.3.1", "WCAG-1.3.4", "WCAG-1.3.5"]
        );
    }

    #[test]
    fn test_rules_declare_nonempty_categories() {
        for rule in default_rules() {
            assert!(!rule.categories().is_empty(), "{} has no categories", rule.id());
            assert!(rule.label().starts_with("WCAG "));
        }
    }
}
