//! Shared per-scan state handed to each rule.

use scraper::ElementRef;
use tracing::warn;

use crate::config::RuleConfig;
use crate::core::{
    DocumentSnapshot, Highlighter, NodeExt, QueryCapability, Violation, ViolationRecorder,
};

/// Everything a rule needs while scanning one document: the snapshot,
/// the resolved query capability, effective settings, and the sinks for
/// findings. Rules only ever add through [`RuleContext::report`]; they
/// never read back or remove earlier findings.
pub struct RuleContext<'a> {
    pub doc: &'a DocumentSnapshot,
    pub query: &'a QueryCapability,
    pub config: &'a RuleConfig,
    label: &'a str,
    recorder: &'a mut ViolationRecorder,
    highlighter: &'a mut Highlighter,
}

impl<'a> RuleContext<'a> {
    pub fn new(
        doc: &'a DocumentSnapshot,
        query: &'a QueryCapability,
        config: &'a RuleConfig,
        label: &'a str,
        recorder: &'a mut ViolationRecorder,
        highlighter: &'a mut Highlighter,
    ) -> Self {
        Self {
            doc,
            query,
            config,
            label,
            recorder,
            highlighter,
        }
    }

    /// Record one violation: log it, mark the element, append it to the
    /// recorder. Each step honors its own config toggle.
    pub fn report(&mut self, violation: Violation) {
        if self.config.log_violations {
            warn!(
                rule = %violation.rule,
                category = violation.category.as_str(),
                node = %violation.locator,
                message = %violation.message,
                "violation"
            );
        }
        if self.config.highlight_violations {
            self.highlighter
                .mark(violation.node, self.label, violation.category, &violation.message);
        }
        self.recorder.record(violation);
    }

    /// Resolve the human-visible label text for a form control, trying
    /// in order: a `<label for=…>` pointing at its id, an enclosing
    /// `<label>`, `aria-label`, then `aria-labelledby` references.
    /// Deliberately built on the snapshot rather than the query
    /// capability so both scan tiers see identical labels.
    pub fn label_text(&self, el: &ElementRef<'_>) -> Option<String> {
        if let Some(id) = el.attr_trim("id") {
            for label in self.doc.select_tag("label") {
                if label.attr_trim("for") == Some(id) {
                    let text = label.full_text().trim().to_string();
                    if !text.is_empty() {
                        return Some(text);
                    }
                }
            }
        }

        for ancestor in el.ancestors() {
            if let Some(parent) = ElementRef::wrap(ancestor) {
                if parent.tag() == "label" {
                    let text = parent.full_text().trim().to_string();
                    if !text.is_empty() {
                        return Some(text);
                    }
                }
            }
        }

        if let Some(aria) = el.attr_trim("aria-label") {
            if !aria.is_empty() {
                return Some(aria.to_string());
            }
        }

        if let Some(ids) = el.attr_trim("aria-labelledby") {
            let joined = ids
                .split_whitespace()
                .filter_map(|id| self.doc.element_by_id(id))
                .map(|referenced| referenced.full_text().trim().to_string())
                .filter(|t| !t.is_empty())
                .collect::<Vec<_>>()
                .join(" ");
            if !joined.is_empty() {
                return Some(joined);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::{Category, QueryCapability};

    fn harness(html: &str) -> (DocumentSnapshot, QueryCapability, RuleConfig) {
        (
            DocumentSnapshot::parse(html),
            QueryCapability::enhanced(),
            Config::default().rule_config(),
        )
    }

    #[test]
    fn test_report_records_and_marks() {
        let (doc, query, config) = harness("<img src='a.png'>");
        let mut recorder = ViolationRecorder::new(&[Category::Image]);
        let mut highlighter = Highlighter::new(config.styles.clone());

        let img = doc.select_tag("img")[0];
        let node = img.node_id();
        {
            let mut ctx =
                RuleContext::new(&doc, &query, &config, "WCAG 1.1.1", &mut recorder, &mut highlighter);
            ctx.report(Violation::new(
                node,
                doc.node_path(img),
                Category::Image,
                "WCAG-1.1.1",
                "Missing alt text",
            ));
        }

        assert_eq!(recorder.total(), 1);
        assert!(highlighter.is_marked(node));
    }

    #[test]
    fn test_highlight_toggle_off_skips_marking() {
        let (doc, query, mut config) = harness("<img src='a.png'>");
        config.highlight_violations = false;
        let mut recorder = ViolationRecorder::new(&[Category::Image]);
        let mut highlighter = Highlighter::new(config.styles.clone());

        let img = doc.select_tag("img")[0];
        let node = img.node_id();
        {
            let mut ctx =
                RuleContext::new(&doc, &query, &config, "WCAG 1.1.1", &mut recorder, &mut highlighter);
            ctx.report(Violation::new(
                node,
                doc.node_path(img),
                Category::Image,
                "WCAG-1.1.1",
                "Missing alt text",
            ));
        }

        assert_eq!(recorder.total(), 1);
        assert!(!highlighter.is_marked(node));
    }

    #[test]
    fn test_label_text_for_attribute() {
        let (doc, query, config) = harness(
            "<label for='em'>Email address</label><input id='em' type='text'>",
        );
        let mut recorder = ViolationRecorder::new(&[Category::Form]);
        let mut highlighter = Highlighter::disabled();
        let ctx = RuleContext::new(&doc, &query, &config, "WCAG", &mut recorder, &mut highlighter);

        let input = doc.select_tag("input")[0];
        assert_eq!(ctx.label_text(&input).as_deref(), Some("Email address"));
    }

    #[test]
    fn test_label_text_wrapping_and_aria() {
        let (doc, query, config) = harness(
            "<label>Phone <input id='a'></label><input id='b' aria-label='Fax number'>",
        );
        let mut recorder = ViolationRecorder::new(&[Category::Form]);
        let mut highlighter = Highlighter::disabled();
        let ctx = RuleContext::new(&doc, &query, &config, "WCAG", &mut recorder, &mut highlighter);

        let wrapped = doc.element_by_id("a").unwrap();
        assert_eq!(ctx.label_text(&wrapped).as_deref(), Some("Phone"));

        let aria = doc.element_by_id("b").unwrap();
        assert_eq!(ctx.label_text(&aria).as_deref(), Some("Fax number"));
    }

    #[test]
    fn test_label_text_labelledby_joins() {
        let (doc, query, config) = harness(
            "<span id='x'>Billing</span> <span id='y'>address</span>\
             <input aria-labelledby='x y'>",
        );
        let mut recorder = ViolationRecorder::new(&[Category::Form]);
        let mut highlighter = Highlighter::disabled();
        let ctx = RuleContext::new(&doc, &query, &config, "WCAG", &mut recorder, &mut highlighter);

        let input = doc.select_tag("input")[0];
        assert_eq!(ctx.label_text(&input).as_deref(), Some("Billing address"));
    }

    #[test]
    fn test_label_text_none() {
        let (doc, query, config) = harness("<input type='text' name='q'>");
        let mut recorder = ViolationRecorder::new(&[Category::Form]);
        let mut highlighter = Highlighter::disabled();
        let ctx = RuleContext::new(&doc, &query, &config, "WCAG", &mut recorder, &mut highlighter);

        let input = doc.select_tag("input")[0];
        assert!(ctx.label_text(&input).is_none());
    }
}
