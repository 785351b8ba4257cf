//! WCAG 1.3.5 Identify Input Purpose (Level AA)
//!
//! Form fields that collect information about the user must declare
//! their purpose through an `autocomplete` token from the WCAG 2.1
//! vocabulary. The classifier library infers the intended purpose from
//! the field's label, placeholder and name, which also drives the
//! suggested token in the report.

use crate::classify::{purpose, vocabulary};
use crate::core::{Category, NodeExt, ScanError, Violation};

use super::{Rule, RuleContext};

pub struct InputPurposeRule;

const CATEGORIES: &[Category] = &[
    Category::Personal,
    Category::Contact,
    Category::Address,
    Category::Payment,
    Category::Other,
];

/// Input types that never identify a user-information purpose.
const EXEMPT_INPUT_TYPES: &[&str] =
    &["submit", "reset", "button", "hidden", "image", "file", "checkbox", "radio"];

impl Rule for InputPurposeRule {
    fn id(&self) -> &'static str {
        "WCAG-1.3.5"
    }

    fn guideline(&self) -> &'static str {
        "1.3.5 Identify Input Purpose"
    }

    fn label(&self) -> &'static str {
        "WCAG 1.3.5"
    }

    fn categories(&self) -> &'static [Category] {
        CATEGORIES
    }

    fn scan(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for control in ctx.query.select_all(ctx.doc, "input, select, textarea")? {
            let input_type = if control.tag() == "input" {
                control.attr_trim("type").unwrap_or("text").to_lowercase()
            } else {
                control.tag().to_string()
            };
            if EXEMPT_INPUT_TYPES.contains(&input_type.as_str()) {
                continue;
            }

            let label_text = ctx.label_text(&control).unwrap_or_default();
            let evidence = [
                label_text.as_str(),
                control.attr_trim("placeholder").unwrap_or(""),
                control.attr_trim("name").unwrap_or(""),
            ]
            .join(" ")
            .to_lowercase();

            if !purpose::collects_user_information(&evidence, &input_type) {
                continue;
            }

            match control.attr_trim("autocomplete") {
                None | Some("") => {
                    let detected = purpose::detect(&evidence, &input_type);
                    let mut violation = match (detected.category, detected.purpose) {
                        (Some(category), Some(token)) => Violation::new(
                            control.node_id(),
                            ctx.doc.node_path(control),
                            category,
                            self.id(),
                            "Input collects user information but has no autocomplete attribute",
                        )
                        .with_evidence("detectedPurpose", token)
                        .with_suggestion(format!(
                            "Add autocomplete=\"{token}\" to identify input purpose"
                        )),
                        _ => Violation::new(
                            control.node_id(),
                            ctx.doc.node_path(control),
                            Category::Other,
                            self.id(),
                            "Input appears to collect user information but has no autocomplete attribute",
                        )
                        .with_suggestion("Add an autocomplete token identifying the input purpose"),
                    };
                    violation = violation.with_evidence("inputType", &input_type);
                    if !label_text.is_empty() {
                        violation = violation.with_evidence("labelText", &label_text);
                    }
                    ctx.report(violation);
                }
                Some(value) if !vocabulary::validate(value) => {
                    ctx.report(
                        Violation::new(
                            control.node_id(),
                            ctx.doc.node_path(control),
                            Category::Other,
                            self.id(),
                            "Autocomplete value may not be a valid WCAG token",
                        )
                        .with_evidence("currentAutocomplete", value)
                        .with_evidence("inputType", &input_type)
                        .with_suggestion("Use a token from the WCAG 2.1 input purposes list"),
                    );
                }
                Some(_) => {}
            }
        }
        Ok(())
    }

    /// Reduced pass: only inputs whose type or name make the purpose
    /// obvious, without consulting the classifier.
    fn fallback_scan(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for input in ctx.query.select_all(ctx.doc, "input")? {
            if input.attr_trim("autocomplete").is_some_and(|v| !v.is_empty()) {
                continue;
            }
            let input_type = input.attr_trim("type").unwrap_or("text").to_lowercase();
            let name = input.attr_trim("name").unwrap_or("").to_lowercase();
            let obvious = matches!(input_type.as_str(), "email" | "tel" | "password")
                || name.contains("name")
                || name.contains("email")
                || name.contains("phone");
            if !obvious {
                continue;
            }
            ctx.report(
                Violation::new(
                    input.node_id(),
                    ctx.doc.node_path(input),
                    Category::Other,
                    self.id(),
                    "Input collects user information but has no autocomplete attribute",
                )
                .with_evidence("inputType", &input_type)
                .with_suggestion("Add an autocomplete token identifying the input purpose"),
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::{DocumentSnapshot, Highlighter, QueryCapability, ViolationRecorder};

    fn run(html: &str, fallback: bool) -> Vec<Violation> {
        let doc = DocumentSnapshot::parse(html);
        let query = if fallback {
            QueryCapability::baseline()
        } else {
            QueryCapability::enhanced()
        };
        let config = Config::default().rule_config();
        let mut recorder = ViolationRecorder::new(CATEGORIES);
        let mut highlighter = Highlighter::disabled();
        let rule = InputPurposeRule;
        let mut ctx = RuleContext::new(
            &doc,
            &query,
            &config,
            rule.label(),
            &mut recorder,
            &mut highlighter,
        );
        if fallback {
            rule.fallback_scan(&mut ctx).unwrap();
        } else {
            rule.scan(&mut ctx).unwrap();
        }
        recorder.into_violations()
    }

    fn scan(html: &str) -> Vec<Violation> {
        run(html, false)
    }

    #[test]
    fn test_missing_autocomplete_on_email_field() {
        let violations = scan("<label for='e'>Email</label><input id='e' type='email'>");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Contact);
        assert!(violations[0]
            .suggestion
            .as_deref()
            .unwrap()
            .contains("autocomplete=\"email\""));
    }

    #[test]
    fn test_new_password_detected_from_label() {
        let violations =
            scan("<label for='p'>Confirm new password</label><input id='p' type='password'>");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Personal);
        assert_eq!(
            violations[0].evidence.get("detectedPurpose").map(String::as_str),
            Some("new-password")
        );
        assert!(violations[0].suggestion.as_deref().unwrap().contains("new-password"));
    }

    #[test]
    fn test_valid_autocomplete_passes() {
        let html = "<label for='e'>Email</label>\
                    <input id='e' type='email' autocomplete='email'>";
        assert!(scan(html).is_empty());
    }

    #[test]
    fn test_invalid_autocomplete_token_flagged_as_other() {
        let html = "<label for='e'>Email</label>\
                    <input id='e' type='email' autocomplete='my-email'>";
        let violations = scan(html);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Other);
        assert_eq!(
            violations[0].evidence.get("currentAutocomplete").map(String::as_str),
            Some("my-email")
        );
    }

    #[test]
    fn test_on_combined_with_token_flagged() {
        let html = "<label for='e'>Email</label>\
                    <input id='e' type='email' autocomplete='on email'>";
        let violations = scan(html);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Other);
        assert_eq!(
            violations[0].evidence.get("currentAutocomplete").map(String::as_str),
            Some("on email")
        );
    }

    #[test]
    fn test_autocomplete_off_accepted() {
        let html = "<label for='e'>Email</label>\
                    <input id='e' type='email' autocomplete='off'>";
        assert!(scan(html).is_empty());
    }

    #[test]
    fn test_non_user_field_ignored() {
        assert!(scan("<label for='q'>Search products</label><input id='q' type='text'>")
            .is_empty());
    }

    #[test]
    fn test_exempt_types_ignored() {
        let html = "<input type='submit' value='Send'>\
                    <input type='hidden' name='email_token'>\
                    <input type='checkbox' name='newsletter'>";
        assert!(scan(html).is_empty());
    }

    #[test]
    fn test_address_field_classified() {
        let violations = scan("<input type='text' name='street' placeholder='Street address'>");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Address);
    }

    #[test]
    fn test_payment_field_classified() {
        let violations =
            scan("<label for='cc'>Card number</label><input id='cc' type='text'>");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Payment);
        assert!(violations[0].suggestion.as_deref().unwrap().contains("cc-number"));
    }

    #[test]
    fn test_fallback_flags_obvious_inputs_only() {
        let html = "<input type='email' name='e'>\
                    <input type='text' name='favourite_colour'>";
        let violations = run(html, true);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Other);
    }

    #[test]
    fn test_fallback_respects_existing_autocomplete() {
        let html = "<input type='email' name='e' autocomplete='email'>";
        assert!(run(html, true).is_empty());
    }
}
