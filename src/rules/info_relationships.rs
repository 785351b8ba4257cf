//! WCAG 1.3.1 Info and Relationships (Level A)
//!
//! Structure conveyed only through presentation: styled text standing in
//! for headings and lists, tables without header semantics, form fields
//! without programmatic labels, and click handlers on non-interactive
//! elements.

use scraper::ElementRef;

use crate::classify::structure;
use crate::core::{Category, ComputedStyle, NodeExt, ScanError, Violation};

use super::{Rule, RuleContext};

pub struct InfoRelationshipsRule;

const CATEGORIES: &[Category] = &[
    Category::Heading,
    Category::List,
    Category::Table,
    Category::Form,
    Category::Semantic,
];

/// Control types that take no visible label.
const UNLABELED_INPUT_TYPES: &[&str] = &["hidden", "submit", "reset", "button", "image"];

impl Rule for InfoRelationshipsRule {
    fn id(&self) -> &'static str {
        "WCAG-1.3.1"
    }

    fn guideline(&self) -> &'static str {
        "1.3.1 Info and Relationships"
    }

    fn label(&self) -> &'static str {
        "WCAG 1.3.1"
    }

    fn categories(&self) -> &'static [Category] {
        CATEGORIES
    }

    fn scan(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        self.check_pseudo_headings(ctx)?;
        self.check_heading_order(ctx)?;
        self.check_pseudo_lists(ctx)?;
        self.check_tables(ctx)?;
        self.check_form_labels(ctx)?;
        self.check_fieldsets(ctx)?;
        self.check_clickable_elements(ctx)?;
        self.check_main_landmark(ctx)?;
        Ok(())
    }

    /// Reduced pass: unlabeled form controls are the highest-impact
    /// finding and expressible with baseline selectors alone.
    fn fallback_scan(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        self.check_form_labels(ctx)?;
        Ok(())
    }
}

impl InfoRelationshipsRule {
    fn check_pseudo_headings(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for el in ctx.query.select_all(ctx.doc, "div, p, span")? {
            if el.attr_trim("role") == Some("heading") {
                continue;
            }
            if within_heading(&el) {
                continue;
            }
            let text = el.own_text().trim().to_string();
            if text.is_empty() {
                continue;
            }
            let style = ComputedStyle::of(el);
            if structure::looks_like_heading(&style, &text, &ctx.config.thresholds) {
                ctx.report(
                    Violation::new(
                        el.node_id(),
                        ctx.doc.node_path(el),
                        Category::Heading,
                        self.id(),
                        "Styled text appears to be a heading but uses no heading markup",
                    )
                    .with_evidence("text", truncate(&text, 60))
                    .with_suggestion("Use an <h1>–<h6> element of the appropriate level"),
                );
            }
        }
        Ok(())
    }

    fn check_heading_order(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        let mut previous: Option<u8> = None;
        for heading in ctx.query.select_all(ctx.doc, "h1, h2, h3, h4, h5, h6")? {
            let Some(level) = heading_level(&heading) else {
                continue;
            };
            if let Some(prev) = previous {
                if level > prev + 1 {
                    ctx.report(
                        Violation::new(
                            heading.node_id(),
                            ctx.doc.node_path(heading),
                            Category::Heading,
                            self.id(),
                            format!("Heading level skips from h{prev} to h{level}"),
                        )
                        .with_suggestion(format!("Use h{} here, or restructure the outline", prev + 1)),
                    );
                }
            }
            previous = Some(level);
        }
        Ok(())
    }

    fn check_pseudo_lists(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for el in ctx.query.select_all(ctx.doc, "div, p, span")? {
            if el
                .descendant_elements()
                .iter()
                .any(|d| matches!(d.tag(), "ul" | "ol" | "dl"))
            {
                continue;
            }
            let text = el.full_text();
            if structure::looks_like_list(&text, &ctx.config.thresholds) {
                ctx.report(
                    Violation::new(
                        el.node_id(),
                        ctx.doc.node_path(el),
                        Category::List,
                        self.id(),
                        "Text formatted as a list without list markup",
                    )
                    .with_suggestion("Use <ul> or <ol> with <li> items"),
                );
            }
        }
        // Empty list items carry no content for assistive technology.
        for li in ctx.query.select_all(ctx.doc, "li")? {
            if li.full_text().trim().is_empty() && li.direct_children().is_empty() {
                ctx.report(
                    Violation::new(
                        li.node_id(),
                        ctx.doc.node_path(li),
                        Category::List,
                        self.id(),
                        "List item is empty",
                    )
                    .with_suggestion("Remove the empty <li> or give it content"),
                );
            }
        }
        Ok(())
    }

    fn check_tables(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for table in ctx.query.select_all(ctx.doc, "table")? {
            if table.attr_trim("role") == Some("presentation") || table.is_decorative() {
                continue;
            }
            let shape = TableShape::of(&table);

            if shape.looks_like_layout() {
                ctx.report(
                    Violation::new(
                        table.node_id(),
                        ctx.doc.node_path(table),
                        Category::Table,
                        self.id(),
                        "Table appears to be used for layout",
                    )
                    .with_suggestion("Add role=\"presentation\", or use CSS for layout"),
                );
                continue;
            }

            if shape.rows > 1 && !shape.has_headers {
                ctx.report(
                    Violation::new(
                        table.node_id(),
                        ctx.doc.node_path(table),
                        Category::Table,
                        self.id(),
                        "Data table has no header cells",
                    )
                    .with_evidence("rows", shape.rows.to_string())
                    .with_suggestion("Add <th> cells, or scope/headers attributes"),
                );
            }

            if shape.is_complex() && !shape.has_caption(&table) {
                ctx.report(
                    Violation::new(
                        table.node_id(),
                        ctx.doc.node_path(table),
                        Category::Table,
                        self.id(),
                        "Complex table has no caption or accessible name",
                    )
                    .with_evidence("rows", shape.rows.to_string())
                    .with_evidence("columns", shape.columns.to_string())
                    .with_suggestion("Add a <caption> or aria-label describing the table"),
                );
            }
        }
        Ok(())
    }

    fn check_form_labels(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for control in ctx.query.select_all(ctx.doc, "input, select, textarea")? {
            if control.tag() == "input" {
                let input_type = control.attr_trim("type").unwrap_or("text");
                if UNLABELED_INPUT_TYPES.contains(&input_type) {
                    continue;
                }
            }
            if ctx.label_text(&control).is_some() {
                continue;
            }
            if control.attr_trim("title").is_some_and(|v| !v.is_empty()) {
                continue;
            }
            let mut violation = Violation::new(
                control.node_id(),
                ctx.doc.node_path(control),
                Category::Form,
                self.id(),
                format!("<{}> has no associated label", control.tag()),
            )
            .with_suggestion("Associate a <label for=…> or add aria-label");
            if let Some(name) = control.attr_trim("name") {
                violation = violation.with_evidence("name", name);
            }
            ctx.report(violation);
        }
        Ok(())
    }

    fn check_fieldsets(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for fieldset in ctx.query.select_all(ctx.doc, "fieldset")? {
            let has_legend = fieldset
                .direct_children()
                .iter()
                .any(|c| c.tag() == "legend" && !c.full_text().trim().is_empty());
            if !has_legend {
                ctx.report(
                    Violation::new(
                        fieldset.node_id(),
                        ctx.doc.node_path(fieldset),
                        Category::Form,
                        self.id(),
                        "Fieldset has no legend",
                    )
                    .with_suggestion("Add a <legend> describing the group"),
                );
            }
        }
        Ok(())
    }

    fn check_clickable_elements(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for el in ctx.query.select_all(ctx.doc, "div, span")? {
            let style = ComputedStyle::of(el);
            let clickable = el.attr_trim("onclick").is_some()
                || style.cursor.as_deref() == Some("pointer");
            if !clickable {
                continue;
            }
            let keyboard_ready =
                el.attr_trim("role").is_some() && el.attr_trim("tabindex").is_some();
            if keyboard_ready {
                continue;
            }
            ctx.report(
                Violation::new(
                    el.node_id(),
                    ctx.doc.node_path(el),
                    Category::Semantic,
                    self.id(),
                    format!("Clickable <{}> is not exposed as a control", el.tag()),
                )
                .with_suggestion("Use a <button>, or add role=\"button\" and tabindex=\"0\""),
            );
        }
        Ok(())
    }

    fn check_main_landmark(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        let has_main = !ctx.query.select_all(ctx.doc, "main")?.is_empty()
            || !ctx.query.select_all(ctx.doc, "[role=main]")?.is_empty();
        if has_main {
            return Ok(());
        }
        if let Some(body) = ctx.query.select_all(ctx.doc, "body")?.first().copied() {
            ctx.report(
                Violation::new(
                    body.node_id(),
                    ctx.doc.node_path(body),
                    Category::Semantic,
                    self.id(),
                    "Document has no main landmark",
                )
                .with_suggestion("Wrap the primary content in <main>"),
            );
        }
        Ok(())
    }
}

fn within_heading(el: &ElementRef<'_>) -> bool {
    el.ancestors()
        .filter_map(ElementRef::wrap)
        .any(|a| heading_level(&a).is_some())
}

fn heading_level(el: &ElementRef<'_>) -> Option<u8> {
    match el.tag() {
        "h1" => Some(1),
        "h2" => Some(2),
        "h3" => Some(3),
        "h4" => Some(4),
        "h5" => Some(5),
        "h6" => Some(6),
        _ => None,
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{cut}…")
    }
}

struct TableShape {
    rows: usize,
    columns: usize,
    has_headers: bool,
    any_digits: bool,
    has_aria_name: bool,
}

impl TableShape {
    fn of(table: &ElementRef<'_>) -> Self {
        let mut rows = 0;
        let mut columns = 0;
        let mut has_headers = false;
        let mut any_digits = false;
        for descendant in table.descendant_elements() {
            match descendant.tag() {
                "tr" => {
                    rows += 1;
                    let width = descendant
                        .direct_children()
                        .iter()
                        .filter(|c| matches!(c.tag(), "td" | "th"))
                        .count();
                    columns = columns.max(width);
                }
                "th" => has_headers = true,
                "td" => {
                    if descendant.attr_trim("scope").is_some()
                        || descendant.attr_trim("headers").is_some()
                    {
                        has_headers = true;
                    }
                    if descendant.full_text().chars().any(|c| c.is_ascii_digit()) {
                        any_digits = true;
                    }
                }
                _ => {}
            }
        }
        let has_aria_name = table.attr_trim("aria-label").is_some_and(|v| !v.is_empty())
            || table.attr_trim("aria-labelledby").is_some_and(|v| !v.is_empty());
        Self {
            rows,
            columns,
            has_headers,
            any_digits,
            has_aria_name,
        }
    }

    /// Single-row or header-free tables whose cells hold no numbers read
    /// as layout scaffolding rather than data.
    fn looks_like_layout(&self) -> bool {
        !self.has_headers && !self.any_digits && self.rows <= 1
    }

    fn is_complex(&self) -> bool {
        self.rows > 3 && self.columns > 3
    }

    fn has_caption(&self, table: &ElementRef<'_>) -> bool {
        self.has_aria_name
            || table
                .direct_children()
                .iter()
                .any(|c| c.tag() == "caption" && !c.full_text().trim().is_empty())
    }
}
