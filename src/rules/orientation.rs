//! WCAG 1.3.4 Orientation (Level AA)
//!
//! Positive detection only: the rule looks for concrete evidence that
//! content is locked to a single orientation (viewport hints, one-sided
//! media queries that restructure layout, hard-coded rotation
//! transforms, restrictive orientation scripts, "please rotate"
//! messaging) and stays silent otherwise. Inaccessible external
//! stylesheets are skipped per sheet, never failing the scan.

use regex::Regex;
use std::sync::LazyLock;
use tracing::warn;

use crate::core::{Category, ComputedStyle, NodeExt, ScanError, Violation};

use super::{Rule, RuleContext};

pub struct OrientationRule;

const CATEGORIES: &[Category] = &[
    Category::Css,
    Category::Meta,
    Category::Script,
    Category::Content,
];

static ROTATION_TRANSFORM: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"rotate\(\s*(90deg|-90deg|270deg)\s*\)").expect("static rotation pattern")
});

static LAYOUT_PROPERTY: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(display|visibility|width|height|position|overflow)\s*:")
        .expect("static layout property pattern")
});

static ORIENTATION_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)screen\.orientation|orientationchange|matchMedia\([^)]*orientation")
        .expect("static script pattern")
});

static RESTRICTIVE_SCRIPT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)return\s+false|preventDefault|disable|hide|remove")
        .expect("static restrictive pattern")
});

static ROTATE_MESSAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)rotate.*device|turn.*phone|landscape.*mode|portrait.*mode|flip.*device|orientation.*required|please.*rotate|switch.*orientation",
    )
    .expect("static message pattern")
});

/// Orientation-dependent experiences WCAG itself exempts.
static ESSENTIAL_CONTEXT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)\b(piano|keyboard|musical|game|bank|check|signature|chart|graph|diagram|video|camera|photo|drawing)\b",
    )
    .expect("static essential pattern")
});

impl Rule for OrientationRule {
    fn id(&self) -> &'static str {
        "WCAG-1.3.4"
    }

    fn guideline(&self) -> &'static str {
        "1.3.4 Orientation"
    }

    fn label(&self) -> &'static str {
        "WCAG 1.3.4"
    }

    fn categories(&self) -> &'static [Category] {
        CATEGORIES
    }

    fn scan(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        self.check_viewport_meta(ctx)?;
        self.check_stylesheets(ctx)?;
        self.check_inline_transforms(ctx)?;
        self.check_scripts(ctx)?;
        self.check_rotate_messages(ctx)?;
        Ok(())
    }

    fn fallback_scan(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        self.check_viewport_meta(ctx)?;
        Ok(())
    }
}

impl OrientationRule {
    fn check_viewport_meta(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for meta in ctx.query.select_all(ctx.doc, "meta[name=viewport]")? {
            let Some(content) = meta.attr_trim("content") else {
                continue;
            };
            if content.to_lowercase().contains("orientation=") {
                ctx.report(
                    Violation::new(
                        meta.node_id(),
                        ctx.doc.node_path(meta),
                        Category::Meta,
                        self.id(),
                        "Viewport meta tag locks display orientation",
                    )
                    .with_evidence("content", content)
                    .with_suggestion("Remove the orientation constraint from the viewport meta"),
                );
            }
        }
        Ok(())
    }

    /// One-sided orientation media queries that restructure layout. A
    /// stylesheet styling both orientations is adapting, not locking.
    fn check_stylesheets(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for sheet in ctx.doc.stylesheets() {
            let rules = match sheet.media_rules() {
                Ok(rules) => rules,
                Err(err) => {
                    warn!(
                        origin = %sheet.origin().describe(),
                        error = %err,
                        "skipping inaccessible stylesheet"
                    );
                    continue;
                }
            };

            let mut portrait_restructures = false;
            let mut landscape_restructures = false;
            for rule in &rules {
                let restructures = LAYOUT_PROPERTY.is_match(&rule.body);
                if rule.condition.contains("orientation: portrait")
                    || rule.condition.contains("orientation:portrait")
                {
                    portrait_restructures |= restructures;
                }
                if rule.condition.contains("orientation: landscape")
                    || rule.condition.contains("orientation:landscape")
                {
                    landscape_restructures |= restructures;
                }
            }

            if portrait_restructures == landscape_restructures {
                continue;
            }
            let side = if portrait_restructures { "portrait" } else { "landscape" };
            if let Some(owner) = ctx.doc.element(sheet.owner()) {
                ctx.report(
                    Violation::new(
                        owner.node_id(),
                        ctx.doc.node_path(owner),
                        Category::Css,
                        self.id(),
                        format!("Stylesheet restructures layout only in {side} orientation"),
                    )
                    .with_evidence("origin", sheet.origin().describe())
                    .with_suggestion("Support both orientations, or limit the query to cosmetics"),
                );
            }
        }
        Ok(())
    }

    fn check_inline_transforms(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for el in ctx.query.select_all(ctx.doc, "[style]")? {
            let style = ComputedStyle::of(el);
            let Some(transform) = style.transform else {
                continue;
            };
            if ROTATION_TRANSFORM.is_match(&transform) {
                ctx.report(
                    Violation::new(
                        el.node_id(),
                        ctx.doc.node_path(el),
                        Category::Css,
                        self.id(),
                        "Element is rotated a quarter turn to force an orientation",
                    )
                    .with_evidence("transform", transform)
                    .with_suggestion("Let the layout follow the device orientation instead"),
                );
            }
        }
        Ok(())
    }

    fn check_scripts(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for script in ctx.query.select_all(ctx.doc, "script")? {
            let text = script.full_text();
            if ORIENTATION_SCRIPT.is_match(&text) && RESTRICTIVE_SCRIPT.is_match(&text) {
                ctx.report(
                    Violation::new(
                        script.node_id(),
                        ctx.doc.node_path(script),
                        Category::Script,
                        self.id(),
                        "Script appears to restrict content to one orientation",
                    )
                    .with_suggestion("Handle orientation changes without blocking content"),
                );
            }
        }
        Ok(())
    }

    fn check_rotate_messages(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for el in ctx.query.select_all(ctx.doc, "p, div, span")? {
            let text = el.own_text();
            if !ROTATE_MESSAGE.is_match(&text) {
                continue;
            }
            if ESSENTIAL_CONTEXT.is_match(&text) {
                continue;
            }
            ctx.report(
                Violation::new(
                    el.node_id(),
                    ctx.doc.node_path(el),
                    Category::Content,
                    self.id(),
                    "Content asks the user to rotate their device",
                )
                .with_evidence("text", text.trim().chars().take(80).collect::<String>())
                .with_suggestion("Make the content usable in both orientations"),
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

    fn scan_doc(doc: &DocumentSnapshot) -> Vec<Violation> {
        let query = QueryCapability::enhanced();
        let config = Config::default().rule_config();
        let mut recorder = ViolationRecorder::new(CATEGORIES);
        let mut highlighter = Highlighter::disabled();
        let rule = OrientationRule;
        let mut ctx = RuleContext::new(
            doc,
            &query,
            &config,
            rule.label(),
            &mut recorder,
            &mut highlighter,
        );
        rule.scan(&mut ctx).unwrap();
        recorder.into_violations()
    }

    fn scan(html: &str) -> Vec<Violation> {
        scan_doc(&DocumentSnapshot::parse(html))
    }

    #[test]
    fn test_viewport_orientation_lock_flagged() {
        let violations =
            scan("<meta name='viewport' content='width=device-width, orientation=landscape'>");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Meta);
    }

    #[test]
    fn test_plain_viewport_passes() {
        assert!(scan("<meta name='viewport' content='width=device-width, initial-scale=1'>")
            .is_empty());
    }

    #[test]
    fn test_one_sided_media_query_flagged() {
        let html = "<style>@media (orientation: portrait) { .content { display: none; } }</style>";
        let violations = scan(html);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Css);
        assert!(violations[0].message.contains("portrait"));
    }

    #[test]
    fn test_both_orientations_styled_passes() {
        let html = "<style>\
            @media (orientation: portrait) { .nav { width: 100%; } }\
            @media (orientation: landscape) { .nav { width: 30%; } }\
        </style>";
        assert!(scan(html).is_empty());
    }

    #[test]
    fn test_cosmetic_media_query_passes() {
        let html = "<style>@media (orientation: landscape) { body { background: gray; } }</style>";
        assert!(scan(html).is_empty());
    }

    #[test]
    fn test_inaccessible_external_sheet_skipped() {
        let doc = DocumentSnapshot::parse(
            "<link rel='stylesheet' href='https://cdn.example.com/app.css'><p>hi</p>",
        );
        assert!(scan_doc(&doc).is_empty());
    }

    #[test]
    fn test_registered_external_sheet_scanned() {
        let mut doc = DocumentSnapshot::parse("<link rel='stylesheet' href='app.css'>");
        doc.register_stylesheet(
            "app.css",
            "@media (orientation: landscape) { main { visibility: hidden; } }",
        );
        let violations = scan_doc(&doc);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("landscape"));
    }

    #[test]
    fn test_quarter_turn_transform_flagged() {
        let violations = scan("<div style='transform: rotate(90deg)'>sideways</div>");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Css);
    }

    #[test]
    fn test_small_rotation_passes() {
        assert!(scan("<div style='transform: rotate(3deg)'>tilt</div>").is_empty());
    }

    #[test]
    fn test_restrictive_orientation_script_flagged() {
        let html = "<script>window.addEventListener('orientationchange', function() { \
                    document.body.style.display = 'none'; return false; });</script>";
        let violations = scan(html);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Script);
    }

    #[test]
    fn test_benign_orientation_script_passes() {
        let html = "<script>screen.orientation.addEventListener('change', relayout);</script>";
        assert!(scan(html).is_empty());
    }

    #[test]
    fn test_rotate_message_flagged() {
        let violations = scan("<p>Please rotate your device to continue</p>");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Content);
    }

    #[test]
    fn test_essential_context_exempt() {
        let html = "<p>Rotate your device to landscape mode to play the piano keyboard</p>";
        assert!(scan(html).is_empty());
    }

    #[test]
    fn test_fallback_scan_viewport_only() {
        let doc = DocumentSnapshot::parse(
            "<meta name='viewport' content='orientation=portrait'>\
             <div style='transform: rotate(90deg)'>x</div>",
        );
        let query = QueryCapability::baseline();
        let config = Config::default().rule_config();
        let mut recorder = ViolationRecorder::new(CATEGORIES);
        let mut highlighter = Highlighter::disabled();
        let rule = OrientationRule;
        let mut ctx = RuleContext::new(
            &doc,
            &query,
            &config,
            rule.label(),
            &mut recorder,
            &mut highlighter,
        );
        rule.fallback_scan(&mut ctx).unwrap();
        let violations = recorder.into_violations();
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Meta);
    }
}
