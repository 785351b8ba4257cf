//! Style access: inline declaration parsing and stylesheet media rules
//!
//! A snapshot has no layout engine, so "computed" style here means the
//! element's inline declarations over a few per-tag defaults. That is
//! enough for the structural heuristics, which only consult font size,
//! font weight and cursor.

use ego_tree::NodeId;
use scraper::ElementRef;

use super::error::StylesheetError;

/// Style signals for one element.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ComputedStyle {
    /// Font size in CSS pixels, when declared in px.
    pub font_size: Option<f32>,
    /// Numeric font weight (`bold` maps to 700, `normal` to 400).
    pub font_weight: Option<u16>,
    pub cursor: Option<String>,
    pub transform: Option<String>,
}

impl ComputedStyle {
    /// Resolve the style signals for an element: tag defaults first,
    /// then inline `style` declarations on top.
    pub fn of(el: ElementRef<'_>) -> Self {
        let mut style = Self::tag_defaults(el.value().name());
        if let Some(inline) = el.value().attr("style") {
            style.merge_declarations(inline);
        }
        style
    }

    fn tag_defaults(tag: &str) -> Self {
        let mut s = Self::default();
        if matches!(tag, "b" | "strong" | "th") {
            s.font_weight = Some(700);
        }
        s
    }

    fn merge_declarations(&mut self, declarations: &str) {
        for decl in declarations.split(';') {
            let Some((name, value)) = decl.split_once(':') else {
                continue;
            };
            let name = name.trim().to_ascii_lowercase();
            let value = value.trim();
            match name.as_str() {
                "font-size" => self.font_size = parse_px(value),
                "font-weight" => self.font_weight = parse_weight(value),
                "cursor" => self.cursor = Some(value.to_ascii_lowercase()),
                "transform" => self.transform = Some(value.to_ascii_lowercase()),
                _ => {}
            }
        }
    }
}

fn parse_px(value: &str) -> Option<f32> {
    value
        .trim()
        .to_ascii_lowercase()
        .strip_suffix("px")?
        .trim()
        .parse()
        .ok()
}

fn parse_weight(value: &str) -> Option<u16> {
    match value.trim().to_ascii_lowercase().as_str() {
        "bold" | "bolder" => Some(700),
        "normal" => Some(400),
        other => other.parse().ok(),
    }
}

/// Where a stylesheet came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StylesheetOrigin {
    /// A `<style>` element body.
    Inline,
    /// A `<link rel="stylesheet">` reference, by href.
    External(String),
}

impl StylesheetOrigin {
    pub fn describe(&self) -> String {
        match self {
            StylesheetOrigin::Inline => "inline <style>".to_string(),
            StylesheetOrigin::External(href) => href.clone(),
        }
    }
}

/// One stylesheet reachable from the document. Access to the body is
/// fallible per sheet: an unregistered external sheet reports
/// [`StylesheetError::Inaccessible`] and the caller skips it.
pub struct Stylesheet {
    owner: NodeId,
    origin: StylesheetOrigin,
    body: Result<String, StylesheetError>,
}

impl Stylesheet {
    pub(crate) fn new(
        owner: NodeId,
        origin: StylesheetOrigin,
        body: Result<String, StylesheetError>,
    ) -> Self {
        Self { owner, origin, body }
    }

    /// The `<style>` or `<link>` element this sheet belongs to.
    pub fn owner(&self) -> NodeId {
        self.owner
    }

    pub fn origin(&self) -> &StylesheetOrigin {
        &self.origin
    }

    pub fn body(&self) -> Result<&str, &StylesheetError> {
        self.body.as_ref().map(String::as_str)
    }

    /// Extract the `@media` rules from this sheet.
    pub fn media_rules(&self) -> Result<Vec<MediaRule>, &StylesheetError> {
        Ok(extract_media_rules(self.body()?))
    }
}

/// An `@media` block: its condition text and its raw body, both lowercased.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaRule {
    pub condition: String,
    pub body: String,
}

/// Scan a stylesheet body for `@media` blocks. A brace-counting scan,
/// not a CSS parser: nested rules stay inside `body` as raw text, which
/// is all the orientation heuristics need.
fn extract_media_rules(css: &str) -> Vec<MediaRule> {
    let mut rules = Vec::new();
    let lower = css.to_ascii_lowercase();
    let bytes = lower.as_bytes();
    let mut i = 0;
    while let Some(at) = lower[i..].find("@media") {
        let start = i + at + "@media".len();
        let Some(open_rel) = lower[start..].find('{') else {
            break;
        };
        let open = start + open_rel;
        let condition = lower[start..open].trim().to_string();

        let mut depth = 1usize;
        let mut j = open + 1;
        while j < bytes.len() && depth > 0 {
            match bytes[j] {
                b'{' => depth += 1,
                b'}' => depth -= 1,
                _ => {}
            }
            j += 1;
        }
        let body_end = j.saturating_sub(1);
        rules.push(MediaRule {
            condition,
            body: lower[open + 1..body_end].trim().to_string(),
        });
        i = j;
    }
    rules
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::DocumentSnapshot;

    #[test]
    fn test_inline_font_declarations() {
        let doc = DocumentSnapshot::parse(
            r#"<div style="font-size: 24px; font-weight: bold">Big</div>"#,
        );
        let style = ComputedStyle::of(doc.select_tag("div")[0]);
        assert_eq!(style.font_size, Some(24.0));
        assert_eq!(style.font_weight, Some(700));
    }

    #[test]
    fn test_numeric_weight_and_cursor() {
        let doc = DocumentSnapshot::parse(r#"<div style="font-weight:650;cursor: Pointer">x</div>"#);
        let style = ComputedStyle::of(doc.select_tag("div")[0]);
        assert_eq!(style.font_weight, Some(650));
        assert_eq!(style.cursor.as_deref(), Some("pointer"));
    }

    #[test]
    fn test_strong_defaults_bold() {
        let doc = DocumentSnapshot::parse("<strong>x</strong><span>y</span>");
        assert_eq!(ComputedStyle::of(doc.select_tag("strong")[0]).font_weight, Some(700));
        assert_eq!(ComputedStyle::of(doc.select_tag("span")[0]).font_weight, None);
    }

    #[test]
    fn test_non_px_font_size_ignored() {
        let doc = DocumentSnapshot::parse(r#"<div style="font-size: 2em">x</div>"#);
        assert_eq!(ComputedStyle::of(doc.select_tag("div")[0]).font_size, None);
    }

    #[test]
    fn test_extract_media_rules() {
        let css = r#"
            body { margin: 0; }
            @media (orientation: portrait) {
                .sidebar { display: none; }
            }
            @media screen and (max-width: 600px) { .a { width: 100%; } }
        "#;
        let rules = extract_media_rules(css);
        assert_eq!(rules.len(), 2);
        assert_eq!(rules[0].condition, "(orientation: portrait)");
        assert!(rules[0].body.contains("display: none"));
        assert!(rules[1].condition.contains("max-width"));
    }

    #[test]
    fn test_extract_media_rules_nested_braces() {
        let css = "@media (orientation: landscape) { @supports (display: grid) { .g { display: grid; } } } .after { color: red; }";
        let rules = extract_media_rules(css);
        assert_eq!(rules.len(), 1);
        assert!(rules[0].body.contains("@supports"));
        assert!(!rules[0].body.contains(".after"));
    }

    #[test]
    fn test_unterminated_media_block() {
        let rules = extract_media_rules("@media (orientation: portrait) { .x { color: red; }");
        assert_eq!(rules.len(), 1);
        assert!(rules[0].body.contains("color: red"));
    }
}
