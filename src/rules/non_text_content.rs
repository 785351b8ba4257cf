//! WCAG 1.1.1 Non-text Content (Level A)
//!
//! Images need alt text, media embeds need an accessible name, and
//! interactive controls need a textual label. An explicit decorative
//! marking (`role="presentation"`, `role="none"`, `aria-hidden="true"`)
//! is an absolute opt-out: such elements are skipped even when every
//! other signal says they should be flagged.

use scraper::ElementRef;

use crate::core::{Category, NodeExt, ScanError, Violation};

use super::{Rule, RuleContext};

pub struct NonTextContentRule;

const CATEGORIES: &[Category] = &[Category::Image, Category::Media, Category::Interactive];

impl Rule for NonTextContentRule {
    fn id(&self) -> &'static str {
        "WCAG-1.1.1"
    }

    fn guideline(&self) -> &'static str {
        "1.1.1 Non-text Content"
    }

    fn label(&self) -> &'static str {
        "WCAG 1.1.1"
    }

    fn categories(&self) -> &'static [Category] {
        CATEGORIES
    }

    fn scan(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        self.check_images(ctx)?;
        self.check_media(ctx)?;
        self.check_interactive(ctx)?;
        Ok(())
    }

    /// Reduced pass: images are the highest-value check and the only
    /// one attempted after a primary scan failure.
    fn fallback_scan(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        self.check_images(ctx)?;
        Ok(())
    }
}

impl NonTextContentRule {
    fn check_images(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for img in ctx.query.select_all(ctx.doc, "img")? {
            if is_opted_out(&img) {
                continue;
            }
            let violation = match img.attr_trim("alt") {
                None => Violation::new(
                    img.node_id(),
                    ctx.doc.node_path(img),
                    Category::Image,
                    self.id(),
                    "Image has no alt attribute",
                )
                .with_suggestion("Add descriptive alt text, or mark the image decorative"),
                Some("") => Violation::new(
                    img.node_id(),
                    ctx.doc.node_path(img),
                    Category::Image,
                    self.id(),
                    "Image has empty alt text but is not marked decorative",
                )
                .with_suggestion("Describe the image, or add role=\"presentation\" if decorative"),
                Some(_) => continue,
            };
            let violation = match img.attr_trim("src") {
                Some(src) if !src.is_empty() => violation.with_evidence("src", src),
                _ => violation,
            };
            ctx.report(violation);
        }
        Ok(())
    }

    fn check_media(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for media in ctx
            .query
            .select_all(ctx.doc, "video, audio, canvas, svg, object, embed")?
        {
            if is_opted_out(&media) {
                continue;
            }
            if has_accessible_name(&media) {
                continue;
            }
            // A captioned video carries its own text alternative.
            if media.tag() == "video" && has_text_track(&media) {
                continue;
            }
            // Object/canvas fallback content counts as an alternative.
            if matches!(media.tag(), "object" | "canvas") && !media.full_text().trim().is_empty() {
                continue;
            }
            ctx.report(
                Violation::new(
                    media.node_id(),
                    ctx.doc.node_path(media),
                    Category::Media,
                    self.id(),
                    format!("<{}> element has no accessible name", media.tag()),
                )
                .with_evidence("tag", media.tag())
                .with_suggestion("Add aria-label, a title, or fallback content describing the media"),
            );
        }
        Ok(())
    }

    fn check_interactive(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for control in ctx
            .query
            .select_all(ctx.doc, "button, a, area, input[type=image]")?
        {
            if is_opted_out(&control) {
                continue;
            }
            let named = match control.tag() {
                "input" => {
                    control.attr_trim("alt").is_some_and(|v| !v.is_empty())
                        || control.attr_trim("value").is_some_and(|v| !v.is_empty())
                        || has_accessible_name(&control)
                }
                "area" => {
                    control.attr_trim("alt").is_some_and(|v| !v.is_empty())
                        || has_accessible_name(&control)
                }
                _ => {
                    !control.full_text().trim().is_empty()
                        || has_accessible_name(&control)
                        || control
                            .descendant_elements()
                            .iter()
                            .any(|d| d.tag() == "img" && d.attr_trim("alt").is_some_and(|v| !v.is_empty()))
                }
            };
            if named {
                continue;
            }
            // Bare anchors without href are not interactive.
            if control.tag() == "a" && control.attr_trim("href").is_none() {
                continue;
            }
            ctx.report(
                Violation::new(
                    control.node_id(),
                    ctx.doc.node_path(control),
                    Category::Interactive,
                    self.id(),
                    format!("<{}> control has no text alternative", control.tag()),
                )
                .with_evidence("tag", control.tag())
                .with_suggestion("Give the control visible text or an aria-label"),
            );
        }
        Ok(())
    }
}

fn is_opted_out(el: &ElementRef<'_>) -> bool {
    el.is_decorative() || el.attr_trim("aria-hidden") == Some("true")
}

fn has_accessible_name(el: &ElementRef<'_>) -> bool {
    el.attr_trim("aria-label").is_some_and(|v| !v.is_empty())
        || el.attr_trim("aria-labelledby").is_some_and(|v| !v.is_empty())
        || el.attr_trim("title").is_some_and(|v| !v.is_empty())
}

fn has_text_track(video: &ElementRef<'_>) -> bool {
    video.descendant_elements().iter().any(|d| {
        d.tag() == "track"
            && matches!(
                d.attr_trim("kind"),
                Some("captions") | Some("subtitles") | Some("descriptions")
            )
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::core::{DocumentSnapshot, Highlighter, QueryCapability, ViolationRecorder};

    fn scan(html: &str) -> Vec<Violation> {
        let doc = DocumentSnapshot::parse(html);
        let query = QueryCapability::enhanced();
        let config = Config::default().rule_config();
        let mut recorder = ViolationRecorder::new(CATEGORIES);
        let mut highlighter = Highlighter::disabled();
        let rule = NonTextContentRule;
        let mut ctx = RuleContext::new(
            &doc,
            &query,
            &config,
            rule.label(),
            &mut recorder,
            &mut highlighter,
        );
        rule.scan(&mut ctx).unwrap();
        recorder.into_violations()
    }

    #[test]
    fn test_missing_alt_flagged() {
        let violations = scan("<img src='logo.png'>");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Image);
        assert!(violations[0].message.contains("no alt attribute"));
        assert_eq!(violations[0].evidence.get("src").map(String::as_str), Some("logo.png"));
    }

    #[test]
    fn test_empty_alt_without_decorative_marking_flagged() {
        let violations = scan("<img src='x.png' alt=''>");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("empty alt"));
    }

    #[test]
    fn test_decorative_opt_out_is_absolute() {
        let violations = scan(
            "<img src='a.png' alt='' role='presentation'>\
             <img src='b.png' role='none'>\
             <img src='c.png' aria-hidden='true'>",
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_good_alt_passes() {
        assert!(scan("<img src='x.png' alt='Company logo'>").is_empty());
    }

    #[test]
    fn test_video_without_name_or_track_flagged() {
        let violations = scan("<video src='clip.mp4'></video>");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].category, Category::Media);
    }

    #[test]
    fn test_video_with_caption_track_passes() {
        let html = "<video src='clip.mp4'><track kind='captions' src='c.vtt'></video>";
        assert!(scan(html).is_empty());
    }

    #[test]
    fn test_object_fallback_content_passes() {
        assert!(scan("<object data='x.pdf'>Quarterly report (PDF)</object>").is_empty());
    }

    #[test]
    fn test_empty_button_and_link_flagged() {
        let violations = scan("<button></button><a href='/next'></a>");
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| v.category == Category::Interactive));
    }

    #[test]
    fn test_link_with_img_alt_passes() {
        assert!(scan("<a href='/'><img src='h.png' alt='Home'></a>").is_empty());
    }

    #[test]
    fn test_image_input_needs_alt() {
        let violations = scan("<input type='image' src='go.png'>");
        assert_eq!(violations.len(), 1);
        assert!(scan("<input type='image' src='go.png' alt='Search'>").is_empty());
    }

    #[test]
    fn test_fallback_scan_images_only() {
        let doc = DocumentSnapshot::parse("<img src='a.png'><button></button>");
        let query = QueryCapability::baseline();
        let config = Config::default().rule_config();
        let mut recorder = ViolationRecorder::new(CATEGORIES);
        let mut highlighter = Highlighter::disabled();
        let rule = NonTextContentRule;
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
        assert_eq!(violations[0].category, Category::Image);
    }
}
