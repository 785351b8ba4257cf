//! WCAG 1.2 Time-based Media (captions and transcripts)
//!
//! Videos need caption tracks, synchronized audio needs a transcript,
//! and embedded players from known providers need captions enabled.
//! A declared media alternative (`data-text-alternative="true"`, an
//! aria-label announcing a text alternative, or a
//! `.text-alternative-note` in the surrounding container) opts the
//! element out of every check here.

use regex::Regex;
use scraper::ElementRef;
use std::sync::LazyLock;
use tracing::warn;

use crate::core::{Category, NodeExt, ScanError, Violation};

use super::{Rule, RuleContext};

pub struct CaptionsRule;

const CATEGORIES: &[Category] = &[Category::Video, Category::Audio, Category::Embedded];

static ALTERNATIVE_LABEL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)alternative.*text|text.*alternative").expect("static alternative pattern")
});

static CAPTIONED_PROVIDER_URL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)[?&](cc_load_policy=1|captions=1|cc=1)\b").expect("static provider pattern")
});

static PROVIDER_HOSTS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)youtube|youtu\.be|vimeo|dailymotion|wistia|brightcove")
        .expect("static host pattern")
});

impl Rule for CaptionsRule {
    fn id(&self) -> &'static str {
        "WCAG-1.2"
    }

    fn guideline(&self) -> &'static str {
        "1.2 Time-based Media"
    }

    fn label(&self) -> &'static str {
        "WCAG 1.2"
    }

    fn categories(&self) -> &'static [Category] {
        CATEGORIES
    }

    fn scan(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        self.check_videos(ctx)?;
        self.check_synchronized_audio(ctx)?;
        self.check_embedded_players(ctx)?;
        Ok(())
    }

    fn fallback_scan(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        self.check_videos(ctx)?;
        Ok(())
    }
}

impl CaptionsRule {
    fn check_videos(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for video in ctx.query.select_all(ctx.doc, "video")? {
            if has_media_alternative(ctx, &video) {
                continue;
            }
            if has_caption_track(&video)
                || video.attr_trim("data-captions") == Some("true")
                || video.attr_trim("aria-describedby").is_some_and(|v| !v.is_empty())
                || container_has_captions(ctx, &video)
            {
                continue;
            }
            ctx.report(
                Violation::new(
                    video.node_id(),
                    ctx.doc.node_path(video),
                    Category::Video,
                    self.id(),
                    "Video has no captions",
                )
                .with_suggestion("Add a <track kind=\"captions\"> with synchronized captions"),
            );
        }
        Ok(())
    }

    fn check_synchronized_audio(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for audio in ctx.query.select_all(ctx.doc, "audio")? {
            if has_media_alternative(ctx, &audio) {
                continue;
            }
            if !is_synchronized(ctx, &audio) {
                // Audio-only content is covered by transcript guidance
                // elsewhere; only synchronized audio is in scope here.
                continue;
            }
            if has_transcript(ctx, &audio) {
                continue;
            }
            ctx.report(
                Violation::new(
                    audio.node_id(),
                    ctx.doc.node_path(audio),
                    Category::Audio,
                    self.id(),
                    "Synchronized audio has no captions or transcript",
                )
                .with_suggestion("Provide captions or link a transcript next to the audio"),
            );
        }
        Ok(())
    }

    fn check_embedded_players(&self, ctx: &mut RuleContext<'_>) -> Result<(), ScanError> {
        for frame in ctx.query.select_all(ctx.doc, "iframe")? {
            let Some(src) = frame.attr_trim("src") else {
                continue;
            };
            if !PROVIDER_HOSTS.is_match(src) {
                continue;
            }
            if has_media_alternative(ctx, &frame) {
                continue;
            }
            if CAPTIONED_PROVIDER_URL.is_match(src)
                || frame.attr_trim("data-captions") == Some("true")
            {
                continue;
            }
            ctx.report(
                Violation::new(
                    frame.node_id(),
                    ctx.doc.node_path(frame),
                    Category::Embedded,
                    self.id(),
                    "Embedded video may not have captions enabled",
                )
                .with_evidence("src", src)
                .with_suggestion("Enable captions in the embed URL (e.g. cc_load_policy=1)"),
            );
        }
        Ok(())
    }
}

fn has_media_alternative(ctx: &RuleContext<'_>, el: &ElementRef<'_>) -> bool {
    if el.attr_trim("data-text-alternative") == Some("true") {
        return true;
    }
    if el
        .attr_trim("aria-label")
        .is_some_and(|label| ALTERNATIVE_LABEL.is_match(label))
    {
        return true;
    }
    if el.has_sibling_with_class("text-alternative-note") {
        return true;
    }
    if let Some(container) = ctx.query.closest(*el, ".media-container") {
        if container.has_descendant_with_class("text-alternative-note") {
            return true;
        }
    }
    false
}

/// Caption or subtitle track. Tracks missing `src` or `srclang` are
/// still accepted but logged, since the markup intent is clear.
fn has_caption_track(video: &ElementRef<'_>) -> bool {
    for track in video.descendant_elements() {
        if track.tag() != "track" {
            continue;
        }
        if !matches!(track.attr_trim("kind"), Some("captions") | Some("subtitles")) {
            continue;
        }
        if track.attr_trim("src").is_none_or(str::is_empty) {
            warn!(node = "track", "caption track has no src");
        }
        if track.attr_trim("srclang").is_none_or(str::is_empty) {
            warn!(node = "track", "caption track has no srclang");
        }
        return true;
    }
    false
}

fn container_has_captions(ctx: &RuleContext<'_>, video: &ElementRef<'_>) -> bool {
    let Some(container) = ctx.query.closest(*video, ".video-container") else {
        return false;
    };
    container.has_descendant_with_class("captions")
        || container.has_descendant_with_class("subtitles")
}

/// Audio that accompanies visual content: inside a known media
/// container, explicitly flagged, or presented next to imagery.
fn is_synchronized(ctx: &RuleContext<'_>, audio: &ElementRef<'_>) -> bool {
    if audio.attr_trim("data-synchronized") == Some("true") {
        return true;
    }
    for container in [".video-container", ".media-player", ".slideshow"] {
        if ctx.query.closest(*audio, container).is_some() {
            return true;
        }
    }
    audio
        .sibling_elements()
        .iter()
        .any(|s| matches!(s.tag(), "img" | "canvas" | "svg"))
}

fn has_transcript(ctx: &RuleContext<'_>, audio: &ElementRef<'_>) -> bool {
    if audio.attr_trim("aria-describedby").is_some_and(|v| !v.is_empty()) {
        return true;
    }
    if audio.attr_trim("data-transcript").is_some() {
        return true;
    }
    if audio.has_sibling_with_class("transcript") {
        return true;
    }
    for container in [".video-container", ".media-player", ".slideshow"] {
        if let Some(scope) = ctx.query.closest(*audio, container) {
            if scope.has_descendant_with_class("transcript") {
                return true;
            }
        }
    }
    // A nearby link that mentions a transcript also satisfies the check.
    audio.sibling_elements().iter().any(|s| {
        s.tag() == "a" && s.full_text().to_lowercase().contains("transcript")
    })
}
