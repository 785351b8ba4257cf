//! Structural heuristics: text and style shapes that suggest an element
//! is acting as a heading or list without the semantic markup.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::LazyLock;

use crate::core::ComputedStyle;

/// Tunable cutoffs for the structural scorers.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Thresholds {
    /// Font size (px) above which text starts to look like a heading.
    pub min_heading_px: f32,
    /// Font weight at or above which text counts as bold.
    pub bold_weight: u16,
    /// Headings longer than this many characters are assumed to be prose.
    pub max_heading_len: usize,
    /// Headings with this many words or more are assumed to be prose.
    pub max_heading_words: usize,
    /// Minimum number of list-shaped lines before text counts as a list.
    pub min_list_lines: usize,
}

impl Default for Thresholds {
    fn default() -> Self {
        Self {
            min_heading_px: 18.0,
            bold_weight: 700,
            max_heading_len: 200,
            max_heading_words: 10,
            min_list_lines: 3,
        }
    }
}

static BULLET_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[*\-•]\s+\S").expect("static bullet pattern"));
static NUMBERED_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*\d+[.)]\s+\S").expect("static numbered pattern"));
static LETTERED_LINES: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^\s*[a-zA-Z][.)]\s+\S").expect("static lettered pattern"));

/// Short, visually prominent text reads as a heading: large or bold,
/// and not long enough to be a paragraph.
pub fn looks_like_heading(style: &ComputedStyle, text: &str, thresholds: &Thresholds) -> bool {
    let text = text.trim();
    if text.is_empty() || text.len() >= thresholds.max_heading_len {
        return false;
    }
    if text.split_whitespace().count() >= thresholds.max_heading_words {
        return false;
    }
    let large = style
        .font_size
        .map(|px| px > thresholds.min_heading_px)
        .unwrap_or(false);
    let bold = style
        .font_weight
        .map(|w| w >= thresholds.bold_weight)
        .unwrap_or(false);
    large || bold
}

/// Several consecutive bullet-, number- or letter-prefixed lines read as
/// a list that should be `<ul>`/`<ol>` markup.
pub fn looks_like_list(text: &str, thresholds: &Thresholds) -> bool {
    for pattern in [&*BULLET_LINES, &*NUMBERED_LINES, &*LETTERED_LINES] {
        if pattern.find_iter(text).count() >= thresholds.min_list_lines {
            return true;
        }
    }
    false
}
