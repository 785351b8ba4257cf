//! Core types for WCAG audits

use ego_tree::NodeId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Violation category.
///
/// A single closed enumeration across all rules; each rule declares the
/// subset it may emit via [`crate::rules::Rule::categories`], and the
/// recorder asserts membership in debug builds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    // Input purpose (1.3.5)
    Personal,
    Contact,
    Address,
    Payment,
    Other,
    // Non-text content (1.1.1)
    Image,
    Media,
    Interactive,
    // Time-based media (1.2)
    Video,
    Audio,
    Embedded,
    // Info and relationships (1.3.1)
    Heading,
    List,
    Table,
    Form,
    Semantic,
    // Orientation (1.3.4)
    Css,
    Meta,
    Script,
    Content,
}

impl Category {
    /// Every category, in declaration order.
    pub const ALL: &'static [Category] = &[
        Category::Personal,
        Category::Contact,
        Category::Address,
        Category::Payment,
        Category::Other,
        Category::Image,
        Category::Media,
        Category::Interactive,
        Category::Video,
        Category::Audio,
        Category::Embedded,
        Category::Heading,
        Category::List,
        Category::Table,
        Category::Form,
        Category::Semantic,
        Category::Css,
        Category::Meta,
        Category::Script,
        Category::Content,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Personal => "personal",
            Category::Contact => "contact",
            Category::Address => "address",
            Category::Payment => "payment",
            Category::Other => "other",
            Category::Image => "image",
            Category::Media => "media",
            Category::Interactive => "interactive",
            Category::Video => "video",
            Category::Audio => "audio",
            Category::Embedded => "embedded",
            Category::Heading => "heading",
            Category::List => "list",
            Category::Table => "table",
            Category::Form => "form",
            Category::Semantic => "semantic",
            Category::Css => "css",
            Category::Meta => "meta",
            Category::Script => "script",
            Category::Content => "content",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Category::Personal => "Personal Info",
            Category::Contact => "Contact Info",
            Category::Address => "Address Info",
            Category::Payment => "Payment Info",
            Category::Other => "Other",
            Category::Image => "Images",
            Category::Media => "Media",
            Category::Interactive => "Interactive",
            Category::Video => "Videos",
            Category::Audio => "Synchronized Audio",
            Category::Embedded => "Embedded Videos",
            Category::Heading => "Headings",
            Category::List => "Lists",
            Category::Table => "Tables",
            Category::Form => "Forms",
            Category::Semantic => "Semantic",
            Category::Css => "CSS",
            Category::Meta => "Meta",
            Category::Script => "Scripts",
            Category::Content => "Content",
        }
    }
}

/// Output of the classifier library's purpose matcher.
///
/// Invariant: `purpose` is `None` exactly when `matched` is false.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassificationResult {
    pub matched: bool,
    pub purpose: Option<&'static str>,
    pub category: Option<Category>,
}

impl ClassificationResult {
    pub fn matched(category: Category, purpose: &'static str) -> Self {
        Self {
            matched: true,
            purpose: Some(purpose),
            category: Some(category),
        }
    }

    pub fn unmatched() -> Self {
        Self {
            matched: false,
            purpose: None,
            category: None,
        }
    }
}

/// A single recorded accessibility violation.
///
/// Created once per detected issue and never mutated afterwards. The node
/// handle belongs to the live document tree; `locator` is a CSS-like path
/// captured at record time so reports stay readable on their own.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Violation {
    #[serde(skip)]
    pub node: NodeId,
    pub locator: String,
    pub category: Category,
    pub rule: String,
    pub message: String,
    pub evidence: BTreeMap<String, String>,
    pub suggestion: Option<String>,
}

impl Violation {
    pub fn new(
        node: NodeId,
        locator: impl Into<String>,
        category: Category,
        rule: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            node,
            locator: locator.into(),
            category,
            rule: rule.into(),
            message: message.into(),
            evidence: BTreeMap::new(),
            suggestion: None,
        }
    }

    pub fn with_evidence(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.evidence.insert(key.into(), value.into());
        self
    }

    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }
}

/// Per-rule aggregate derived from the recorder's final state.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RunSummary {
    pub rule: String,
    pub guideline: String,
    pub counts: BTreeMap<Category, usize>,
    pub total: usize,
    pub fallback_used: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DocumentSnapshot, NodeExt};

    #[test]
    fn test_category_round_trip_names() {
        assert_eq!(Category::Personal.as_str(), "personal");
        assert_eq!(Category::Image.as_str(), "image");
        assert_eq!(Category::Css.display_name(), "CSS");
    }

    #[test]
    fn test_classification_invariant() {
        let r = ClassificationResult::unmatched();
        assert!(!r.matched);
        assert!(r.purpose.is_none());
        assert!(r.category.is_none());

        let r = ClassificationResult::matched(Category::Contact, "email");
        assert!(r.matched);
        assert_eq!(r.purpose, Some("email"));
        assert_eq!(r.category, Some(Category::Contact));
    }

    #[test]
    fn test_violation_builder() {
        let doc = DocumentSnapshot::parse("<img>");
        let node = doc.select_tag("img")[0].node_id();
        let v = Violation::new(node, "body > img", Category::Image, "WCAG-1.1.1", "Missing alt text")
            .with_evidence("src", "logo.png")
            .with_suggestion("Add descriptive alt text");
        assert_eq!(v.category, Category::Image);
        assert_eq!(v.evidence.get("src").map(String::as_str), Some("logo.png"));
        assert!(v.suggestion.unwrap().contains("alt"));
    }
}
