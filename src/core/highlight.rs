//! Visual marking of flagged nodes
//!
//! The snapshot tree is immutable, so "in-place" marking is an overlay
//! keyed by node handle: the category's visual style, a machine-readable
//! marker attribute, and an accumulating human hint. [`Highlighter::annotate`]
//! serializes the document with the overlay merged in, which is the
//! crate's visible output. The overlay lives for the whole audit, so a
//! later rule sees (and appends to) the marks an earlier rule left.

use ego_tree::{NodeId, NodeRef};
use scraper::Node;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap, HashSet};

use super::document::DocumentSnapshot;
use super::types::Category;

/// Machine-readable marker attribute set on flagged nodes.
pub const MARKER_ATTR: &str = "data-wcag-violation";

/// Delimiter between accumulated hint entries.
pub const HINT_DELIMITER: &str = " | ";

/// Visual property assignments for one category.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualStyle {
    pub border: String,
    pub box_shadow: String,
}

impl VisualStyle {
    pub fn new(border: impl Into<String>, box_shadow: impl Into<String>) -> Self {
        Self {
            border: border.into(),
            box_shadow: box_shadow.into(),
        }
    }

    fn css_text(&self) -> String {
        format!("border: {}; box-shadow: {}", self.border, self.box_shadow)
    }
}

#[derive(Default)]
struct NodeMarks {
    style: Option<String>,
    marker: String,
    hints: Vec<String>,
    seen: HashSet<String>,
}

/// Best-effort visual feedback. Never errors: a category without a
/// configured style skips the style and still records the hint, and
/// marking is idempotent per (node, rule, message).
pub struct Highlighter {
    enabled: bool,
    styles: BTreeMap<Category, VisualStyle>,
    marks: HashMap<NodeId, NodeMarks>,
}

impl Highlighter {
    pub fn new(styles: BTreeMap<Category, VisualStyle>) -> Self {
        Self {
            enabled: true,
            styles,
            marks: HashMap::new(),
        }
    }

    /// A highlighter that records nothing, for runs with highlighting
    /// disabled in config.
    pub fn disabled() -> Self {
        Self {
            enabled: false,
            styles: BTreeMap::new(),
            marks: HashMap::new(),
        }
    }

    /// Mark a node. `label` is the rule's human label (`"WCAG 1.3.5"`),
    /// prefixed onto the hint entry so hints from different rules stay
    /// attributable.
    pub fn mark(&mut self, node: NodeId, label: &str, category: Category, message: &str) {
        if !self.enabled {
            return;
        }
        let style = self.styles.get(&category).map(VisualStyle::css_text);
        let marks = self.marks.entry(node).or_default();
        if let Some(css) = style {
            marks.style = Some(css);
        }
        marks.marker = message.to_string();
        let entry = format!("{}: {}", label, message);
        if marks.seen.insert(entry.clone()) {
            marks.hints.push(entry);
        }
    }

    pub fn is_marked(&self, node: NodeId) -> bool {
        self.marks.contains_key(&node)
    }

    pub fn marked_count(&self) -> usize {
        self.marks.len()
    }

    /// Current machine marker for a node (most recent message).
    pub fn marker(&self, node: NodeId) -> Option<&str> {
        self.marks.get(&node).map(|m| m.marker.as_str())
    }

    /// Accumulated hint text for a node, oldest entry first.
    pub fn hint(&self, node: NodeId) -> Option<String> {
        self.marks
            .get(&node)
            .filter(|m| !m.hints.is_empty())
            .map(|m| m.hints.join(HINT_DELIMITER))
    }

    /// Serialize the document with the overlay merged in: flagged
    /// elements gain the category style, the marker attribute, and a
    /// `title` hint (appended to any existing title, never overwriting).
    pub fn annotate(&self, doc: &DocumentSnapshot) -> String {
        let mut out = String::new();
        let root = *doc.root();
        if let Some(parent) = root.parent() {
            // Serialize from the document node so doctype/comments survive.
            for child in parent.children() {
                self.serialize_node(child, &mut out);
            }
        } else {
            self.serialize_node(root, &mut out);
        }
        out
    }

    fn serialize_node(&self, node: NodeRef<'_, Node>, out: &mut String) {
        match node.value() {
            Node::Document | Node::Fragment => {
                for child in node.children() {
                    self.serialize_node(child, out);
                }
            }
            Node::Doctype(doctype) => {
                out.push_str("<!DOCTYPE ");
                out.push_str(&doctype.name());
                out.push('>');
            }
            Node::Comment(comment) => {
                out.push_str("<!--");
                out.push_str(comment);
                out.push_str("-->");
            }
            Node::Text(text) => {
                let raw = node
                    .parent()
                    .and_then(|p| p.value().as_element().map(|e| e.name().to_string()))
                    .map(|name| matches!(name.as_str(), "script" | "style"))
                    .unwrap_or(false);
                if raw {
                    out.push_str(text);
                } else {
                    out.push_str(&escape_text(text));
                }
            }
            Node::Element(element) => {
                let name = element.name();
                out.push('<');
                out.push_str(name);
                for (attr_name, value) in self.merged_attributes(node) {
                    out.push(' ');
                    out.push_str(&attr_name);
                    out.push_str("=\"");
                    out.push_str(&escape_attr(&value));
                    out.push('"');
                }
                out.push('>');
                if is_void_element(name) {
                    return;
                }
                for child in node.children() {
                    self.serialize_node(child, out);
                }
                out.push_str("</");
                out.push_str(name);
                out.push('>');
            }
            _ => {}
        }
    }

    fn merged_attributes(&self, node: NodeRef<'_, Node>) -> Vec<(String, String)> {
        let element = match node.value().as_element() {
            Some(el) => el,
            None => return Vec::new(),
        };
        let mut attrs: Vec<(String, String)> = element
            .attrs()
            .map(|(n, v)| (n.to_string(), v.to_string()))
            .collect();
        let Some(marks) = self.marks.get(&node.id()) else {
            return attrs;
        };

        if let Some(css) = &marks.style {
            merge_attr(&mut attrs, "style", css, "; ");
        }
        set_attr(&mut attrs, MARKER_ATTR, &marks.marker);
        if !marks.hints.is_empty() {
            merge_attr(&mut attrs, "title", &marks.hints.join(HINT_DELIMITER), HINT_DELIMITER);
        }
        attrs
    }
}

fn set_attr(attrs: &mut Vec<(String, String)>, name: &str, value: &str) {
    if let Some(existing) = attrs.iter_mut().find(|(n, _)| n == name) {
        existing.1 = value.to_string();
    } else {
        attrs.push((name.to_string(), value.to_string()));
    }
}

fn merge_attr(attrs: &mut Vec<(String, String)>, name: &str, addition: &str, delimiter: &str) {
    if let Some(existing) = attrs.iter_mut().find(|(n, _)| n == name) {
        if existing.1.is_empty() {
            existing.1 = addition.to_string();
        } else {
            existing.1 = format!("{}{}{}", existing.1, delimiter, addition);
        }
    } else {
        attrs.push((name.to_string(), addition.to_string()));
    }
}

fn is_void_element(name: &str) -> bool {
    matches!(
        name,
        "area" | "base" | "br" | "col" | "embed" | "hr" | "img" | "input" | "link" | "meta"
            | "param" | "source" | "track" | "wbr"
    )
}

fn escape_text(text: &str) -> String {
    text.replace('&', "&amp;").replace('<', "&lt;").replace('>', "&gt;")
}

fn escape_attr(value: &str) -> String {
    escape_text(value).replace('"', "&quot;")
}
