//! Read-only snapshot accessor over a parsed HTML document
//!
//! Rules never mutate the tree; the only write path in the whole crate is
//! the highlighter's marker overlay. Node identity is `ego_tree::NodeId`,
//! which stays valid for the life of the snapshot.

use ego_tree::NodeId;
use scraper::{ElementRef, Html, Node, Selector};
use std::collections::HashMap;

use super::error::StylesheetError;
use super::style::{Stylesheet, StylesheetOrigin};

/// A parsed HTML document plus any registered external stylesheet bodies.
pub struct DocumentSnapshot {
    html: Html,
    /// Bodies of external sheets the embedder fetched for us, by href.
    /// Unregistered hrefs behave like cross-origin sheets: inaccessible.
    external_sheets: HashMap<String, String>,
}

impl DocumentSnapshot {
    /// Parse an HTML source string. Parsing is lenient and never fails;
    /// malformed markup is recovered the way a browser would recover it.
    pub fn parse(source: &str) -> Self {
        Self {
            html: Html::parse_document(source),
            external_sheets: HashMap::new(),
        }
    }

    /// Register the body of an external stylesheet so the audit can
    /// inspect it. Sheets that are never registered are reported as
    /// inaccessible and skipped.
    pub fn register_stylesheet(&mut self, href: impl Into<String>, body: impl Into<String>) {
        self.external_sheets.insert(href.into(), body.into());
    }

    /// The document's root element (`<html>`).
    pub fn root(&self) -> ElementRef<'_> {
        self.html.root_element()
    }

    /// Resolve a node handle back to an element, if it still names one.
    pub fn element(&self, id: NodeId) -> Option<ElementRef<'_>> {
        self.html.tree.get(id).and_then(ElementRef::wrap)
    }

    /// Run a compiled selector over the whole document.
    pub fn select<'a>(&'a self, selector: &Selector) -> Vec<ElementRef<'a>> {
        self.html.select(selector).collect()
    }

    /// All elements with the given tag name, in document order.
    pub fn select_tag<'a>(&'a self, tag: &str) -> Vec<ElementRef<'a>> {
        self.all_elements()
            .into_iter()
            .filter(|el| el.value().name() == tag)
            .collect()
    }

    /// Every element in the document, in document order.
    pub fn all_elements(&self) -> Vec<ElementRef<'_>> {
        self.root()
            .descendants()
            .filter_map(ElementRef::wrap)
            .collect()
    }

    /// Find an element by its `id` attribute. Works without any query
    /// capability, so label resolution is available to fallback scans.
    pub fn element_by_id<'a>(&'a self, id: &str) -> Option<ElementRef<'a>> {
        self.all_elements()
            .into_iter()
            .find(|el| el.value().attr("id") == Some(id))
    }

    /// All stylesheets reachable from the document, in document order:
    /// inline `<style>` bodies plus `<link rel="stylesheet">` references.
    pub fn stylesheets(&self) -> Vec<Stylesheet> {
        let mut sheets = Vec::new();
        for el in self.all_elements() {
            match el.value().name() {
                "style" => {
                    sheets.push(Stylesheet::new(
                        el.id(),
                        StylesheetOrigin::Inline,
                        Ok(el.text().collect::<String>()),
                    ));
                }
                "link" => {
                    let rel = el.value().attr("rel").unwrap_or("");
                    if !rel.eq_ignore_ascii_case("stylesheet") {
                        continue;
                    }
                    let href = el.value().attr("href").unwrap_or("").to_string();
                    let body = self
                        .external_sheets
                        .get(&href)
                        .cloned()
                        .ok_or_else(|| StylesheetError::Inaccessible(href.clone()));
                    sheets.push(Stylesheet::new(el.id(), StylesheetOrigin::External(href), body));
                }
                _ => {}
            }
        }
        sheets
    }

    /// CSS-like path for a node, captured into violations so reports stay
    /// readable without live tree access. Example: `body > form > input:nth-child(2)`.
    pub fn node_path(&self, el: ElementRef<'_>) -> String {
        let mut parts = Vec::new();
        let mut current = Some(el);
        while let Some(e) = current {
            parts.push(Self::path_segment(e));
            current = e.parent().and_then(ElementRef::wrap);
        }
        parts.reverse();
        parts.join(" > ")
    }

    fn path_segment(el: ElementRef<'_>) -> String {
        let tag = el.value().name();
        let siblings = el
            .parent()
            .map(|p| p.children().filter(|n| n.value().is_element()).count())
            .unwrap_or(1);
        if siblings <= 1 {
            return tag.to_string();
        }
        let index = el
            .prev_siblings()
            .filter(|n| n.value().is_element())
            .count()
            + 1;
        format!("{}:nth-child({})", tag, index)
    }
}

/// Extension trait for element handles
pub trait NodeExt<'a> {
    /// This element's node handle.
    fn node_id(&self) -> NodeId;

    /// Lowercase tag name.
    fn tag(&self) -> &'a str;

    /// Attribute value with surrounding whitespace trimmed; `None` when
    /// the attribute is absent (an empty attribute is `Some("")`).
    fn attr_trim(&self, name: &str) -> Option<&'a str>;

    /// Concatenated text of this element and its descendants.
    fn full_text(&self) -> String;

    /// Text belonging directly to this element (child text nodes only).
    fn own_text(&self) -> String;

    /// Explicitly marked decorative (`role="presentation"` / `role="none"`).
    fn is_decorative(&self) -> bool;

    /// Child elements, in order.
    fn direct_children(&self) -> Vec<ElementRef<'a>>;

    /// Descendant elements, excluding self, in document order.
    fn descendant_elements(&self) -> Vec<ElementRef<'a>>;

    /// Sibling elements on either side, excluding self.
    fn sibling_elements(&self) -> Vec<ElementRef<'a>>;

    /// Whether any sibling or descendant-of-sibling carries the class.
    fn has_sibling_with_class(&self, class: &str) -> bool;

    /// Whether any descendant carries the class.
    fn has_descendant_with_class(&self, class: &str) -> bool;
}

impl<'a> NodeExt<'a> for ElementRef<'a> {
    fn node_id(&self) -> NodeId {
        self.id()
    }

    fn tag(&self) -> &'a str {
        self.value().name()
    }

    fn attr_trim(&self, name: &str) -> Option<&'a str> {
        self.value().attr(name).map(str::trim)
    }

    fn full_text(&self) -> String {
        self.text().collect::<String>()
    }

    fn own_text(&self) -> String {
        self.children()
            .filter_map(|n| match n.value() {
                Node::Text(t) => Some(t.to_string()),
                _ => None,
            })
            .collect::<String>()
    }

    fn is_decorative(&self) -> bool {
        matches!(self.value().attr("role"), Some("presentation") | Some("none"))
    }

    fn direct_children(&self) -> Vec<ElementRef<'a>> {
        self.children().filter_map(ElementRef::wrap).collect()
    }

    fn descendant_elements(&self) -> Vec<ElementRef<'a>> {
        self.descendants()
            .skip(1)
            .filter_map(ElementRef::wrap)
            .collect()
    }

    fn sibling_elements(&self) -> Vec<ElementRef<'a>> {
        self.prev_siblings()
            .filter_map(ElementRef::wrap)
            .chain(self.next_siblings().filter_map(ElementRef::wrap))
            .collect()
    }

    fn has_sibling_with_class(&self, class: &str) -> bool {
        self.sibling_elements().iter().any(|s| {
            has_class(s, class) || s.has_descendant_with_class(class)
        })
    }

    fn has_descendant_with_class(&self, class: &str) -> bool {
        self.descendant_elements()
            .iter()
            .any(|d| has_class(d, class))
    }
}

/// Class membership test shared by the extension trait and the baseline
/// selector engine.
pub fn has_class(el: &ElementRef<'_>, class: &str) -> bool {
    el.value().classes().any(|c| c == class)
}
