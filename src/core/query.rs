//! Query capability resolution and the two selection engines
//!
//! Every rule selects candidate nodes through a [`QueryCapability`],
//! resolved once per rule run. Resolution prefers the enhanced engine
//! (full CSS selectors); when a probe says it is not available, the
//! adapter suspends once for a bounded grace interval, re-probes, and
//! then commits to the baseline engine for the rest of the run. The
//! baseline engine understands only tag / class / attribute-equality
//! selectors, so rules degrade rather than fail when enhancement never
//! arrives.

use scraper::{ElementRef, Selector};
use std::time::Duration;
use tracing::{debug, warn};

use super::document::{has_class, DocumentSnapshot, NodeExt};
use super::error::QueryError;

/// Outcome of probing for the enhanced engine.
pub type ProbeResult = Result<bool, QueryError>;

/// Injectable presence check for the enhanced selection engine. The
/// default probe reports it available immediately; tests substitute
/// never-available and late-available probes.
pub type EngineProbe = Box<dyn Fn() -> ProbeResult>;

/// Default grace interval before committing to the baseline capability.
pub const DEFAULT_GRACE: Duration = Duration::from_millis(500);

/// Resolves the query capability for a rule run.
pub struct QueryAdapter {
    probe: EngineProbe,
    grace: Duration,
}

impl QueryAdapter {
    pub fn new() -> Self {
        Self {
            probe: Box::new(|| Ok(true)),
            grace: DEFAULT_GRACE,
        }
    }

    /// Default probe with the grace interval taken from config.
    pub fn with_grace(grace: Duration) -> Self {
        Self {
            probe: Box::new(|| Ok(true)),
            grace,
        }
    }

    pub fn with_probe(probe: EngineProbe, grace: Duration) -> Self {
        Self { probe, grace }
    }

    pub fn grace(&self) -> Duration {
        self.grace
    }

    /// Resolve a capability. At most one bounded suspension: probe,
    /// sleep `grace`, probe again, then commit to baseline. After the
    /// wait elapses the adapter never waits again for this run.
    pub fn resolve(&self) -> Result<QueryCapability, QueryError> {
        if (self.probe)()? {
            return Ok(QueryCapability::enhanced());
        }
        debug!(grace_ms = self.grace.as_millis() as u64, "enhanced engine absent, waiting once");
        std::thread::sleep(self.grace);
        if (self.probe)()? {
            return Ok(QueryCapability::enhanced());
        }
        debug!("enhanced engine never arrived, committing to baseline");
        Ok(QueryCapability::baseline())
    }

    /// Resolution must never be fatal: any probe failure is recovered
    /// here by forcing the baseline capability.
    pub fn resolve_or_baseline(&self) -> QueryCapability {
        match self.resolve() {
            Ok(capability) => capability,
            Err(err) => {
                warn!(error = %err, "capability resolution failed, forcing baseline");
                QueryCapability::baseline()
            }
        }
    }
}

impl Default for QueryAdapter {
    fn default() -> Self {
        Self::new()
    }
}

/// The resolved selection capability: exactly one variant per run.
pub enum QueryCapability {
    Enhanced(SelectorEngine),
    Baseline(BaselineEngine),
}

impl QueryCapability {
    pub fn enhanced() -> Self {
        QueryCapability::Enhanced(SelectorEngine)
    }

    pub fn baseline() -> Self {
        QueryCapability::Baseline(BaselineEngine)
    }

    pub fn is_enhanced(&self) -> bool {
        matches!(self, QueryCapability::Enhanced(_))
    }

    /// All elements matching `selector`, in document order.
    pub fn select_all<'a>(
        &self,
        doc: &'a DocumentSnapshot,
        selector: &str,
    ) -> Result<Vec<ElementRef<'a>>, QueryError> {
        match self {
            QueryCapability::Enhanced(engine) => engine.select_all(doc, selector),
            QueryCapability::Baseline(engine) => engine.select_all(doc, selector),
        }
    }

    /// Nearest ancestor-or-self matching `selector`, or `None`. A
    /// selector the engine cannot handle yields `None` rather than an
    /// error: closest() is only ever used for opt-out context lookups.
    pub fn closest<'a>(&self, el: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
        match self {
            QueryCapability::Enhanced(engine) => engine.closest(el, selector),
            QueryCapability::Baseline(engine) => engine.closest(el, selector),
        }
    }

    /// Attribute accessor, part of the uniform capability surface.
    pub fn attribute<'a>(&self, el: ElementRef<'a>, name: &str) -> Option<&'a str> {
        el.value().attr(name)
    }

    /// Text accessor, part of the uniform capability surface.
    pub fn text(&self, el: ElementRef<'_>) -> String {
        el.full_text()
    }
}

/// Enhanced engine: full CSS selector support.
pub struct SelectorEngine;

impl SelectorEngine {
    fn compile(&self, selector: &str) -> Result<Selector, QueryError> {
        Selector::parse(selector).map_err(|e| QueryError::InvalidSelector {
            selector: selector.to_string(),
            reason: e.to_string(),
        })
    }

    fn select_all<'a>(
        &self,
        doc: &'a DocumentSnapshot,
        selector: &str,
    ) -> Result<Vec<ElementRef<'a>>, QueryError> {
        let compiled = self.compile(selector)?;
        Ok(doc.select(&compiled))
    }

    fn closest<'a>(&self, el: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
        let compiled = self.compile(selector).ok()?;
        ancestors_or_self(el).find(|candidate| compiled.matches(candidate))
    }
}

/// Baseline engine: native tree walking with simple selectors only.
///
/// Supported forms (comma lists of): `*`, `tag`, `.class`, `[attr]`,
/// `[attr=value]`, and tag/class/attribute combinations without
/// whitespace. No combinators, no pseudo-selectors.
pub struct BaselineEngine;

impl BaselineEngine {
    fn select_all<'a>(
        &self,
        doc: &'a DocumentSnapshot,
        selector: &str,
    ) -> Result<Vec<ElementRef<'a>>, QueryError> {
        let patterns = SimplePattern::parse_list(selector)?;
        Ok(doc
            .all_elements()
            .into_iter()
            .filter(|el| patterns.iter().any(|p| p.matches(el)))
            .collect())
    }

    fn closest<'a>(&self, el: ElementRef<'a>, selector: &str) -> Option<ElementRef<'a>> {
        let patterns = SimplePattern::parse_list(selector).ok()?;
        ancestors_or_self(el).find(|candidate| patterns.iter().any(|p| p.matches(candidate)))
    }
}

fn ancestors_or_self<'a>(el: ElementRef<'a>) -> impl Iterator<Item = ElementRef<'a>> {
    std::iter::once(el).chain(el.ancestors().filter_map(ElementRef::wrap))
}

/// One compiled simple selector.
#[derive(Debug, Clone, PartialEq, Eq)]
struct SimplePattern {
    tag: Option<String>,
    class: Option<String>,
    attr: Option<(String, Option<String>)>,
}

impl SimplePattern {
    fn parse_list(selector: &str) -> Result<Vec<Self>, QueryError> {
        selector
            .split(',')
            .map(|part| Self::parse_one(part.trim(), selector))
            .collect()
    }

    fn parse_one(part: &str, full: &str) -> Result<Self, QueryError> {
        let unsupported =
            || QueryError::UnsupportedSelector(full.to_string());
        if part.is_empty() || part.chars().any(|c| " >+~:".contains(c)) {
            return Err(unsupported());
        }

        let mut pattern = Self {
            tag: None,
            class: None,
            attr: None,
        };
        let mut rest = part;

        // Leading tag or universal.
        let tag_end = rest
            .find(|c| c == '.' || c == '[')
            .unwrap_or(rest.len());
        let tag = &rest[..tag_end];
        if !tag.is_empty() && tag != "*" {
            if !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
                return Err(unsupported());
            }
            pattern.tag = Some(tag.to_ascii_lowercase());
        }
        rest = &rest[tag_end..];

        // One optional .class, one optional [attr] / [attr=value].
        while !rest.is_empty() {
            if let Some(after) = rest.strip_prefix('.') {
                let end = after.find('[').unwrap_or(after.len());
                if end == 0 || pattern.class.is_some() {
                    return Err(unsupported());
                }
                pattern.class = Some(after[..end].to_string());
                rest = &after[end..];
            } else if let Some(after) = rest.strip_prefix('[') {
                let Some(close) = after.find(']') else {
                    return Err(unsupported());
                };
                if pattern.attr.is_some() || !after[close + 1..].is_empty() {
                    return Err(unsupported());
                }
                let inner = &after[..close];
                pattern.attr = Some(match inner.split_once('=') {
                    Some((name, value)) => {
                        let value = value.trim_matches(|c| c == '"' || c == '\'');
                        (name.trim().to_ascii_lowercase(), Some(value.to_string()))
                    }
                    None => (inner.trim().to_ascii_lowercase(), None),
                });
                rest = "";
            } else {
                return Err(unsupported());
            }
        }
        Ok(pattern)
    }

    fn matches(&self, el: &ElementRef<'_>) -> bool {
        if let Some(tag) = &self.tag {
            if el.value().name() != tag {
                return false;
            }
        }
        if let Some(class) = &self.class {
            if !has_class(el, class) {
                return false;
            }
        }
        if let Some((name, expected)) = &self.attr {
            match (el.value().attr(name), expected) {
                (None, _) => return false,
                (Some(_), None) => {}
                (Some(actual), Some(expected)) => {
                    if actual != expected {
                        return false;
                    }
                }
            }
        }
        true
    }
}
