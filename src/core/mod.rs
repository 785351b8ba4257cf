//! Core audit infrastructure: document snapshot, query capabilities,
//! violation recording, highlighting and shared types.

pub mod document;
pub mod error;
pub mod highlight;
pub mod query;
pub mod recorder;
pub mod style;
pub mod types;

pub use document::{has_class, DocumentSnapshot, NodeExt};
pub use error::{AuditError, QueryError, ScanError, StylesheetError};
pub use highlight::{Highlighter, VisualStyle, HINT_DELIMITER, MARKER_ATTR};
pub use query::{EngineProbe, ProbeResult, QueryAdapter, QueryCapability, DEFAULT_GRACE};
pub use recorder::ViolationRecorder;
pub use style::{ComputedStyle, MediaRule, Stylesheet, StylesheetOrigin};
pub use types::{Category, ClassificationResult, RunSummary, Violation};
