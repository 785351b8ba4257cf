//! Error taxonomy for the audit engine
//!
//! None of these abort an audit. Query failures degrade to the baseline
//! capability, scan failures reroute the rule through its fallback scan,
//! stylesheet failures skip the offending sheet, and highlight failures
//! are silent no-ops. The worst case for a single rule is an empty summary.

use thiserror::Error;

/// Errors raised while resolving or using a query capability.
#[derive(Debug, Error)]
pub enum QueryError {
    /// The enhanced selection engine never became available.
    #[error("enhanced query capability unavailable")]
    CapabilityUnavailable,

    /// A selector could not be compiled by the enhanced engine.
    #[error("invalid selector '{selector}': {reason}")]
    InvalidSelector { selector: String, reason: String },

    /// The baseline capability was asked for selector syntax it does not
    /// implement (combinators, pseudo-selectors).
    #[error("selector '{0}' not supported by baseline capability")]
    UnsupportedSelector(String),

    /// The capability probe itself failed.
    #[error("capability probe failed: {0}")]
    ProbeFailed(String),
}

/// Errors raised during a rule's scanning phase.
///
/// A `ScanError` moves the rule into its fallback scan; it is logged at
/// error level and never surfaced to the orchestrator's caller.
#[derive(Debug, Error)]
pub enum ScanError {
    #[error(transparent)]
    Query(#[from] QueryError),

    #[error("malformed attribute on {node}: {detail}")]
    MalformedAttribute { node: String, detail: String },

    #[error("scan failed: {0}")]
    Other(String),
}

/// Errors raised while accessing a stylesheet.
///
/// Handled per sheet: the sheet is skipped and scanning continues.
#[derive(Debug, Error)]
pub enum StylesheetError {
    /// External sheet whose body was never registered with the snapshot;
    /// the analog of a cross-origin sheet the host will not let us read.
    #[error("stylesheet '{0}' is inaccessible")]
    Inaccessible(String),
}

/// Top-level errors for the public entry points (parse and I/O only;
/// rule execution itself never fails).
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid configuration: {0}")]
    Config(String),
}
