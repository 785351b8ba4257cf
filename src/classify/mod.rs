//! Classifier library: pure text/style classifiers shared by the rules.

pub mod purpose;
pub mod structure;
pub mod vocabulary;

pub use structure::Thresholds;
