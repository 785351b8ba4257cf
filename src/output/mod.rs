//! Output formatters for audit results

mod json;
mod text;

pub use json::JsonReporter;
pub use text::TextReporter;

use crate::core::Violation;
use crate::rules::RuleReport;

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown format: {}", s)),
        }
    }
}

/// Trait for report formatters
pub trait Reporter {
    /// Format the per-rule reports of one audited document
    fn format(&self, reports: &[RuleReport]) -> String;

    /// Format a single violation (for streaming output)
    fn format_violation(&self, violation: &Violation) -> String;
}

/// Get a reporter for the specified format
pub fn get_reporter(format: OutputFormat, colored: bool) -> Box<dyn Reporter> {
    match format {
        OutputFormat::Text => Box::new(TextReporter::new(colored)),
        OutputFormat::Json => Box::new(JsonReporter::new()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_from_str() {
        assert_eq!("text".parse::<OutputFormat>().unwrap(), OutputFormat::Text);
        assert_eq!("JSON".parse::<OutputFormat>().unwrap(), OutputFormat::Json);
        assert!("yaml".parse::<OutputFormat>().is_err());
    }
}
