//! Configuration handling for wcag-audit

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use crate::classify::Thresholds;
use crate::core::{Category, VisualStyle};

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".wcagaudit.json";

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// Which rules to run
    #[serde(default)]
    pub rules: RuleToggles,

    /// Apply visual markers to violating elements
    #[serde(default = "default_true")]
    pub highlight_violations: bool,

    /// Emit a log line per violation as it is recorded
    #[serde(default = "default_true")]
    pub log_violations: bool,

    /// Print a per-rule summary after scanning
    #[serde(default = "default_true")]
    pub show_summary: bool,

    /// Per-category highlight style overrides; unset categories keep
    /// their defaults
    #[serde(default)]
    pub violation_styles: BTreeMap<Category, VisualStyle>,

    /// Structural heuristic cutoffs
    #[serde(default)]
    pub thresholds: Thresholds,

    /// How long to wait for the enhanced query engine before settling
    /// on the baseline (milliseconds)
    #[serde(default = "default_grace_ms")]
    pub capability_grace_ms: u64,
}

fn default_true() -> bool {
    true
}

fn default_grace_ms() -> u64 {
    500
}

impl Default for Config {
    fn default() -> Self {
        Self {
            rules: RuleToggles::default(),
            highlight_violations: true,
            log_violations: true,
            show_summary: true,
            violation_styles: BTreeMap::new(),
            thresholds: Thresholds::default(),
            capability_grace_ms: default_grace_ms(),
        }
    }
}

/// Rule enable/disable configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RuleToggles {
    #[serde(default = "default_true")]
    pub non_text_content: bool,
    #[serde(default = "default_true")]
    pub captions: bool,
    #[serde(default = "default_true")]
    pub info_relationships: bool,
    #[serde(default = "default_true")]
    pub orientation: bool,
    #[serde(default = "default_true")]
    pub input_purpose: bool,
}

impl Default for RuleToggles {
    fn default() -> Self {
        Self {
            non_text_content: true,
            captions: true,
            info_relationships: true,
            orientation: true,
            input_purpose: true,
        }
    }
}

/// Per-scan settings handed to each rule, with style overrides already
/// merged over the defaults.
#[derive(Debug, Clone)]
pub struct RuleConfig {
    pub highlight_violations: bool,
    pub log_violations: bool,
    pub show_summary: bool,
    pub styles: BTreeMap<Category, VisualStyle>,
    pub thresholds: Thresholds,
}

impl Config {
    /// Load configuration from a file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| ConfigError::ReadError(path.to_path_buf(), e.to_string()))?;

        serde_json::from_str(&content)
            .map_err(|e| ConfigError::ParseError(path.to_path_buf(), e.to_string()))
    }

    /// Find and load configuration from the given directory or parents
    pub fn find_and_load(start_dir: &Path) -> Option<Self> {
        let mut current = start_dir.to_path_buf();

        loop {
            let config_path = current.join(CONFIG_FILE_NAME);
            if config_path.exists() {
                return Self::load(&config_path).ok();
            }

            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Check if a rule should run
    pub fn is_rule_enabled(&self, rule_id: &str) -> bool {
        match rule_id {
            "WCAG-1.1.1" => self.rules.non_text_content,
            "WCAG-1.2" => self.rules.captions,
            "WCAG-1.3.1" => self.rules.info_relationships,
            "WCAG-1.3.4" => self.rules.orientation,
            "WCAG-1.3.5" => self.rules.input_purpose,
            _ => true,
        }
    }

    /// Build the per-scan rule settings, merging style overrides over
    /// the built-in category palette.
    pub fn rule_config(&self) -> RuleConfig {
        let mut styles = default_styles();
        for (category, style) in &self.violation_styles {
            styles.insert(*category, style.clone());
        }
        RuleConfig {
            highlight_violations: self.highlight_violations,
            log_violations: self.log_violations,
            show_summary: self.show_summary,
            styles,
            thresholds: self.thresholds.clone(),
        }
    }
}

/// Built-in highlight palette, one style per category.
pub fn default_styles() -> BTreeMap<Category, VisualStyle> {
    let thin = |color: &str| {
        VisualStyle::new(
            format!("2px solid {color}"),
            format!("0 0 5px {color}"),
        )
    };
    let thick = |color: &str| {
        VisualStyle::new(
            format!("3px solid {color}"),
            format!("0 0 8px {color}"),
        )
    };

    let mut styles = BTreeMap::new();
    styles.insert(Category::Personal, thin("#e74c3c"));
    styles.insert(Category::Contact, thin("#f39c12"));
    styles.insert(Category::Address, thin("#9b59b6"));
    styles.insert(Category::Payment, thin("#27ae60"));
    styles.insert(Category::Other, thin("#34495e"));
    styles.insert(Category::Image, thin("#e74c3c"));
    styles.insert(Category::Media, thin("#f39c12"));
    styles.insert(Category::Interactive, thin("#9b59b6"));
    styles.insert(Category::Video, thick("#e74c3c"));
    styles.insert(Category::Audio, thick("#f39c12"));
    styles.insert(Category::Embedded, thick("#9b59b6"));
    styles.insert(Category::Heading, thin("#e74c3c"));
    styles.insert(Category::List, thin("#f39c12"));
    styles.insert(Category::Table, thin("#9b59b6"));
    styles.insert(Category::Form, thin("#27ae60"));
    styles.insert(Category::Semantic, thin("#34495e"));
    styles.insert(Category::Css, thin("#e74c3c"));
    styles.insert(Category::Meta, thin("#f39c12"));
    styles.insert(Category::Script, thin("#9b59b6"));
    styles.insert(Category::Content, thin("#27ae60"));
    styles
}

/// Configuration error
#[derive(Debug)]
pub enum ConfigError {
    ReadError(PathBuf, String),
    ParseError(PathBuf, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ReadError(path, msg) => {
                write!(
                    f,
                    "Failed to read config file '{}': {}",
                    path.display(),
                    msg
                )
            }
            Self::ParseError(path, msg) => {
                write!(
                    f,
                    "Failed to parse config file '{}': {}",
                    path.display(),
                    msg
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert!(config.rules.non_text_content);
        assert!(config.rules.input_purpose);
        assert!(config.highlight_violations);
        assert!(config.log_violations);
        assert!(config.show_summary);
        assert_eq!(config.capability_grace_ms, 500);
    }

    #[test]
    fn test_rule_enabled_by_id() {
        let mut config = Config::default();
        assert!(config.is_rule_enabled("WCAG-1.3.5"));
        config.rules.input_purpose = false;
        assert!(!config.is_rule_enabled("WCAG-1.3.5"));
        assert!(config.is_rule_enabled("WCAG-1.1.1"));
    }

    #[test]
    fn test_parse_config() {
        let json = r#"{
            "rules": {
                "orientation": false
            },
            "highlightViolations": false,
            "capabilityGraceMs": 50
        }"#;

        let config: Config = serde_json::from_str(json).unwrap();
        assert!(!config.rules.orientation);
        assert!(config.rules.captions);
        assert!(!config.highlight_violations);
        assert!(config.log_violations);
        assert_eq!(config.capability_grace_ms, 50);
    }

    #[test]
    fn test_default_styles_cover_all_categories() {
        let styles = default_styles();
        for category in Category::ALL {
            assert!(styles.contains_key(category), "missing style for {category:?}");
        }
    }

    #[test]
    fn test_style_overrides_merge() {
        let mut config = Config::default();
        config.violation_styles.insert(
            Category::Image,
            VisualStyle::new("4px dashed red".to_string(), "none".to_string()),
        );

        let rule_config = config.rule_config();
        assert_eq!(rule_config.styles[&Category::Image].border, "4px dashed red");
        assert_eq!(rule_config.styles[&Category::Image].box_shadow, "none");
        // Untouched categories keep the palette default.
        assert!(rule_config.styles[&Category::Form].border.contains("#27ae60"));
    }

    #[test]
    fn test_config_error_display() {
        let read_err = ConfigError::ReadError(PathBuf::from("test.json"), "not found".to_string());
        assert!(read_err.to_string().contains("Failed to read"));

        let parse_err = ConfigError::ParseError(PathBuf::from("bad.json"), "invalid".to_string());
        assert!(parse_err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn test_find_and_load_in_parent() {
        use std::fs::{self, File};
        use std::io::Write;
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join(CONFIG_FILE_NAME);
        {
            let mut f = File::create(&config_path).unwrap();
            writeln!(f, r#"{{ "rules": {{ "captions": false }} }}"#).unwrap();
        }

        let sub_dir = temp_dir.path().join("subdir");
        fs::create_dir(&sub_dir).unwrap();

        let found = Config::find_and_load(&sub_dir);
        assert!(found.is_some());
        assert!(!found.unwrap().rules.captions);
    }

    #[test]
    fn test_find_and_load_not_found() {
        use tempfile::TempDir;

        let temp_dir = TempDir::new().unwrap();
        assert!(Config::find_and_load(temp_dir.path()).is_none());
    }
}
