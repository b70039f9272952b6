use crate::types::CaseMode;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;

// Default value functions for serde
fn default_true() -> bool {
    true
}

fn default_rule_set() -> String {
    crate::rules::AED.to_string()
}

fn default_title_block_min_y0() -> f64 {
    700.0 // Anything lower on the sheet counts as the title block band
}

fn default_alignment_band() -> f64 {
    50.0
}

fn default_min_text_height() -> f64 {
    11.0 // 11 units ≈ 8pt text
}

fn default_max_small_text_ratio() -> f64 {
    0.3
}

fn default_min_block_count() -> usize {
    10 // Fewer blocks than this usually means a scanned drawing
}

/// Top-level review configuration, read once before the catalog is built
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReviewConfig {
    /// Rule set used when the caller does not pick one
    #[serde(default = "default_rule_set")]
    pub default_rule_set: String,
    /// Positional constants used by the layout rules
    #[serde(default)]
    pub thresholds: RuleThresholds,
    /// Additional named rule sets composed from rule ids
    #[serde(default)]
    pub rule_sets: Vec<RuleSetConfig>,
    /// Declarative rules added to the library before sets are resolved
    #[serde(default)]
    pub custom_rules: Vec<RuleDefinition>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleThresholds {
    /// Blocks with y0 above this are in the title block band
    #[serde(default = "default_title_block_min_y0")]
    pub title_block_min_y0: f64,
    /// Maximum vertical spread of title-block field labels
    #[serde(default = "default_alignment_band")]
    pub alignment_band: f64,
    /// Blocks shorter than this are hard to read
    #[serde(default = "default_min_text_height")]
    pub min_text_height: f64,
    /// Share of short blocks tolerated before legibility fails
    #[serde(default = "default_max_small_text_ratio")]
    pub max_small_text_ratio: f64,
    /// A machine-readable drawing has more blocks than this
    #[serde(default = "default_min_block_count")]
    pub min_block_count: usize,
}

impl Default for RuleThresholds {
    fn default() -> Self {
        Self {
            title_block_min_y0: default_title_block_min_y0(),
            alignment_band: default_alignment_band(),
            min_text_height: default_min_text_height(),
            max_small_text_ratio: default_max_small_text_ratio(),
            min_block_count: default_min_block_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuleSetConfig {
    /// Name callers select the set by
    pub name: String,
    /// Rule ids, evaluated in this order
    pub rules: Vec<String>,
    /// Whether this set is registered at all
    #[serde(default = "default_true")]
    pub enabled: bool,
}

/// A rule declared in configuration rather than code
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RuleDefinition {
    /// Passes when any keyword is present
    Keyword {
        id: String,
        name: String,
        keywords: Vec<String>,
        #[serde(default)]
        case_sensitive: bool,
    },
    /// Passes when any regex matches the joined text
    Pattern {
        id: String,
        name: String,
        patterns: Vec<String>,
        #[serde(default)]
        case_sensitive: bool,
    },
    /// Passes when every field label is present
    RequiredFields {
        id: String,
        name: String,
        fields: Vec<String>,
    },
}

impl RuleDefinition {
    pub fn id(&self) -> &str {
        match self {
            RuleDefinition::Keyword { id, .. }
            | RuleDefinition::Pattern { id, .. }
            | RuleDefinition::RequiredFields { id, .. } => id,
        }
    }

    pub fn case_mode(case_sensitive: bool) -> CaseMode {
        if case_sensitive {
            CaseMode::Preserve
        } else {
            CaseMode::Upper
        }
    }
}

impl Default for ReviewConfig {
    fn default() -> Self {
        Self {
            default_rule_set: default_rule_set(),
            thresholds: RuleThresholds::default(),
            rule_sets: Vec::new(),
            custom_rules: Vec::new(),
        }
    }
}

impl ReviewConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content =
            fs::read_to_string(path).with_context(|| format!("reading config file {path}"))?;
        Self::from_yaml(&content).with_context(|| format!("parsing config file {path}"))
    }

    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: ReviewConfig = serde_yaml::from_str(content)?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                tracing::warn!(path = p, error = %e, "failed to load config, using defaults");
                Self::default()
            }),
            None => Self::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_builtin_constants() {
        let config = ReviewConfig::default();
        assert_eq!(config.default_rule_set, "AED");
        assert_eq!(config.thresholds.title_block_min_y0, 700.0);
        assert_eq!(config.thresholds.alignment_band, 50.0);
        assert_eq!(config.thresholds.min_text_height, 11.0);
        assert_eq!(config.thresholds.max_small_text_ratio, 0.3);
        assert_eq!(config.thresholds.min_block_count, 10);
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = ReviewConfig::from_yaml(
            r#"
default_rule_set: "ASME Y14"
thresholds:
  title_block_min_y0: 500
"#,
        )
        .unwrap();
        assert_eq!(config.default_rule_set, "ASME Y14");
        assert_eq!(config.thresholds.title_block_min_y0, 500.0);
        assert_eq!(config.thresholds.alignment_band, 50.0);
        assert!(config.rule_sets.is_empty());
    }

    #[test]
    fn test_custom_rules_and_sets_parse() {
        let config = ReviewConfig::from_yaml(
            r#"
custom_rules:
  - kind: keyword
    id: check_material_callout
    name: Material Callout Present
    keywords: ["MATERIAL", "MATL"]
  - kind: pattern
    id: check_cage_code
    name: CAGE Code Present
    patterns: ['CAGE[:\s]*[0-9A-Z]{5}']
  - kind: required_fields
    id: check_approvals
    name: Approval Block Complete
    fields: ["CHECKED", "APPROVED"]
rule_sets:
  - name: Shop Floor
    rules: [check_material_callout, check_units_specified]
  - name: Draft
    rules: [check_cage_code]
    enabled: false
"#,
        )
        .unwrap();
        assert_eq!(config.custom_rules.len(), 3);
        assert_eq!(config.custom_rules[1].id(), "check_cage_code");
        assert!(matches!(
            config.custom_rules[2],
            RuleDefinition::RequiredFields { .. }
        ));
        assert!(config.rule_sets[0].enabled);
        assert!(!config.rule_sets[1].enabled);
    }

    #[test]
    fn test_missing_file_falls_back() {
        let config = ReviewConfig::load_with_fallback(Some("/nonexistent/drawcheck.yaml"));
        assert_eq!(config.default_rule_set, "AED");
    }

    #[test]
    fn test_load_from_file_roundtrip() {
        let path = std::env::temp_dir().join("drawcheck_config_test.yaml");
        std::fs::write(&path, "thresholds:\n  min_block_count: 3\n").unwrap();

        let config = ReviewConfig::load_from_file(path.to_str().unwrap()).unwrap();
        assert_eq!(config.thresholds.min_block_count, 3);

        std::fs::remove_file(path).ok();
    }
}
