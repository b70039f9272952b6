use super::DrawingRule;
use crate::error::{CatalogError, RuleError};
use crate::types::{joined_text, CaseMode, TextBlock};
use crate::verdict::Check;
use regex::Regex;

// PatternPresenceRule - passes when any of its patterns matches the joined drawing text
pub struct PatternPresenceRule {
    id: String,
    name: String,
    patterns: Vec<Regex>,
    case: CaseMode,
}

impl PatternPresenceRule {
    /// Compile the patterns up front so a bad expression surfaces at startup
    pub fn new(id: &str, name: &str, patterns: &[&str], case: CaseMode) -> Result<Self, CatalogError> {
        let mut compiled = Vec::with_capacity(patterns.len());
        for pattern in patterns {
            compiled.push(Regex::new(pattern).map_err(|source| CatalogError::InvalidPattern {
                rule: id.to_string(),
                source,
            })?);
        }

        Ok(Self {
            id: id.to_string(),
            name: name.to_string(),
            patterns: compiled,
            case,
        })
    }
}

impl DrawingRule for PatternPresenceRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, blocks: &[TextBlock]) -> Result<Check, RuleError> {
        let all_text = joined_text(blocks, self.case);
        let found = self.patterns.iter().any(|p| p.is_match(&all_text));
        Ok(Check::from_bool(found))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single(text: &str) -> Vec<TextBlock> {
        vec![TextBlock::new(text)]
    }

    #[test]
    fn test_upper_mode_folds_case_before_matching() {
        let rule = PatternPresenceRule::new(
            "check_revision_format",
            "Revision Format Valid",
            &[r"\b(REV|REVISION)[\s-]*(?:[A-Z]|\d+)\b"],
            CaseMode::Upper,
        )
        .unwrap();
        assert!(rule.check(&single("rev b")).unwrap().passed);
        assert!(rule.check(&single("REVISION-12")).unwrap().passed);
        assert!(!rule.check(&single("REVIEWED")).unwrap().passed);
    }

    #[test]
    fn test_preserve_mode_keeps_symbols() {
        let rule = PatternPresenceRule::new(
            "check_tolerance_dimensions",
            "Tolerances Present with Dimensions",
            &[r"\d+(\.\d+)?\s*±\s*\d+(\.\d+)?"],
            CaseMode::Preserve,
        )
        .unwrap();
        assert!(rule.check(&single("Ø12.5 ± 0.05")).unwrap().passed);
        assert!(!rule.check(&single("Ø12.5 +/- 0.05")).unwrap().passed);
    }

    #[test]
    fn test_any_pattern_is_enough() {
        let rule = PatternPresenceRule::new(
            "check_date_format",
            "Date Format Valid",
            &[r"\d{2}/\d{2}/\d{2,4}", r"\d{4}-\d{2}-\d{2}"],
            CaseMode::Preserve,
        )
        .unwrap();
        assert!(rule.check(&single("DATE 2023-12-01")).unwrap().passed);
        assert!(rule.check(&single("DATE 01/12/23")).unwrap().passed);
        assert!(!rule.check(&single("DATE Dec 1st")).unwrap().passed);
    }

    #[test]
    fn test_empty_document_fails() {
        let rule = PatternPresenceRule::new("check_x", "X", &[r"\d+"], CaseMode::Upper).unwrap();
        assert!(!rule.check(&[]).unwrap().passed);
    }

    #[test]
    fn test_invalid_pattern_is_a_catalog_error() {
        let result = PatternPresenceRule::new("check_broken", "Broken", &["(unclosed"], CaseMode::Upper);
        assert!(matches!(result, Err(CatalogError::InvalidPattern { .. })));
    }
}
