// Built-in rules - the AED and ASME Y14 sets plus the id registry
//
// AED carries eight checks for defense equipment drawings (NSN, MIL-STD
// citations, unique identifiers, security markings). ASME Y14 carries the
// fifteen general title-block and drafting checks. Every rule is registered
// in a RuleLibrary under its id so configured rule sets can reuse it.

use super::consistency::{DuplicateFieldsRule, SheetLabelConsistencyRule};
use super::keyword::{KeywordPresenceRule, RequiredFieldsRule, ScaleNotationRule};
use super::layout::{
    FieldAlignmentRule, FontLegibilityRule, MachineReadableRule, TitleBlockLocationRule,
};
use super::pattern::PatternPresenceRule;
use super::DrawingRule;
use crate::config::{RuleDefinition, RuleThresholds};
use crate::error::CatalogError;
use crate::types::CaseMode;
use std::collections::HashMap;
use std::sync::Arc;

pub const AED: &str = "AED";
pub const ASME_Y14: &str = "ASME Y14";

pub type SharedRule = Arc<dyn DrawingRule>;

fn shared<R: DrawingRule + 'static>(rule: R) -> SharedRule {
    Arc::new(rule)
}

pub fn aed_rules() -> Result<Vec<SharedRule>, CatalogError> {
    Ok(vec![
        shared(PatternPresenceRule::new(
            "check_nsn_present",
            "NSN Number Present",
            &[r"\bNSN[:\s]*\d{4}-\d{2}-\d{6}\b"],
            CaseMode::Upper,
        )?),
        shared(KeywordPresenceRule::new(
            "check_drawing_classification",
            "Drawing Type Specified",
            &["INSTALLATION", "SCHEMATIC", "WIRING", "DETAIL", "OUTLINE", "BLOCK DIAGRAM"],
        )),
        shared(KeywordPresenceRule::new(
            "check_mil_std_citations",
            "MIL-STD Reference Present",
            &["MIL-STD-100", "MIL-STD-129", "MIL-STD-31000"],
        )),
        shared(PatternPresenceRule::new(
            "check_revision_format",
            "Revision Format Valid",
            &[r"\b(REV|REVISION)[\s-]*(?:[A-Z]|\d+)\b"],
            CaseMode::Upper,
        )?),
        shared(PatternPresenceRule::new(
            "check_tolerance_dimensions",
            "Tolerances Present with Dimensions",
            &[r"\d+(\.\d+)?\s*±\s*\d+(\.\d+)?"],
            CaseMode::Preserve,
        )?),
        shared(KeywordPresenceRule::new(
            "check_units_specified",
            "Measurement Units Declared",
            &["IN", "INCH", "MM", "FEET", "MILLIMETERS"],
        )),
        shared(KeywordPresenceRule::new(
            "check_security_notice",
            "Security Notice Present",
            &["SECURITY NOTICE", "WARNING", "PROPRIETARY", "EXPORT CONTROLLED"],
        )),
        shared(PatternPresenceRule::new(
            "check_unique_id_present",
            "Unique Identifier Code Present",
            &[r"\bUID[:\s]*[A-Z0-9\-]+\b"],
            CaseMode::Upper,
        )?),
    ])
}

pub fn asme_rules(thresholds: &RuleThresholds) -> Result<Vec<SharedRule>, CatalogError> {
    Ok(vec![
        shared(RequiredFieldsRule::new(
            "check_required_fields",
            "Basic Title Block Completeness",
            &["DRAWING NUMBER", "TITLE", "SCALE", "DATE", "APPROVED", "DRAWN BY", "REV"],
        )),
        shared(KeywordPresenceRule::new(
            "check_revision_present",
            "Revision Label Present",
            &["REV", "REVISION"],
        )),
        shared(ScaleNotationRule),
        shared(PatternPresenceRule::new(
            "check_date_format",
            "Date Format Valid",
            &[
                r"\d{2}/\d{2}/\d{2,4}", // 01/12/2023 or 01/12/23
                r"\d{2}-\d{2}-\d{2,4}", // 01-12-2023
                r"\d{4}-\d{2}-\d{2}",   // 2023-12-01
            ],
            CaseMode::Preserve,
        )?),
        shared(KeywordPresenceRule::new(
            "check_units_consistency",
            "Units Mentioned",
            &["MM", "IN", "INCHES", "MILLIMETERS"],
        )),
        shared(TitleBlockLocationRule::new(thresholds)),
        shared(DuplicateFieldsRule),
        shared(FieldAlignmentRule::new(thresholds)),
        shared(
            KeywordPresenceRule::new(
                "check_notes_block_present",
                "General Notes Present",
                &[
                    "UNLESS OTHERWISE SPECIFIED",
                    "ALL DIMENSIONS IN",
                    "TOLERANCES",
                    "FINISH",
                    "BREAK SHARP EDGES",
                ],
            )
            .reporting_found(),
        ),
        shared(SheetLabelConsistencyRule::new()?),
        shared(PatternPresenceRule::new(
            "check_tolerance_format",
            "Tolerance Format Valid",
            &[
                r"±\s*\d+\.\d+",                // ±0.01
                r"\+\d+\.\d+\s*/\s*-\d+\.\d+", // +0.1/-0.0
                r"\+\d+\.\d+\s*-\d+\.\d+",     // +0.1 -0.0
            ],
            CaseMode::Preserve,
        )?),
        shared(FontLegibilityRule::new(thresholds)),
        shared(
            KeywordPresenceRule::new(
                "check_geometric_symbols_present",
                "GD&T Symbols Present",
                &["Ⓜ", "Ⓟ", "Ⓣ", "ⓨ", "⓴"],
            )
            .case_sensitive(),
        ),
        shared(PatternPresenceRule::new(
            "check_drawing_number_format",
            "Drawing Number Format Valid",
            &[
                r"(DWG[-\s]*\d+[A-Z]?)", // DWG-1234A
                r"(P/N[-\s]*\d{4,})",    // P/N 45678
            ],
            CaseMode::Upper,
        )?),
        shared(MachineReadableRule::new(thresholds)),
    ])
}

/// Build a rule from its configuration entry
pub fn rule_from_definition(definition: &RuleDefinition) -> Result<SharedRule, CatalogError> {
    let rule: SharedRule = match definition {
        RuleDefinition::Keyword {
            id,
            name,
            keywords,
            case_sensitive,
        } => {
            if keywords.is_empty() {
                return Err(CatalogError::EmptyRule(id.clone()));
            }
            let rule = KeywordPresenceRule::new(id, name, &[]).with_keywords(keywords.clone());
            if *case_sensitive {
                Arc::new(rule.case_sensitive())
            } else {
                Arc::new(rule)
            }
        }
        RuleDefinition::Pattern {
            id,
            name,
            patterns,
            case_sensitive,
        } => {
            if patterns.is_empty() {
                return Err(CatalogError::EmptyRule(id.clone()));
            }
            let patterns: Vec<&str> = patterns.iter().map(String::as_str).collect();
            Arc::new(PatternPresenceRule::new(
                id,
                name,
                &patterns,
                RuleDefinition::case_mode(*case_sensitive),
            )?)
        }
        RuleDefinition::RequiredFields { id, name, fields } => {
            if fields.is_empty() {
                return Err(CatalogError::EmptyRule(id.clone()));
            }
            Arc::new(RequiredFieldsRule::new(id, name, &[]).with_fields(fields.clone()))
        }
    };
    Ok(rule)
}

/// Every known rule, addressable by id
pub struct RuleLibrary {
    rules: HashMap<String, SharedRule>,
}

impl RuleLibrary {
    /// The built-in AED and ASME Y14 rules
    pub fn builtin(thresholds: &RuleThresholds) -> Result<Self, CatalogError> {
        let mut library = Self {
            rules: HashMap::new(),
        };
        for rule in aed_rules()?.into_iter().chain(asme_rules(thresholds)?) {
            library.insert(rule)?;
        }
        Ok(library)
    }

    pub fn insert(&mut self, rule: SharedRule) -> Result<(), CatalogError> {
        let id = rule.id().to_string();
        if self.rules.contains_key(&id) {
            return Err(CatalogError::DuplicateRule(id));
        }
        self.rules.insert(id, rule);
        Ok(())
    }

    pub fn get(&self, id: &str) -> Option<&SharedRule> {
        self.rules.get(id)
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_set_sizes() {
        assert_eq!(aed_rules().unwrap().len(), 8);
        assert_eq!(asme_rules(&RuleThresholds::default()).unwrap().len(), 15);
    }

    #[test]
    fn test_builtin_ids_are_unique() {
        let library = RuleLibrary::builtin(&RuleThresholds::default()).unwrap();
        assert_eq!(library.len(), 23);
        assert!(library.get("check_nsn_present").is_some());
        assert!(library.get("check_pdf_is_machine_readable").is_some());
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut library = RuleLibrary::builtin(&RuleThresholds::default()).unwrap();
        let again = Arc::new(ScaleNotationRule);
        assert!(matches!(
            library.insert(again),
            Err(CatalogError::DuplicateRule(id)) if id == "check_scale_valid"
        ));
    }

    #[test]
    fn test_rule_from_definition_builds_keyword_rule() {
        let definition = RuleDefinition::Keyword {
            id: "check_material".into(),
            name: "Material Callout Present".into(),
            keywords: vec!["material".into()],
            case_sensitive: false,
        };
        let rule = rule_from_definition(&definition).unwrap();
        assert_eq!(rule.id(), "check_material");
        let blocks = vec![crate::types::TextBlock::new("MATERIAL: 6061-T6")];
        assert!(rule.check(&blocks).unwrap().passed);
    }

    #[test]
    fn test_empty_definition_rejected() {
        let definition = RuleDefinition::Pattern {
            id: "check_nothing".into(),
            name: "Nothing".into(),
            patterns: vec![],
            case_sensitive: false,
        };
        assert!(matches!(
            rule_from_definition(&definition),
            Err(CatalogError::EmptyRule(_))
        ));
    }
}
