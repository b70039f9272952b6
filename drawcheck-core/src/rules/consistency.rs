use super::DrawingRule;
use crate::error::{CatalogError, RuleError};
use crate::types::TextBlock;
use crate::verdict::{Check, Details};
use regex::Regex;

const DUPLICATE_FIELDS: &[&str] = &["TITLE", "DRAWING NUMBER", "SCALE", "DATE", "REV", "APPROVED"];

/// Every "SHEET N OF M" label must have N <= M. All labels in every block are
/// checked, and the parsed pairs are reported as `found`. Sheet numbers may
/// be written in any decimal digit script.
pub struct SheetLabelConsistencyRule {
    pattern: Regex,
    digit: Regex,
}

impl SheetLabelConsistencyRule {
    pub fn new() -> Result<Self, CatalogError> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|source| CatalogError::InvalidPattern {
                rule: "check_sheet_label_consistency".to_string(),
                source,
            })
        };
        Ok(Self {
            pattern: compile(r"SHEET\s+(\d+)\s+OF\s+(\d+)")?,
            digit: compile(r"^\d$")?,
        })
    }

    fn is_digit(&self, c: char) -> bool {
        let mut buf = [0u8; 4];
        self.digit.is_match(c.encode_utf8(&mut buf))
    }

    // Unicode lays out each decimal digit set as a contiguous run starting
    // at zero, so a digit's value is its offset into the run, modulo 10.
    fn digit_value(&self, c: char) -> Option<u64> {
        if let Some(value) = c.to_digit(10) {
            return Some(u64::from(value));
        }
        if !self.is_digit(c) {
            return None;
        }
        let mut offset = 0u64;
        let mut code = c as u32;
        while let Some(prev) = code.checked_sub(1).and_then(char::from_u32) {
            if !self.is_digit(prev) {
                break;
            }
            offset += 1;
            code -= 1;
        }
        Some(offset % 10)
    }

    fn parse_sheet_number(&self, digits: &str) -> Result<u64, RuleError> {
        let out_of_range = || RuleError::NumberOutOfRange {
            value: digits.to_string(),
        };
        digits.chars().try_fold(0u64, |acc, c| {
            let value = self.digit_value(c).ok_or_else(out_of_range)?;
            acc.checked_mul(10)
                .and_then(|shifted| shifted.checked_add(value))
                .ok_or_else(out_of_range)
        })
    }
}

impl DrawingRule for SheetLabelConsistencyRule {
    fn id(&self) -> &str {
        "check_sheet_label_consistency"
    }

    fn name(&self) -> &str {
        "Sheet Label Consistency"
    }

    fn check(&self, blocks: &[TextBlock]) -> Result<Check, RuleError> {
        let mut labels = Vec::new();
        for block in blocks {
            let text = block.upper_text();
            for caps in self.pattern.captures_iter(&text) {
                let current = self.parse_sheet_number(&caps[1])?;
                let total = self.parse_sheet_number(&caps[2])?;
                labels.push((current, total));
            }
        }

        let consistent = labels.iter().all(|(current, total)| current <= total);
        Ok(Check::from_bool(consistent).with_details(Details::SheetLabels(labels)))
    }
}

/// A title-block field label should appear in exactly one block. Counts the
/// blocks mentioning each label and reports every label seen more than once,
/// in the order the labels were first encountered.
pub struct DuplicateFieldsRule;

impl DrawingRule for DuplicateFieldsRule {
    fn id(&self) -> &str {
        "check_duplicate_fields"
    }

    fn name(&self) -> &str {
        "Duplicate Field Check"
    }

    fn check(&self, blocks: &[TextBlock]) -> Result<Check, RuleError> {
        let mut field_counts: Vec<(&str, usize)> = Vec::new();
        for block in blocks {
            let text = block.upper_text();
            for field in DUPLICATE_FIELDS {
                if !text.contains(field) {
                    continue;
                }
                match field_counts.iter().position(|(seen, _)| seen == field) {
                    Some(index) => field_counts[index].1 += 1,
                    None => field_counts.push((*field, 1)),
                }
            }
        }

        let duplicates: Vec<String> = field_counts
            .into_iter()
            .filter(|(_, count)| *count > 1)
            .map(|(field, _)| field.to_string())
            .collect();

        Ok(Check::from_bool(duplicates.is_empty()).with_details(Details::Duplicates(duplicates)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blocks(texts: &[&str]) -> Vec<TextBlock> {
        texts.iter().map(|t| TextBlock::new(*t)).collect()
    }

    #[test]
    fn test_sheet_labels_all_consistent() {
        let rule = SheetLabelConsistencyRule::new().unwrap();
        let check = rule.check(&blocks(&["sheet 1 of 3", "SHEET 3 OF 3"])).unwrap();
        assert!(check.passed);
        assert_eq!(check.details, Some(Details::SheetLabels(vec![(1, 3), (3, 3)])));
    }

    #[test]
    fn test_sheet_labels_inconsistent_pair_fails() {
        let rule = SheetLabelConsistencyRule::new().unwrap();
        let check = rule.check(&blocks(&["SHEET 2 OF 3", "SHEET 5 OF 2"])).unwrap();
        assert!(!check.passed);
        assert_eq!(check.details, Some(Details::SheetLabels(vec![(2, 3), (5, 2)])));
    }

    #[test]
    fn test_every_label_in_a_block_is_checked() {
        let rule = SheetLabelConsistencyRule::new().unwrap();
        let check = rule.check(&blocks(&["SHEET 1 OF 2 ... SHEET 4 OF 2"])).unwrap();
        assert!(!check.passed);
        assert_eq!(check.details, Some(Details::SheetLabels(vec![(1, 2), (4, 2)])));
    }

    #[test]
    fn test_no_sheet_labels_is_consistent() {
        let rule = SheetLabelConsistencyRule::new().unwrap();
        let check = rule.check(&[]).unwrap();
        assert!(check.passed);
        assert_eq!(check.details, Some(Details::SheetLabels(vec![])));
    }

    #[test]
    fn test_oversized_sheet_number_is_an_error() {
        let rule = SheetLabelConsistencyRule::new().unwrap();
        let result = rule.check(&blocks(&["SHEET 99999999999999999999999 OF 2"]));
        assert!(matches!(result, Err(RuleError::NumberOutOfRange { .. })));
    }

    #[test]
    fn test_fullwidth_sheet_numbers_are_parsed() {
        let rule = SheetLabelConsistencyRule::new().unwrap();
        let check = rule.check(&blocks(&["SHEET ２ OF ３"])).unwrap();
        assert!(check.passed);
        assert_eq!(check.details, Some(Details::SheetLabels(vec![(2, 3)])));
    }

    #[test]
    fn test_non_ascii_digits_keep_their_value() {
        let rule = SheetLabelConsistencyRule::new().unwrap();
        // Arabic-Indic 12 of 3, Devanagari 9 of 10
        let check = rule.check(&blocks(&["SHEET ١٢ OF ٣", "SHEET ९ OF १०"])).unwrap();
        assert!(!check.passed);
        assert_eq!(check.details, Some(Details::SheetLabels(vec![(12, 3), (9, 10)])));
    }

    #[test]
    fn test_duplicate_title_detected() {
        let check = DuplicateFieldsRule
            .check(&blocks(&["TITLE: BRACKET", "SCALE 1:1", "title block"]))
            .unwrap();
        assert!(!check.passed);
        assert_eq!(check.details, Some(Details::Duplicates(vec!["TITLE".into()])));
    }

    #[test]
    fn test_single_occurrences_pass() {
        let check = DuplicateFieldsRule
            .check(&blocks(&["TITLE: BRACKET", "SCALE 1:1", "DATE 2024-01-01"]))
            .unwrap();
        assert!(check.passed);
        assert_eq!(check.details, Some(Details::Duplicates(vec![])));
    }

    #[test]
    fn test_same_block_counts_once_per_field() {
        let check = DuplicateFieldsRule.check(&blocks(&["TITLE TITLE TITLE"])).unwrap();
        assert!(check.passed);
    }

    #[test]
    fn test_duplicates_follow_first_seen_order() {
        let check = DuplicateFieldsRule
            .check(&blocks(&["DATE", "SCALE", "DATE", "SCALE"]))
            .unwrap();
        assert_eq!(
            check.details,
            Some(Details::Duplicates(vec!["DATE".into(), "SCALE".into()]))
        );
    }
}
