use super::DrawingRule;
use crate::error::RuleError;
use crate::types::{joined_text, CaseMode, TextBlock};
use crate::verdict::{Check, Details};

/// Passes when at least one keyword appears anywhere in the drawing text
pub struct KeywordPresenceRule {
    id: String,
    name: String,
    keywords: Vec<String>,
    case: CaseMode,
    report_found: bool,
}

impl KeywordPresenceRule {
    pub fn new(id: &str, name: &str, keywords: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            keywords: keywords.iter().map(|k| k.to_string()).collect(),
            case: CaseMode::Upper,
            report_found: false,
        }
    }

    /// Match keywords against the text as extracted
    pub fn case_sensitive(mut self) -> Self {
        self.case = CaseMode::Preserve;
        self
    }

    /// Attach the list of keywords that were seen as `found`
    pub fn reporting_found(mut self) -> Self {
        self.report_found = true;
        self
    }

    pub fn with_keywords(mut self, keywords: Vec<String>) -> Self {
        self.keywords = keywords;
        self
    }

    fn normalized(&self, keyword: &str) -> String {
        match self.case {
            CaseMode::Upper => keyword.to_uppercase(),
            CaseMode::Preserve => keyword.to_string(),
        }
    }
}

impl DrawingRule for KeywordPresenceRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, blocks: &[TextBlock]) -> Result<Check, RuleError> {
        let all_text = joined_text(blocks, self.case);

        if !self.report_found {
            let found = self
                .keywords
                .iter()
                .any(|k| all_text.contains(&self.normalized(k)));
            return Ok(Check::from_bool(found));
        }

        let found: Vec<String> = self
            .keywords
            .iter()
            .filter(|k| all_text.contains(&self.normalized(k)))
            .cloned()
            .collect();
        Ok(Check::from_bool(!found.is_empty()).with_details(Details::Found(found)))
    }
}

/// Passes only when every required field label is present.
/// Reports the absent ones as `missing_fields`, in declaration order.
pub struct RequiredFieldsRule {
    id: String,
    name: String,
    fields: Vec<String>,
}

impl RequiredFieldsRule {
    pub fn new(id: &str, name: &str, fields: &[&str]) -> Self {
        Self {
            id: id.to_string(),
            name: name.to_string(),
            fields: fields.iter().map(|f| f.to_uppercase()).collect(),
        }
    }

    pub fn with_fields(mut self, fields: Vec<String>) -> Self {
        self.fields = fields.iter().map(|f| f.to_uppercase()).collect();
        self
    }
}

impl DrawingRule for RequiredFieldsRule {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn check(&self, blocks: &[TextBlock]) -> Result<Check, RuleError> {
        let all_text = joined_text(blocks, CaseMode::Upper);
        let missing: Vec<String> = self
            .fields
            .iter()
            .filter(|field| !all_text.contains(field.as_str()))
            .cloned()
            .collect();

        Ok(Check::from_bool(missing.is_empty()).with_details(Details::MissingFields(missing)))
    }
}

/// A scale callout needs the SCALE label and either a ratio ("1:") or NTS
pub struct ScaleNotationRule;

impl DrawingRule for ScaleNotationRule {
    fn id(&self) -> &str {
        "check_scale_valid"
    }

    fn name(&self) -> &str {
        "Drawing Scale Valid"
    }

    fn check(&self, blocks: &[TextBlock]) -> Result<Check, RuleError> {
        let all_text = joined_text(blocks, CaseMode::Upper);
        let found =
            all_text.contains("SCALE") && (all_text.contains("1:") || all_text.contains("NTS"));
        Ok(Check::from_bool(found))
    }
}
