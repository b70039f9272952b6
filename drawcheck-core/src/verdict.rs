use serde::ser::SerializeStruct;
use serde::{Deserialize, Serialize, Serializer};

/// Rule-specific diagnostics attached to an evaluated verdict.
///
/// Serialized externally tagged, so a payload reads as
/// `{"missing_fields": ["TITLE"]}` or `{"too_small_ratio": 0.25}`.
/// Keyword hits and sheet labels share the `found` key.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", from = "DetailsRepr")]
pub enum Details {
    /// Required keywords absent from the drawing, in declaration order
    MissingFields(Vec<String>),
    /// Field keywords seen in more than one block
    Duplicates(Vec<String>),
    /// Keywords that were present
    Found(Vec<String>),
    /// Every parsed "SHEET N OF M" pair as (current, total)
    #[serde(rename(serialize = "found"))]
    SheetLabels(Vec<(u64, u64)>),
    /// Share of blocks below the legibility height, rounded to 2 places
    TooSmallRatio(f64),
    /// (min, max) of the y0 values of title-block fields
    YRange(f64, f64),
}

#[derive(Deserialize)]
#[serde(rename_all = "snake_case")]
enum DetailsRepr {
    MissingFields(Vec<String>),
    Duplicates(Vec<String>),
    Found(FoundRepr),
    SheetLabels(Vec<(u64, u64)>),
    TooSmallRatio(f64),
    YRange(f64, f64),
}

// An empty `found` list reads back as keywords
#[derive(Deserialize)]
#[serde(untagged)]
enum FoundRepr {
    Keywords(Vec<String>),
    SheetLabels(Vec<(u64, u64)>),
}

impl From<DetailsRepr> for Details {
    fn from(repr: DetailsRepr) -> Self {
        match repr {
            DetailsRepr::MissingFields(fields) => Details::MissingFields(fields),
            DetailsRepr::Duplicates(fields) => Details::Duplicates(fields),
            DetailsRepr::Found(FoundRepr::Keywords(keywords)) => Details::Found(keywords),
            DetailsRepr::Found(FoundRepr::SheetLabels(labels))
            | DetailsRepr::SheetLabels(labels) => Details::SheetLabels(labels),
            DetailsRepr::TooSmallRatio(ratio) => Details::TooSmallRatio(ratio),
            DetailsRepr::YRange(min, max) => Details::YRange(min, max),
        }
    }
}

/// Serialized with a `status` tag. `passed` is always written and is false
/// for errored verdicts.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome {
    /// The rule ran to completion
    Evaluated {
        passed: bool,
        #[serde(default)]
        details: Option<Details>,
    },
    /// The rule could not evaluate this document
    Errored { error: String },
}

impl Serialize for Outcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("Outcome", 3)?;
        match self {
            Outcome::Evaluated { passed, details } => {
                state.serialize_field("status", "evaluated")?;
                state.serialize_field("passed", passed)?;
                match details {
                    Some(details) => state.serialize_field("details", details)?,
                    None => state.skip_field("details")?,
                }
            }
            Outcome::Errored { error } => {
                state.serialize_field("status", "errored")?;
                state.serialize_field("passed", &false)?;
                state.serialize_field("error", error)?;
            }
        }
        state.end()
    }
}

/// What a single rule concluded about one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RuleVerdict {
    /// Human-readable rule name, stable across runs
    pub rule: String,
    /// Declared identifier of the rule that produced this verdict
    pub id: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl RuleVerdict {
    pub fn evaluated(id: &str, rule: &str, passed: bool, details: Option<Details>) -> Self {
        Self {
            rule: rule.to_string(),
            id: id.to_string(),
            outcome: Outcome::Evaluated { passed, details },
        }
    }

    pub fn errored(id: &str, rule: &str, error: impl Into<String>) -> Self {
        Self {
            rule: rule.to_string(),
            id: id.to_string(),
            outcome: Outcome::Errored {
                error: error.into(),
            },
        }
    }

    /// Errored verdicts never pass
    pub fn passed(&self) -> bool {
        matches!(self.outcome, Outcome::Evaluated { passed: true, .. })
    }

    pub fn details(&self) -> Option<&Details> {
        match &self.outcome {
            Outcome::Evaluated { details, .. } => details.as_ref(),
            Outcome::Errored { .. } => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Outcome::Errored { error } => Some(error),
            Outcome::Evaluated { .. } => None,
        }
    }
}

/// Result of a rule's own evaluation, before the runner stamps identity on it
#[derive(Debug, Clone, PartialEq)]
pub struct Check {
    pub passed: bool,
    pub details: Option<Details>,
}

impl Check {
    pub fn pass() -> Self {
        Self {
            passed: true,
            details: None,
        }
    }

    pub fn from_bool(passed: bool) -> Self {
        Self {
            passed,
            details: None,
        }
    }

    pub fn with_details(mut self, details: Details) -> Self {
        self.details = Some(details);
        self
    }
}

/// Round to two decimal places for reporting
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_errored_verdict_never_passes() {
        let verdict = RuleVerdict::errored("check_x", "X", "boom");
        assert!(!verdict.passed());
        assert_eq!(verdict.error(), Some("boom"));
        assert!(verdict.details().is_none());
    }

    #[test]
    fn test_verdict_serialized_shape() {
        let verdict = RuleVerdict::evaluated(
            "check_required_fields",
            "Basic Title Block Completeness",
            false,
            Some(Details::MissingFields(vec!["TITLE".into(), "REV".into()])),
        );
        let value = serde_json::to_value(&verdict).unwrap();
        assert_eq!(
            value,
            json!({
                "rule": "Basic Title Block Completeness",
                "id": "check_required_fields",
                "status": "evaluated",
                "passed": false,
                "details": {"missing_fields": ["TITLE", "REV"]}
            })
        );
    }

    #[test]
    fn test_errored_serialized_shape() {
        let verdict = RuleVerdict::errored("check_font_size_legibility", "Font Size Legibility", "no y0");
        let value = serde_json::to_value(&verdict).unwrap();
        assert_eq!(value["status"], "errored");
        assert_eq!(value["error"], "no y0");
        assert_eq!(value["passed"], false);
    }

    #[test]
    fn test_errored_verdict_reads_back() {
        let verdict = RuleVerdict::errored("check_x", "X", "boom");
        let json = serde_json::to_string(&verdict).unwrap();
        let back: RuleVerdict = serde_json::from_str(&json).unwrap();
        assert_eq!(back, verdict);
    }

    #[test]
    fn test_sheet_labels_serialize_as_found() {
        let details = Details::SheetLabels(vec![(2, 3), (5, 2)]);
        let value = serde_json::to_value(&details).unwrap();
        assert_eq!(value, json!({"found": [[2, 3], [5, 2]]}));
        let back: Details = serde_json::from_value(value).unwrap();
        assert_eq!(back, details);
    }

    #[test]
    fn test_found_keywords_read_back_as_keywords() {
        let details = Details::Found(vec!["TOLERANCES".into()]);
        let back: Details = serde_json::from_value(serde_json::to_value(&details).unwrap()).unwrap();
        assert_eq!(back, details);
    }

    #[test]
    fn test_round2() {
        assert_eq!(round2(1.0 / 3.0), 0.33);
        assert_eq!(round2(2.0 / 3.0), 0.67);
        assert_eq!(round2(0.0), 0.0);
    }
}
