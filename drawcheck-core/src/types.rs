use crate::error::RuleError;
use serde::{Deserialize, Serialize};

// ===== TEXT BLOCK MODEL =====
// One unit of extracted text plus its position on the page. Coordinates are
// in the extractor's space (origin top-left, y grows downwards), so a larger
// y0 means the block sits lower on the sheet.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextBlock {
    /// Raw extracted text. Never pre-uppercased; rules fold case themselves.
    pub text: String,
    /// Page number (1-indexed), absent for minimal callers
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y0: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub x1: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub y1: Option<f64>,
}

impl TextBlock {
    /// Block with text only. Geometry rules will reject it.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            page: None,
            x0: None,
            y0: None,
            x1: None,
            y1: None,
        }
    }

    /// Block with a vertical extent only, the shape most rules consult
    pub fn with_vertical(text: impl Into<String>, y0: f64, y1: f64) -> Self {
        Self {
            y0: Some(y0),
            y1: Some(y1),
            ..Self::new(text)
        }
    }

    pub fn with_bounds(text: impl Into<String>, x0: f64, y0: f64, x1: f64, y1: f64) -> Self {
        Self {
            x0: Some(x0),
            y0: Some(y0),
            x1: Some(x1),
            y1: Some(y1),
            ..Self::new(text)
        }
    }

    pub fn on_page(mut self, page: u32) -> Self {
        self.page = Some(page);
        self
    }

    pub fn top(&self) -> Result<f64, RuleError> {
        self.y0.ok_or(RuleError::MissingCoordinate { field: "y0" })
    }

    pub fn bottom(&self) -> Result<f64, RuleError> {
        self.y1.ok_or(RuleError::MissingCoordinate { field: "y1" })
    }

    /// Vertical extent `y1 - y0`, rejecting blocks whose bounds are inverted
    pub fn height(&self) -> Result<f64, RuleError> {
        let (y0, y1) = (self.top()?, self.bottom()?);
        if y1 < y0 {
            return Err(RuleError::InvertedBounds { y0, y1 });
        }
        Ok(y1 - y0)
    }

    pub fn upper_text(&self) -> String {
        self.text.to_uppercase()
    }
}

/// How a rule folds case before matching
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CaseMode {
    /// Match against upper-cased text (keyword-style rules)
    #[default]
    Upper,
    /// Match against the text as extracted, so symbols like `±` or circled
    /// GD&T modifiers survive untouched
    Preserve,
}

/// Join every block's text with a single space, the way all "whole drawing"
/// rules see the document. No blocks means an empty string.
pub fn joined_text(blocks: &[TextBlock], case: CaseMode) -> String {
    let parts: Vec<String> = match case {
        CaseMode::Upper => blocks.iter().map(TextBlock::upper_text).collect(),
        CaseMode::Preserve => blocks.iter().map(|b| b.text.clone()).collect(),
    };
    parts.join(" ")
}
