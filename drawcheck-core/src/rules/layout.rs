use super::DrawingRule;
use crate::config::RuleThresholds;
use crate::error::RuleError;
use crate::types::TextBlock;
use crate::verdict::{round2, Check, Details};

// Position heuristics. All of them assume a single page in the extractor's
// top-down coordinate space, where larger y0 means lower on the sheet.

const TITLE_BLOCK_KEYWORDS: &[&str] = &["DRAWN", "TITLE", "SCALE", "REV", "DATE"];
const ALIGNED_FIELDS: &[&str] = &["TITLE", "DRAWN", "DATE", "SCALE", "REV"];

/// The title block lives in the bottom band of the sheet: some block below
/// the configured y0 line must carry a title-block label.
pub struct TitleBlockLocationRule {
    min_y0: f64,
}

impl TitleBlockLocationRule {
    pub fn new(thresholds: &RuleThresholds) -> Self {
        Self {
            min_y0: thresholds.title_block_min_y0,
        }
    }
}

impl DrawingRule for TitleBlockLocationRule {
    fn id(&self) -> &str {
        "check_title_block_location"
    }

    fn name(&self) -> &str {
        "Title Block Positioned Near Bottom"
    }

    fn check(&self, blocks: &[TextBlock]) -> Result<Check, RuleError> {
        let mut found = false;
        for block in blocks {
            // Every block needs a y0, even ones that carry no label
            if block.top()? <= self.min_y0 {
                continue;
            }
            let text = block.upper_text();
            if TITLE_BLOCK_KEYWORDS.iter().any(|kw| text.contains(kw)) {
                found = true;
            }
        }
        Ok(Check::from_bool(found))
    }
}

/// Title-block fields should sit in one horizontal band. Each (block, field)
/// hit contributes that block's y0; fewer than two points pass trivially.
pub struct FieldAlignmentRule {
    band: f64,
}

impl FieldAlignmentRule {
    pub fn new(thresholds: &RuleThresholds) -> Self {
        Self {
            band: thresholds.alignment_band,
        }
    }
}

impl DrawingRule for FieldAlignmentRule {
    fn id(&self) -> &str {
        "check_field_alignment_heuristic"
    }

    fn name(&self) -> &str {
        "Field Alignment Heuristic"
    }

    fn check(&self, blocks: &[TextBlock]) -> Result<Check, RuleError> {
        let mut y_coords = Vec::new();
        for block in blocks {
            let text = block.upper_text();
            for field in ALIGNED_FIELDS {
                if text.contains(field) {
                    y_coords.push(block.top()?);
                }
            }
        }

        let min = y_coords.iter().copied().reduce(f64::min);
        let max = y_coords.iter().copied().reduce(f64::max);
        let passed = match (min, max) {
            (Some(min), Some(max)) if y_coords.len() >= 2 => max - min < self.band,
            _ => true,
        };

        Ok(Check::from_bool(passed)
            .with_details(Details::YRange(min.unwrap_or(0.0), max.unwrap_or(0.0))))
    }
}

/// Flags drawings where too many blocks are shorter than the legibility
/// height (11 units is roughly 8pt text).
pub struct FontLegibilityRule {
    min_height: f64,
    max_ratio: f64,
}

impl FontLegibilityRule {
    pub fn new(thresholds: &RuleThresholds) -> Self {
        Self {
            min_height: thresholds.min_text_height,
            max_ratio: thresholds.max_small_text_ratio,
        }
    }
}

impl DrawingRule for FontLegibilityRule {
    fn id(&self) -> &str {
        "check_font_size_legibility"
    }

    fn name(&self) -> &str {
        "Font Size Legibility"
    }

    fn check(&self, blocks: &[TextBlock]) -> Result<Check, RuleError> {
        let heights = blocks
            .iter()
            .map(TextBlock::height)
            .collect::<Result<Vec<f64>, RuleError>>()?;

        let tiny = heights.iter().filter(|h| **h < self.min_height).count();
        let ratio = if heights.is_empty() {
            0.0
        } else {
            tiny as f64 / heights.len() as f64
        };

        Ok(Check::from_bool(ratio < self.max_ratio)
            .with_details(Details::TooSmallRatio(round2(ratio))))
    }
}

/// Scanned drawings come back from extraction as a handful of blocks at
/// most; anything at or under the minimum is treated as not machine-readable.
pub struct MachineReadableRule {
    min_blocks: usize,
}

impl MachineReadableRule {
    pub fn new(thresholds: &RuleThresholds) -> Self {
        Self {
            min_blocks: thresholds.min_block_count,
        }
    }
}

impl DrawingRule for MachineReadableRule {
    fn id(&self) -> &str {
        "check_pdf_is_machine_readable"
    }

    fn name(&self) -> &str {
        "PDF is Machine-Readable"
    }

    fn check(&self, blocks: &[TextBlock]) -> Result<Check, RuleError> {
        Ok(Check::from_bool(blocks.len() > self.min_blocks))
    }
}
