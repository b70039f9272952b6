// Report module - turns verdicts into something a reviewer reads
// - aggregate.rs: pass counts and problem strings
// - serialization.rs: summary / full / text renderings

pub mod aggregate;
pub mod serialization;

pub use aggregate::{problem_description, summarize};
pub use serialization::ReportFormat;

use crate::types::TextBlock;
use crate::verdict::RuleVerdict;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Outcome of evaluating one rule set against one document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ReportMetadata>,
    pub passed_count: usize,
    pub total_count: usize,
    /// Every verdict, in rule-set order
    pub results: Vec<RuleVerdict>,
    /// The failed subset, each with its problem description
    pub failed: Vec<FailedCheck>,
}

impl Report {
    /// No checks ran
    pub fn empty() -> Self {
        summarize(Vec::new())
    }

    pub fn with_metadata(mut self, metadata: ReportMetadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn all_passed(&self) -> bool {
        self.failed.is_empty()
    }

    /// "Passed N out of M checks"
    pub fn score_line(&self) -> String {
        format!(
            "Passed {} out of {} checks",
            self.passed_count, self.total_count
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FailedCheck {
    pub rule: String,
    pub problem: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReportMetadata {
    pub run_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub rule_set: String,
    pub block_count: usize,
    /// SHA-256 over every block's page and text
    pub fingerprint: String,
}

impl ReportMetadata {
    pub fn new(rule_set: &str, blocks: &[TextBlock]) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            created_at: Utc::now(),
            rule_set: rule_set.to_string(),
            block_count: blocks.len(),
            fingerprint: document_fingerprint(blocks),
        }
    }
}

/// Stable hash of a document's content, independent of block geometry
pub fn document_fingerprint(blocks: &[TextBlock]) -> String {
    let mut hasher = Sha256::new();
    hasher.update((blocks.len() as u64).to_le_bytes());
    for block in blocks {
        hasher.update(block.page.unwrap_or(0).to_le_bytes());
        hasher.update((block.text.len() as u64).to_le_bytes());
        hasher.update(block.text.as_bytes());
    }
    format!("{:x}", hasher.finalize())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fingerprint_ignores_geometry() {
        let a = vec![TextBlock::with_vertical("TITLE", 700.0, 712.0)];
        let b = vec![TextBlock::with_vertical("TITLE", 10.0, 22.0)];
        assert_eq!(document_fingerprint(&a), document_fingerprint(&b));
    }

    #[test]
    fn test_fingerprint_sees_block_boundaries() {
        let joined = vec![TextBlock::new("AB")];
        let split = vec![TextBlock::new("A"), TextBlock::new("B")];
        assert_ne!(document_fingerprint(&joined), document_fingerprint(&split));
    }

    #[test]
    fn test_fingerprint_sees_pages() {
        let first = vec![TextBlock::new("NOTES").on_page(1)];
        let second = vec![TextBlock::new("NOTES").on_page(2)];
        assert_ne!(document_fingerprint(&first), document_fingerprint(&second));
    }

    #[test]
    fn test_metadata_counts_blocks() {
        let blocks = vec![TextBlock::new("a"), TextBlock::new("b")];
        let metadata = ReportMetadata::new("AED", &blocks);
        assert_eq!(metadata.block_count, 2);
        assert_eq!(metadata.rule_set, "AED");
        assert_eq!(metadata.fingerprint.len(), 64);
    }
}
