use super::{has_extension, BlockSource};
use crate::error::SourceError;
use crate::types::TextBlock;
use serde::Deserialize;
use std::path::Path;

/// Reads extractor output: a JSON array of blocks, or an object wrapping one
/// under `blocks`. Text is trimmed the way the extractor trims it.
pub struct JsonBlockSource;

#[derive(Deserialize)]
#[serde(untagged)]
enum BlockDocument {
    Bare(Vec<TextBlock>),
    Wrapped { blocks: Vec<TextBlock> },
}

impl BlockSource for JsonBlockSource {
    fn load(&self, bytes: &[u8]) -> Result<Vec<TextBlock>, SourceError> {
        let content = std::str::from_utf8(bytes)?;
        let document: BlockDocument = serde_json::from_str(content)?;
        let mut blocks = match document {
            BlockDocument::Bare(blocks) | BlockDocument::Wrapped { blocks } => blocks,
        };
        for block in &mut blocks {
            let trimmed = block.text.trim();
            if trimmed.len() != block.text.len() {
                block.text = trimmed.to_string();
            }
        }
        Ok(blocks)
    }

    fn name(&self) -> &str {
        "json"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        has_extension(path, &["json"])
    }
}
