use super::{has_extension, BlockSource};
use crate::error::SourceError;
use crate::types::TextBlock;
use std::path::Path;

// The whole dump becomes one block spanning a nominal page height, which is
// what a page-level text extraction looks like when no block geometry exists.
const PAGE_TOP: f64 = 0.0;
const PAGE_BOTTOM: f64 = 1000.0;

pub struct PlainTextSource;

impl PlainTextSource {
    pub fn block_from_text(text: &str) -> TextBlock {
        TextBlock::with_vertical(text, PAGE_TOP, PAGE_BOTTOM)
    }
}

impl BlockSource for PlainTextSource {
    fn load(&self, bytes: &[u8]) -> Result<Vec<TextBlock>, SourceError> {
        let text = std::str::from_utf8(bytes)?;
        Ok(vec![Self::block_from_text(text)])
    }

    fn name(&self) -> &str {
        "plain_text"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        has_extension(path, &["txt", "text"])
    }
}
