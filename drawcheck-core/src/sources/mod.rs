// Block sources - everything that turns an input file into TextBlocks
//
// PDF extraction itself happens upstream. The engine starts from the
// extractor's output (JSON blocks) or from a flat text dump.

pub mod json;
pub mod plain_text;

pub use json::JsonBlockSource;
pub use plain_text::PlainTextSource;

use crate::error::SourceError;
use crate::types::TextBlock;
use std::path::Path;

/// Converts raw input into the ordered block sequence rules consume
pub trait BlockSource {
    fn load(&self, bytes: &[u8]) -> Result<Vec<TextBlock>, SourceError>;

    fn load_file(&self, path: &Path) -> Result<Vec<TextBlock>, SourceError> {
        let bytes = std::fs::read(path)?;
        self.load(&bytes)
    }

    /// Source name for logs
    fn name(&self) -> &str;

    fn supports_file_type(&self, path: &Path) -> bool;
}

/// How the caller wants an input interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum InputFormat {
    /// Pick from the file extension
    #[default]
    Auto,
    Json,
    Text,
}

impl std::str::FromStr for InputFormat {
    type Err = SourceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "auto" => Ok(InputFormat::Auto),
            "json" => Ok(InputFormat::Json),
            "text" => Ok(InputFormat::Text),
            other => Err(SourceError::Unsupported(format!("input format '{other}'"))),
        }
    }
}

/// Choose a source for `path`. PDFs are rejected: extract them to JSON first.
pub fn source_for(path: &Path, format: InputFormat) -> Result<Box<dyn BlockSource>, SourceError> {
    match format {
        InputFormat::Json => return Ok(Box::new(JsonBlockSource)),
        InputFormat::Text => return Ok(Box::new(PlainTextSource)),
        InputFormat::Auto => {}
    }

    let candidates: Vec<Box<dyn BlockSource>> =
        vec![Box::new(JsonBlockSource) as Box<dyn BlockSource>, Box::new(PlainTextSource)];
    candidates
        .into_iter()
        .find(|source| source.supports_file_type(path))
        .ok_or_else(|| SourceError::Unsupported(path.display().to_string()))
}

pub(crate) fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| extensions.iter().any(|ext| e.eq_ignore_ascii_case(ext)))
        .unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_auto_detects_by_extension() {
        let json = source_for(Path::new("drawing.JSON"), InputFormat::Auto).unwrap();
        assert_eq!(json.name(), "json");
        let text = source_for(Path::new("drawing.txt"), InputFormat::Auto).unwrap();
        assert_eq!(text.name(), "plain_text");
    }

    #[test]
    fn test_pdf_is_unsupported() {
        assert!(matches!(
            source_for(Path::new("drawing.pdf"), InputFormat::Auto),
            Err(SourceError::Unsupported(_))
        ));
    }

    #[test]
    fn test_explicit_format_wins_over_extension() {
        let source = source_for(Path::new("blocks.dat"), InputFormat::Json).unwrap();
        assert_eq!(source.name(), "json");
    }

    #[test]
    fn test_input_format_names() {
        assert_eq!("text".parse::<InputFormat>().unwrap(), InputFormat::Text);
        assert!("pdf".parse::<InputFormat>().is_err());
    }
}
