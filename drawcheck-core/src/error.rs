use thiserror::Error;

/// Failure raised inside a single rule while it evaluates a document.
///
/// The runner never lets one of these escape: it is folded into an errored
/// verdict for that rule and the rest of the rule set keeps running.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum RuleError {
    #[error("block is missing the '{field}' coordinate")]
    MissingCoordinate { field: &'static str },

    #[error("block bounds are inverted (y0 = {y0}, y1 = {y1})")]
    InvertedBounds { y0: f64, y1: f64 },

    #[error("number '{value}' is out of range")]
    NumberOutOfRange { value: String },

    #[error("{0}")]
    Internal(String),
}

/// Problems detected while assembling the rule catalog at startup
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("rule set '{set}' references unknown rule '{rule}'")]
    UnknownRule { set: String, rule: String },

    #[error("rule id '{0}' is defined more than once")]
    DuplicateRule(String),

    #[error("rule set '{0}' is defined more than once")]
    DuplicateRuleSet(String),

    #[error("rule '{rule}' has an invalid pattern: {source}")]
    InvalidPattern {
        rule: String,
        #[source]
        source: regex::Error,
    },

    #[error("rule '{0}' declares no keywords or patterns")]
    EmptyRule(String),
}

/// Errors from the block sources that feed the engine
#[derive(Debug, Error)]
pub enum SourceError {
    #[error("failed to read input: {0}")]
    Io(#[from] std::io::Error),

    #[error("input is not valid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    #[error("malformed text block JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unsupported input type: {0}")]
    Unsupported(String),
}
