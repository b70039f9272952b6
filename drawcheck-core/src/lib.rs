// Drawcheck Core Library
//
// Evaluates engineering-drawing text blocks against named rule sets
// (AED, ASME Y14, or sets composed in configuration) and summarizes the
// verdicts into a report.

pub mod config;
pub mod error;
pub mod processor;
pub mod report;
pub mod rules;
pub mod sources;
pub mod types;
pub mod verdict;

// Re-export main types and functions for easy use
pub use config::{ReviewConfig, RuleDefinition, RuleSetConfig, RuleThresholds};
pub use error::{CatalogError, RuleError, SourceError};
pub use processor::{select_page, DocumentReviewer, ReviewOptions, StepProfiler};
pub use report::{problem_description, summarize, FailedCheck, Report, ReportFormat, ReportMetadata};
pub use rules::{DrawingRule, RuleCatalog, RuleRunner, RuleSet, AED, ASME_Y14};
pub use sources::{BlockSource, InputFormat, JsonBlockSource, PlainTextSource};
pub use types::{CaseMode, TextBlock};
pub use verdict::{Check, Details, Outcome, RuleVerdict};
