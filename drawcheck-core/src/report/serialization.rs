use super::{Report, ReportMetadata};
use anyhow::{bail, Result};
use serde::Serialize;
use std::fmt::Write as _;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReportFormat {
    /// `{rule, passed, problem?}` per check plus counts
    #[default]
    Summary,
    /// The whole report including typed details
    Full,
    /// Human-readable listing
    Text,
}

impl FromStr for ReportFormat {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "summary" => Ok(ReportFormat::Summary),
            "full" => Ok(ReportFormat::Full),
            "text" => Ok(ReportFormat::Text),
            other => bail!("unknown report format '{other}' (expected summary, full or text)"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct SummaryDocument<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<&'a ReportMetadata>,
    pub passed_count: usize,
    pub total_count: usize,
    pub results: Vec<SummaryEntry<'a>>,
}

#[derive(Debug, Serialize)]
pub struct SummaryEntry<'a> {
    pub rule: &'a str,
    pub passed: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub problem: Option<String>,
}

impl Report {
    pub fn to_summary_format(&self) -> SummaryDocument<'_> {
        let results = self
            .results
            .iter()
            .map(|verdict| SummaryEntry {
                rule: &verdict.rule,
                passed: verdict.passed(),
                problem: (!verdict.passed()).then(|| super::problem_description(verdict)),
            })
            .collect();

        SummaryDocument {
            metadata: self.metadata.as_ref(),
            passed_count: self.passed_count,
            total_count: self.total_count,
            results,
        }
    }

    pub fn to_text_format(&self) -> String {
        let mut out = String::new();
        if let Some(metadata) = &self.metadata {
            let _ = writeln!(out, "Rule set: {}", metadata.rule_set);
            let _ = writeln!(out, "Blocks: {}", metadata.block_count);
        }
        let _ = writeln!(out, "{}", self.score_line());
        for verdict in &self.results {
            if verdict.passed() {
                let _ = writeln!(out, "  ✅ {}", verdict.rule);
            }
        }
        for failed in &self.failed {
            let _ = writeln!(out, "  ❌ {}: {}", failed.rule, failed.problem);
        }
        out
    }

    pub fn render(&self, format: ReportFormat) -> Result<String> {
        let rendered = match format {
            ReportFormat::Summary => serde_json::to_string_pretty(&self.to_summary_format())?,
            ReportFormat::Full => serde_json::to_string_pretty(self)?,
            ReportFormat::Text => self.to_text_format(),
        };
        Ok(rendered)
    }

    pub fn save_with_format(&self, path: &str, format: ReportFormat) -> Result<()> {
        std::fs::write(path, self.render(format)?)?;
        Ok(())
    }
}
