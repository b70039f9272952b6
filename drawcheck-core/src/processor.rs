use crate::config::ReviewConfig;
use crate::report::{summarize, Report, ReportMetadata};
use crate::rules::{RuleCatalog, RuleRunner};
use crate::sources::{source_for, InputFormat};
use crate::types::TextBlock;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::{Duration, Instant};

/// Simple profiler that collects timings for review steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        self.record(step_name, start.elapsed());
        result
    }

    pub fn record(&mut self, step_name: &str, elapsed: Duration) {
        if !self.enabled {
            return;
        }
        tracing::debug!(step = step_name, elapsed_us = elapsed.as_micros() as u64, "step timed");
        self.timings.push((step_name.to_string(), elapsed));
    }

    pub fn timings(&self) -> &[(String, Duration)] {
        &self.timings
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        println!("\n📊 Performance Summary:");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();

        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            println!(
                "   {:.<45} {:.3}ms ({:.1}%)",
                step,
                duration.as_secs_f64() * 1000.0,
                percentage
            );
        }
        println!("   {:.<45} {:.3}ms", "Total", total.as_secs_f64() * 1000.0);
    }
}

/// Per-call knobs for a review
#[derive(Debug, Clone, Default)]
pub struct ReviewOptions {
    /// Restrict evaluation to blocks on this page
    pub page: Option<u32>,
    pub input_format: InputFormat,
    pub profile: bool,
}

/// Loads a document, evaluates a rule set and summarizes the verdicts.
///
/// Holds an immutable catalog, so one reviewer can be shared across threads.
pub struct DocumentReviewer {
    catalog: RuleCatalog,
    runner: RuleRunner,
}

impl DocumentReviewer {
    pub fn new(catalog: RuleCatalog) -> Self {
        Self {
            catalog,
            runner: RuleRunner::new(),
        }
    }

    pub fn from_config(config: &ReviewConfig) -> Result<Self> {
        let catalog = RuleCatalog::from_config(config).context("building rule catalog")?;
        Ok(Self::new(catalog))
    }

    pub fn catalog(&self) -> &RuleCatalog {
        &self.catalog
    }

    /// Evaluate `rule_set` against blocks already in memory
    pub fn review_blocks(&self, rule_set: &str, blocks: &[TextBlock]) -> Report {
        self.review_blocks_with_profiler(rule_set, blocks, &mut StepProfiler::new(false))
    }

    pub fn review_blocks_with_profiler(
        &self,
        rule_set: &str,
        blocks: &[TextBlock],
        profiler: &mut StepProfiler,
    ) -> Report {
        let set = self.catalog.get(rule_set);

        let start = Instant::now();
        let (verdicts, rule_timings) = self.runner.run_profiled(&set, blocks);
        profiler.record("Rule Evaluation", start.elapsed());
        for timing in &rule_timings {
            profiler.record(&format!("  {}", timing.rule), timing.elapsed);
        }

        let report = profiler.time_step("Summarize", || summarize(verdicts));
        tracing::info!(
            rule_set = %set.name,
            blocks = blocks.len(),
            passed = report.passed_count,
            total = report.total_count,
            "review complete"
        );
        report.with_metadata(ReportMetadata::new(&set.name, blocks))
    }

    /// Load `input_path`, optionally narrow it to one page, and review it
    pub fn review_file(
        &self,
        input_path: &str,
        rule_set: &str,
        options: &ReviewOptions,
    ) -> Result<Report> {
        let mut profiler = StepProfiler::new(options.profile);
        let path = Path::new(input_path);

        let blocks = profiler.time_step("Load Blocks", || -> Result<Vec<TextBlock>> {
            let source = source_for(path, options.input_format)?;
            tracing::debug!(source = source.name(), path = input_path, "loading blocks");
            Ok(source.load_file(path)?)
        });
        let blocks = blocks.with_context(|| format!("loading {input_path}"))?;

        let blocks = match options.page {
            Some(page) => select_page(blocks, page),
            None => blocks,
        };

        let report = self.review_blocks_with_profiler(rule_set, &blocks, &mut profiler);
        profiler.print_summary();
        Ok(report)
    }
}

/// Keep only the blocks on `page`. Blocks without a page number are dropped.
pub fn select_page(blocks: Vec<TextBlock>, page: u32) -> Vec<TextBlock> {
    blocks
        .into_iter()
        .filter(|block| block.page == Some(page))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reviewer() -> DocumentReviewer {
        DocumentReviewer::new(RuleCatalog::builtin().unwrap())
    }

    #[test]
    fn test_review_blocks_attaches_metadata() {
        let blocks = vec![TextBlock::with_vertical("NSN 1234-56-789012", 0.0, 10.0)];
        let report = reviewer().review_blocks("AED", &blocks);
        assert_eq!(report.total_count, 8);
        let metadata = report.metadata.unwrap();
        assert_eq!(metadata.rule_set, "AED");
        assert_eq!(metadata.block_count, 1);
    }

    #[test]
    fn test_unknown_rule_set_gives_empty_report() {
        let report = reviewer().review_blocks("XYZ", &[TextBlock::new("anything")]);
        assert_eq!(report.total_count, 0);
        assert_eq!(report.passed_count, 0);
        assert!(report.failed.is_empty());
    }

    #[test]
    fn test_select_page() {
        let blocks = vec![
            TextBlock::new("first").on_page(1),
            TextBlock::new("second").on_page(2),
            TextBlock::new("unpaged"),
        ];
        let page_two = select_page(blocks, 2);
        assert_eq!(page_two, vec![TextBlock::new("second").on_page(2)]);
    }

    #[test]
    fn test_profiler_records_only_when_enabled() {
        let mut off = StepProfiler::new(false);
        off.time_step("noop", || ());
        assert!(off.timings().is_empty());

        let mut on = StepProfiler::new(true);
        let blocks = vec![TextBlock::new("REV A")];
        reviewer().review_blocks_with_profiler("AED", &blocks, &mut on);
        // evaluation + one line per rule + summarize
        assert_eq!(on.timings().len(), 10);
    }

    #[test]
    fn test_review_file_missing_input() {
        let result = reviewer().review_file(
            "/nonexistent/blocks.json",
            "AED",
            &ReviewOptions::default(),
        );
        assert!(result.is_err());
    }
}
