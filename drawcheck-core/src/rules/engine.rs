use super::catalog::RuleSet;
use super::DrawingRule;
use crate::error::RuleError;
use crate::types::TextBlock;
use crate::verdict::RuleVerdict;
use std::panic::{self, AssertUnwindSafe};
use std::time::{Duration, Instant};

/// Wall-clock time spent in one rule
#[derive(Debug, Clone)]
pub struct RuleTiming {
    pub rule: String,
    pub elapsed: Duration,
}

/// Evaluates a rule set against one document.
///
/// Every rule runs exactly once, in declared order, and always yields a
/// verdict. A rule that returns an error or panics gets an errored verdict
/// and the remaining rules still run.
#[derive(Debug, Default, Clone, Copy)]
pub struct RuleRunner;

impl RuleRunner {
    pub fn new() -> Self {
        Self
    }

    pub fn run(&self, rule_set: &RuleSet, blocks: &[TextBlock]) -> Vec<RuleVerdict> {
        rule_set
            .rules
            .iter()
            .map(|rule| self.run_rule(rule.as_ref(), blocks))
            .collect()
    }

    /// Same as [`RuleRunner::run`], also returning per-rule timings
    pub fn run_profiled(
        &self,
        rule_set: &RuleSet,
        blocks: &[TextBlock],
    ) -> (Vec<RuleVerdict>, Vec<RuleTiming>) {
        let mut verdicts = Vec::with_capacity(rule_set.len());
        let mut timings = Vec::with_capacity(rule_set.len());

        for rule in &rule_set.rules {
            let start = Instant::now();
            verdicts.push(self.run_rule(rule.as_ref(), blocks));
            timings.push(RuleTiming {
                rule: rule.name().to_string(),
                elapsed: start.elapsed(),
            });
        }

        (verdicts, timings)
    }

    pub fn run_rule(&self, rule: &dyn DrawingRule, blocks: &[TextBlock]) -> RuleVerdict {
        let result = panic::catch_unwind(AssertUnwindSafe(|| rule.check(blocks)))
            .unwrap_or_else(|payload| Err(RuleError::Internal(panic_message(payload.as_ref()))));

        match result {
            Ok(check) => {
                tracing::debug!(rule = rule.id(), passed = check.passed, "rule evaluated");
                RuleVerdict::evaluated(rule.id(), rule.name(), check.passed, check.details)
            }
            Err(e) => {
                tracing::warn!(rule = rule.id(), error = %e, "rule errored");
                RuleVerdict::errored(rule.id(), rule.name(), e.to_string())
            }
        }
    }
}

fn panic_message(payload: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&str>() {
        format!("rule panicked: {msg}")
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        format!("rule panicked: {msg}")
    } else {
        "rule panicked".to_string()
    }
}
