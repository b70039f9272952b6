use super::{FailedCheck, Report};
use crate::verdict::{Details, Outcome, RuleVerdict};

/// Explain why a verdict failed.
///
/// Missing required fields win over everything else, then rule errors, then
/// a generic message.
pub fn problem_description(verdict: &RuleVerdict) -> String {
    match &verdict.outcome {
        Outcome::Evaluated {
            details: Some(Details::MissingFields(fields)),
            ..
        } => format!("Missing fields: {}", fields.join(", ")),
        Outcome::Errored { error } => format!("Error: {error}"),
        Outcome::Evaluated { .. } => "Check failed".to_string(),
    }
}

pub fn summarize(verdicts: Vec<RuleVerdict>) -> Report {
    let passed_count = verdicts.iter().filter(|v| v.passed()).count();
    let failed = verdicts
        .iter()
        .filter(|v| !v.passed())
        .map(|v| FailedCheck {
            rule: v.rule.clone(),
            problem: problem_description(v),
        })
        .collect();

    Report {
        metadata: None,
        passed_count,
        total_count: verdicts.len(),
        results: verdicts,
        failed,
    }
}
