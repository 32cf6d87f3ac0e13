use kmval_core::ValidationKind;
use serde::{Deserialize, Serialize};

use crate::model::{CheckResult, PlanOutcome, SuiteMode, SuiteOutcome};

/// Failed check as written to the run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FailureEntry {
    pub kind: String,
    pub query: String,
    pub validation: ValidationKind,
    pub expected: String,
    pub actual: String,
    pub message: String,
}

impl From<&CheckResult> for FailureEntry {
    fn from(check: &CheckResult) -> Self {
        Self {
            kind: check.kind.clone(),
            query: check.query.clone(),
            validation: check.validation,
            expected: check.expected.clone(),
            actual: check.actual.clone(),
            message: check.message(),
        }
    }
}

/// Per-plan section of the run report.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanReport {
    pub id: String,
    pub artifact: String,
    pub overlay: String,
    pub passed: bool,
    pub checks: usize,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub halted: bool,
    pub failures: Vec<FailureEntry>,
}

impl From<&PlanOutcome> for PlanReport {
    fn from(outcome: &PlanOutcome) -> Self {
        Self {
            id: outcome.id.to_string(),
            artifact: outcome.id.artifact.clone(),
            overlay: outcome.id.overlay.clone(),
            passed: outcome.passed(),
            checks: outcome.checks.len(),
            halted: outcome.halted,
            failures: outcome.failures.iter().map(FailureEntry::from).collect(),
        }
    }
}

/// Deterministic summary of a suite run, independent of run metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteSummary {
    pub mode: SuiteMode,
    pub success: bool,
    pub stopped_early: bool,
    pub passed: Vec<String>,
    pub failed: Vec<String>,
    pub plans: Vec<PlanReport>,
}

impl SuiteSummary {
    pub fn new(outcome: &SuiteOutcome, mode: SuiteMode) -> Self {
        Self {
            mode,
            success: outcome.success(),
            stopped_early: outcome.stopped_early,
            passed: outcome.passed().iter().map(ToString::to_string).collect(),
            failed: outcome.failed().iter().map(ToString::to_string).collect(),
            plans: outcome.plans.iter().map(PlanReport::from).collect(),
        }
    }
}

/// Console lines for one plan: its id, then one line per sorted failure.
pub fn plan_lines(outcome: &PlanOutcome) -> Vec<String> {
    let mut lines = vec![outcome.id.to_string()];
    lines.extend(
        outcome
            .failures
            .iter()
            .map(|failure| format!("FAIL: {}", failure.message())),
    );
    lines
}
