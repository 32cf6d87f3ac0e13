use kmval_core::ValidationKind;
use kmval_plan::PlanId;
use serde::{Deserialize, Serialize};

/// What to do with a query whose object kind has no rendered document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnindexedKind {
    /// Query the first document of the stream.
    #[default]
    FirstDocument,
    /// Record a failed check without querying.
    Fail,
}

/// Options for plan execution.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecuteOptions {
    pub unindexed_kind: UnindexedKind,
    /// Stop a plan at its first failed check.
    pub stop_on_first_failure: bool,
}

/// How the suite reacts to a failing plan.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SuiteMode {
    /// Run every plan.
    #[default]
    FullRun,
    /// Stop at the first failing plan.
    FailFast,
}

/// Outcome of a single query against its expectation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResult {
    pub kind: String,
    pub query: String,
    pub validation: ValidationKind,
    pub expected: String,
    pub actual: String,
    pub passed: bool,
}

impl CheckResult {
    /// Human-readable line used for reporting and ordering failures.
    pub fn message(&self) -> String {
        format!(
            "{} {}: expected {}, got {}",
            self.kind, self.query, self.expected, self.actual
        )
    }
}

/// Result of executing one test plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOutcome {
    pub id: PlanId,
    /// Every evaluated check, in evaluation order.
    pub checks: Vec<CheckResult>,
    /// Failed checks sorted by message.
    pub failures: Vec<CheckResult>,
    /// Execution stopped at the first failure.
    pub halted: bool,
}

impl PlanOutcome {
    pub fn new(id: PlanId, checks: Vec<CheckResult>, halted: bool) -> Self {
        let mut failures: Vec<CheckResult> =
            checks.iter().filter(|check| !check.passed).cloned().collect();
        failures.sort_by_cached_key(CheckResult::message);
        Self {
            id,
            checks,
            failures,
            halted,
        }
    }

    pub fn passed(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Aggregated result of a suite run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuiteOutcome {
    /// Plan outcomes in execution order.
    pub plans: Vec<PlanOutcome>,
    /// The suite stopped before running every plan.
    pub stopped_early: bool,
}

impl SuiteOutcome {
    pub fn success(&self) -> bool {
        self.plans.iter().all(PlanOutcome::passed)
    }

    /// Identifiers of passing plans, sorted.
    pub fn passed(&self) -> Vec<PlanId> {
        self.sorted_ids(true)
    }

    /// Identifiers of failing plans, sorted.
    pub fn failed(&self) -> Vec<PlanId> {
        self.sorted_ids(false)
    }

    fn sorted_ids(&self, passed: bool) -> Vec<PlanId> {
        let mut ids: Vec<PlanId> = self
            .plans
            .iter()
            .filter(|plan| plan.passed() == passed)
            .map(|plan| plan.id.clone())
            .collect();
        ids.sort();
        ids
    }
}
