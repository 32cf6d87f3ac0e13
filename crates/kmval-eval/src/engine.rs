use std::time::Instant;

use kmval_plan::TestPlan;

use crate::check::check;
use crate::errors::EvalError;
use crate::model::{CheckResult, ExecuteOptions, PlanOutcome, UnindexedKind};
use crate::tools::QueryEvaluator;

/// Runs the queries of indexed test plans.
#[derive(Debug, Clone)]
pub struct ExecutionEngine<Q> {
    evaluator: Q,
    options: ExecuteOptions,
}

impl<Q: QueryEvaluator> ExecutionEngine<Q> {
    pub fn new(evaluator: Q, options: ExecuteOptions) -> Self {
        Self { evaluator, options }
    }

    pub fn options_mut(&mut self) -> &mut ExecuteOptions {
        &mut self.options
    }

    /// Execute every query of the plan, kind by kind, in plan order.
    ///
    /// Mismatches are recorded on the outcome. A query tool failure aborts
    /// the plan and is returned as an error.
    pub async fn execute(&self, plan: TestPlan) -> Result<PlanOutcome, EvalError> {
        let timer = Instant::now();
        let mut checks = Vec::with_capacity(plan.check_count());
        let mut halted = false;

        'kinds: for kind in &plan.object_kinds {
            for query in plan.queries(kind) {
                let Some(expectation) = plan.expectation(query) else {
                    continue;
                };

                let result = match (plan.document_index(kind), self.options.unindexed_kind) {
                    (Some(index), _) => self.run_query(&plan, kind, query, index).await?,
                    (None, UnindexedKind::FirstDocument) => {
                        tracing::debug!(
                            event = "kind_not_rendered",
                            plan = %plan.id,
                            kind = %kind
                        );
                        self.run_query(&plan, kind, query, 0).await?
                    }
                    (None, UnindexedKind::Fail) => unrendered(kind, query, expectation),
                };

                let result = match result {
                    QueryResult::Output(output) => check(kind, query, expectation, &output),
                    QueryResult::Checked(result) => result,
                };

                let failed = !result.passed;
                checks.push(result);

                if failed && self.options.stop_on_first_failure {
                    halted = true;
                    break 'kinds;
                }
            }
        }

        let outcome = PlanOutcome::new(plan.id, checks, halted);
        tracing::info!(
            event = "plan_executed",
            plan = %outcome.id,
            checks = outcome.checks.len(),
            failures = outcome.failures.len(),
            halted = outcome.halted,
            duration_ms = timer.elapsed().as_millis() as u64
        );
        Ok(outcome)
    }

    async fn run_query(
        &self,
        plan: &TestPlan,
        kind: &str,
        query: &str,
        document_index: usize,
    ) -> Result<QueryResult, EvalError> {
        self.evaluator
            .query(&plan.rendered_documents, document_index, query)
            .await
            .map(QueryResult::Output)
            .map_err(|source| EvalError::Query {
                plan: plan.id.to_string(),
                kind: kind.to_string(),
                query: query.to_string(),
                source,
            })
    }
}

enum QueryResult {
    Output(String),
    Checked(CheckResult),
}

fn unrendered(kind: &str, query: &str, expectation: &kmval_core::Expectation) -> QueryResult {
    let mut result = check(kind, query, expectation, "");
    result.actual = format!("no {kind} document rendered");
    result.passed = false;
    QueryResult::Checked(result)
}
