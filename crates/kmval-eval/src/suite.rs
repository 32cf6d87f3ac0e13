use std::time::Instant;

use kmval_core::Manifest;
use kmval_plan::{PlanId, resolve};

use crate::engine::ExecutionEngine;
use crate::errors::EvalError;
use crate::index::index_documents;
use crate::model::{PlanOutcome, SuiteMode, SuiteOutcome};
use crate::tools::{QueryEvaluator, Renderer};

/// Resolves, renders, indexes and executes every plan of a manifest.
pub struct SuiteRunner<R, Q> {
    renderer: R,
    engine: ExecutionEngine<Q>,
    mode: SuiteMode,
}

impl<R: Renderer, Q: QueryEvaluator> SuiteRunner<R, Q> {
    /// In fail-fast mode the engine also stops each plan at its first failure.
    pub fn new(renderer: R, mut engine: ExecutionEngine<Q>, mode: SuiteMode) -> Self {
        if mode == SuiteMode::FailFast {
            engine.options_mut().stop_on_first_failure = true;
        }
        Self {
            renderer,
            engine,
            mode,
        }
    }

    pub async fn run(&self, manifest: &Manifest) -> Result<SuiteOutcome, EvalError> {
        self.run_with(manifest, |_| {}).await
    }

    /// Run the suite, handing each plan outcome to `on_plan` as it completes.
    ///
    /// Artifacts run in name order; each runs `base` and then its overlays in
    /// name order. Render and query tool failures abort the whole suite.
    pub async fn run_with<F>(
        &self,
        manifest: &Manifest,
        mut on_plan: F,
    ) -> Result<SuiteOutcome, EvalError>
    where
        F: FnMut(&PlanOutcome),
    {
        let timer = Instant::now();
        let mut outcome = SuiteOutcome::default();

        tracing::info!(
            event = "suite_started",
            artifacts = manifest.artifacts.len(),
            plans = manifest.plan_count(),
            mode = ?self.mode
        );

        'artifacts: for artifact in manifest.artifacts.values() {
            for overlay in artifact.variants() {
                let plan = resolve(&manifest.common, artifact, overlay);
                let rendered = self.render(&plan.id).await?;
                let plan = index_documents(plan, rendered);
                let result = self.engine.execute(plan).await?;

                on_plan(&result);
                let failed = !result.passed();
                outcome.plans.push(result);

                if failed && self.mode == SuiteMode::FailFast {
                    outcome.stopped_early = true;
                    break 'artifacts;
                }
            }
        }

        tracing::info!(
            event = "suite_finished",
            success = outcome.success(),
            plans_run = outcome.plans.len(),
            stopped_early = outcome.stopped_early,
            duration_ms = timer.elapsed().as_millis() as u64
        );
        Ok(outcome)
    }

    async fn render(&self, id: &PlanId) -> Result<Vec<u8>, EvalError> {
        let rendered = self
            .renderer
            .render(&id.artifact, &id.overlay)
            .await
            .map_err(|source| EvalError::Render {
                plan: id.to_string(),
                source,
            })?;
        tracing::debug!(event = "plan_rendered", plan = %id, bytes = rendered.len());
        Ok(rendered)
    }
}
