use std::collections::HashSet;

use kmval_core::{Artifact, BASE_OVERLAY, Expectation, Layer};

use crate::model::{PlanId, TestPlan};

/// Accumulates layers into a [`TestPlan`], tracking registered pairs.
#[derive(Debug)]
pub struct PlanBuilder {
    plan: TestPlan,
    registered: HashSet<(String, String)>,
}

impl PlanBuilder {
    pub fn new(id: PlanId) -> Self {
        Self {
            plan: TestPlan::new(id),
            registered: HashSet::new(),
        }
    }

    /// Register one query for an object kind.
    ///
    /// The expectation always overwrites any earlier one for the same query;
    /// the ordered query list only grows for unseen (kind, query) pairs.
    pub fn register(&mut self, kind: &str, query: &str, expectation: Expectation) {
        self.plan
            .expectations
            .insert(query.to_string(), expectation);

        if !self.plan.object_kinds.iter().any(|known| known == kind) {
            self.plan.object_kinds.push(kind.to_string());
        }

        if self
            .registered
            .insert((kind.to_string(), query.to_string()))
        {
            self.plan
                .queries_by_kind
                .entry(kind.to_string())
                .or_default()
                .push(query.to_string());
        }
    }

    pub fn apply_layer(&mut self, layer: &Layer) {
        for (kind, rules) in layer {
            for (query, expectation) in rules.expectations() {
                self.register(kind, query, expectation);
            }
        }
    }

    pub fn finish(self) -> TestPlan {
        self.plan
    }
}

/// Merge shared, base and overlay rules into a test plan.
///
/// Layers apply in that order and later declarations replace earlier ones
/// query by query. An overlay the artifact does not declare resolves to
/// shared + base.
pub fn resolve(shared: &Layer, artifact: &Artifact, overlay: &str) -> TestPlan {
    let mut builder = PlanBuilder::new(PlanId::new(&artifact.name, overlay));
    builder.apply_layer(shared);
    builder.apply_layer(&artifact.base);

    if overlay != BASE_OVERLAY {
        match artifact.overlays.get(overlay) {
            Some(layer) => builder.apply_layer(layer),
            None => tracing::warn!(
                event = "unknown_overlay",
                artifact = %artifact.name,
                overlay = %overlay
            ),
        }
    }

    let plan = builder.finish();
    tracing::debug!(
        event = "plan_resolved",
        plan = %plan.id,
        kinds = plan.object_kinds.len(),
        checks = plan.check_count()
    );
    plan
}

/// Resolve every variant of an artifact: base first, then overlays by name.
pub fn plans_for(shared: &Layer, artifact: &Artifact) -> Vec<TestPlan> {
    artifact
        .variants()
        .map(|overlay| resolve(shared, artifact, overlay))
        .collect()
}
