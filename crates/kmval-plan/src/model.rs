use std::collections::HashMap;
use std::fmt;

use kmval_core::{BASE_OVERLAY, Expectation, ValidationKind};
use serde::{Deserialize, Serialize};

/// Identity of a test plan: one artifact rendered with one overlay.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlanId {
    pub artifact: String,
    pub overlay: String,
}

impl PlanId {
    pub fn new(artifact: impl Into<String>, overlay: impl Into<String>) -> Self {
        Self {
            artifact: artifact.into(),
            overlay: overlay.into(),
        }
    }

    pub fn is_base(&self) -> bool {
        self.overlay == BASE_OVERLAY
    }
}

impl fmt::Display for PlanId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.artifact, self.overlay)
    }
}

/// Resolved queries and expectations for one (artifact, overlay) pair.
///
/// Built by the resolver, then given its rendered documents and the
/// kind -> document index map before being consumed by execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TestPlan {
    pub id: PlanId,
    /// Object kinds in first-seen order.
    pub object_kinds: Vec<String>,
    /// Queries per kind, deduplicated, in registration order.
    pub queries_by_kind: HashMap<String, Vec<String>>,
    /// Effective expectation per query; the last layer wins.
    pub expectations: HashMap<String, Expectation>,
    pub kind_to_document_index: HashMap<String, usize>,
    pub rendered_documents: Vec<u8>,
}

impl TestPlan {
    pub fn new(id: PlanId) -> Self {
        Self {
            id,
            object_kinds: Vec::new(),
            queries_by_kind: HashMap::new(),
            expectations: HashMap::new(),
            kind_to_document_index: HashMap::new(),
            rendered_documents: Vec::new(),
        }
    }

    pub fn queries(&self, kind: &str) -> &[String] {
        self.queries_by_kind
            .get(kind)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    pub fn expectation(&self, query: &str) -> Option<&Expectation> {
        self.expectations.get(query)
    }

    pub fn validation_kind(&self, query: &str) -> Option<ValidationKind> {
        self.expectations.get(query).map(Expectation::kind)
    }

    pub fn document_index(&self, kind: &str) -> Option<usize> {
        self.kind_to_document_index.get(kind).copied()
    }

    /// Total number of (kind, query) checks the plan will run.
    pub fn check_count(&self) -> usize {
        self.queries_by_kind.values().map(Vec::len).sum()
    }

    pub fn with_rendered_documents(mut self, documents: Vec<u8>) -> Self {
        self.rendered_documents = documents;
        self
    }
}
