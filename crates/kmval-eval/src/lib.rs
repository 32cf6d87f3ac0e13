//! Plan execution for kmval.
//!
//! Indexes rendered documents by object kind, runs each planned query
//! through the external query tool and aggregates outcomes across a suite.

pub mod check;
pub mod engine;
pub mod errors;
pub mod index;
pub mod model;
pub mod report;
pub mod suite;
pub mod tools;

pub use check::{check, evaluate};
pub use engine::ExecutionEngine;
pub use errors::{EvalError, ToolError};
pub use index::{document_kinds, index_documents};
pub use model::{
    CheckResult, ExecuteOptions, PlanOutcome, SuiteMode, SuiteOutcome, UnindexedKind,
};
pub use report::{FailureEntry, PlanReport, SuiteSummary, plan_lines};
pub use suite::SuiteRunner;
pub use tools::{
    KustomizeRenderer, NULL_OUTPUT, QueryDialect, QueryEvaluator, Renderer, YqEvaluator,
};
