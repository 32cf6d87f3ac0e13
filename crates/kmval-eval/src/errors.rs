use std::time::Duration;

use thiserror::Error;

/// Failures invoking an external tool.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("failed to launch `{tool}`: {source}")]
    Launch {
        tool: String,
        #[source]
        source: std::io::Error,
    },
    #[error("`{tool}` exited with {status}: {stderr}")]
    Exit {
        tool: String,
        status: String,
        stderr: String,
    },
    #[error("`{tool}` did not finish within {timeout:?}")]
    Timeout { tool: String, timeout: Duration },
    #[error("io error talking to `{tool}`: {source}")]
    Io {
        tool: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors that abort plan execution.
///
/// Expectation mismatches are never errors; they are recorded as failed
/// checks on the plan outcome.
#[derive(Debug, Error)]
pub enum EvalError {
    #[error("render failed for {plan}: {source}")]
    Render {
        plan: String,
        #[source]
        source: ToolError,
    },
    #[error("query `{query}` on {kind} failed for {plan}: {source}")]
    Query {
        plan: String,
        kind: String,
        query: String,
        #[source]
        source: ToolError,
    },
}
