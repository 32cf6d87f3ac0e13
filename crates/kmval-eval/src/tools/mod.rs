//! Seams to the external renderer and path-query tools.

mod kustomize;
mod process;
mod yq;

pub use kustomize::KustomizeRenderer;
pub use process::is_available;
pub use yq::{QueryDialect, YqEvaluator};

use async_trait::async_trait;

use crate::errors::ToolError;

/// Literal output of the query tool when a path resolves to nothing.
pub const NULL_OUTPUT: &str = "null";

/// Renders one artifact variant into a stream of YAML documents.
#[async_trait]
pub trait Renderer: Send + Sync {
    async fn render(&self, artifact: &str, overlay: &str) -> Result<Vec<u8>, ToolError>;
}

/// Evaluates a path query against one document of a rendered stream.
#[async_trait]
pub trait QueryEvaluator: Send + Sync {
    /// Returns the query output, or [`NULL_OUTPUT`] when nothing matches.
    async fn query(
        &self,
        documents: &[u8],
        document_index: usize,
        query: &str,
    ) -> Result<String, ToolError>;
}
