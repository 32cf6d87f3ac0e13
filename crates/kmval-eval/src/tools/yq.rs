use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::process::Command;

use super::QueryEvaluator;
use super::process::{is_available, run_tool};
use crate::errors::ToolError;

/// Command-line syntax of the installed `yq`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryDialect {
    /// yq v3: `yq read - -d <index> <query>`.
    #[default]
    Legacy,
    /// yq v4: `yq eval 'select(documentIndex == <index>) | <query>' -`.
    Eval,
}

impl QueryDialect {
    pub fn args(self, document_index: usize, query: &str) -> Vec<String> {
        match self {
            QueryDialect::Legacy => vec![
                "read".to_string(),
                "-".to_string(),
                "-d".to_string(),
                document_index.to_string(),
                query.to_string(),
            ],
            QueryDialect::Eval => vec![
                "eval".to_string(),
                format!("select(documentIndex == {document_index}) | {query}"),
                "-".to_string(),
            ],
        }
    }
}

/// Pipes rendered documents into `yq` for each query.
#[derive(Debug, Clone)]
pub struct YqEvaluator {
    binary: String,
    dialect: QueryDialect,
    timeout: Option<Duration>,
}

impl Default for YqEvaluator {
    fn default() -> Self {
        Self {
            binary: "yq".to_string(),
            dialect: QueryDialect::default(),
            timeout: None,
        }
    }
}

impl YqEvaluator {
    pub fn new(binary: impl Into<String>, dialect: QueryDialect) -> Self {
        Self {
            binary: binary.into(),
            dialect,
            timeout: None,
        }
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub async fn is_available(&self) -> bool {
        is_available(&self.binary, &["--version"]).await
    }
}

#[async_trait]
impl QueryEvaluator for YqEvaluator {
    async fn query(
        &self,
        documents: &[u8],
        document_index: usize,
        query: &str,
    ) -> Result<String, ToolError> {
        tracing::debug!(
            event = "query_started",
            tool = %self.binary,
            document_index = document_index,
            query = %query
        );

        let mut command = Command::new(&self.binary);
        command.args(self.dialect.args(document_index, query));
        let stdout = run_tool(command, &self.binary, Some(documents), self.timeout).await?;
        Ok(String::from_utf8_lossy(&stdout).trim().to_string())
    }
}
