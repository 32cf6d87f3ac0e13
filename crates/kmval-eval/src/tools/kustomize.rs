use std::io;
use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use tokio::process::Command;

use super::Renderer;
use super::process::{is_available, run_tool};
use crate::errors::ToolError;

/// Renders `<root>/<artifact>/<overlay>` with `kustomize build`.
#[derive(Debug, Clone)]
pub struct KustomizeRenderer {
    binary: String,
    root: PathBuf,
    timeout: Option<Duration>,
}

impl KustomizeRenderer {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            binary: "kustomize".to_string(),
            root: root.into(),
            timeout: None,
        }
    }

    pub fn with_binary(mut self, binary: impl Into<String>) -> Self {
        self.binary = binary.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn binary(&self) -> &str {
        &self.binary
    }

    pub async fn is_available(&self) -> bool {
        is_available(&self.binary, &["version"]).await
    }
}

#[async_trait]
impl Renderer for KustomizeRenderer {
    async fn render(&self, artifact: &str, overlay: &str) -> Result<Vec<u8>, ToolError> {
        let dir = self.root.join(artifact).join(overlay);
        if !dir.is_dir() {
            return Err(ToolError::Launch {
                tool: self.binary.clone(),
                source: io::Error::new(
                    io::ErrorKind::NotFound,
                    format!("directory {} does not exist", dir.display()),
                ),
            });
        }

        tracing::debug!(event = "render_started", tool = %self.binary, dir = %dir.display());

        let mut command = Command::new(&self.binary);
        command.arg("build").current_dir(&dir);
        run_tool(command, &self.binary, None, self.timeout).await
    }
}
