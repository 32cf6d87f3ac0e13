use std::process::Stdio;
use std::time::Duration;

use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::errors::ToolError;

/// Run a prepared command to completion and return its stdout.
///
/// `input` is streamed to stdin while the output is collected. With a
/// timeout the child is killed once the limit passes.
pub(crate) async fn run_tool(
    mut command: Command,
    tool: &str,
    input: Option<&[u8]>,
    timeout: Option<Duration>,
) -> Result<Vec<u8>, ToolError> {
    command
        .stdin(if input.is_some() {
            Stdio::piped()
        } else {
            Stdio::null()
        })
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = command.spawn().map_err(|source| ToolError::Launch {
        tool: tool.to_string(),
        source,
    })?;
    let stdin = child.stdin.take();

    let run = async move {
        let write = async move {
            if let (Some(mut pipe), Some(data)) = (stdin, input) {
                pipe.write_all(data).await?;
            }
            Ok::<(), std::io::Error>(())
        };
        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output.map_err(|source| ToolError::Io {
            tool: tool.to_string(),
            source,
        })?;

        if !output.status.success() {
            return Err(ToolError::Exit {
                tool: tool.to_string(),
                status: output.status.to_string(),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }

        // A tool may exit without draining stdin.
        match written {
            Err(source) if source.kind() != std::io::ErrorKind::BrokenPipe => {
                Err(ToolError::Io {
                    tool: tool.to_string(),
                    source,
                })
            }
            _ => Ok(output.stdout),
        }
    };

    match timeout {
        Some(limit) => tokio::time::timeout(limit, run)
            .await
            .map_err(|_| ToolError::Timeout {
                tool: tool.to_string(),
                timeout: limit,
            })?,
        None => run.await,
    }
}

/// Whether `binary` can be launched and exits successfully with `args`.
pub async fn is_available(binary: &str, args: &[&str]) -> bool {
    Command::new(binary)
        .args(args)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .status()
        .await
        .map(|status| status.success())
        .unwrap_or(false)
}
