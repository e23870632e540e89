//! Terminal/shell command execution tool.

use std::process::Stdio;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tokio::process::Command;

use super::{Tool, ToolError};

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RunCommandParams {
    pub command: String,
}

/// Run a shell command.
///
/// Commands run with the server's privileges in its working directory; there
/// is no sandboxing.
pub struct RunCommand {
    timeout: Duration,
}

impl RunCommand {
    pub fn new(timeout: Duration) -> Self {
        Self { timeout }
    }
}

#[async_trait]
impl Tool for RunCommand {
    type Params = RunCommandParams;

    fn name(&self) -> &str {
        "run_command"
    }

    fn description(&self) -> &str {
        "Executes a shell command."
    }

    fn parameters_doc(&self) -> &str {
        "`command` (string)"
    }

    async fn execute(&self, params: RunCommandParams) -> Result<String, ToolError> {
        tracing::info!("Executing command: {}", params.command);

        // Determine shell based on OS
        let (shell, shell_arg) = if cfg!(target_os = "windows") {
            ("cmd", "/C")
        } else {
            ("sh", "-c")
        };

        let output = tokio::time::timeout(
            self.timeout,
            Command::new(shell)
                .arg(shell_arg)
                .arg(&params.command)
                .stdin(Stdio::null())
                .stdout(Stdio::piped())
                .stderr(Stdio::piped())
                .kill_on_drop(true)
                .output(),
        )
        .await
        .map_err(|_| ToolError::CommandTimeout(self.timeout.as_secs()))?
        .map_err(ToolError::Command)?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        Ok(format!("STDOUT:\n{}\nSTDERR:\n{}", stdout, stderr))
    }
}

#[cfg(all(test, unix))]
mod tests {
    use super::*;

    fn run(command: &str) -> RunCommandParams {
        RunCommandParams {
            command: command.to_string(),
        }
    }

    #[tokio::test]
    async fn captures_both_streams_in_labelled_sections() {
        let tool = RunCommand::new(Duration::from_secs(10));
        let output = tool.execute(run("echo out; echo err 1>&2")).await.unwrap();
        assert_eq!(output, "STDOUT:\nout\n\nSTDERR:\nerr\n");
    }

    #[tokio::test]
    async fn exit_status_is_not_surfaced() {
        let tool = RunCommand::new(Duration::from_secs(10));
        let output = tool.execute(run("echo partial; exit 3")).await.unwrap();
        assert_eq!(output, "STDOUT:\npartial\n\nSTDERR:\n");
    }

    #[tokio::test]
    async fn slow_command_times_out() {
        let tool = RunCommand::new(Duration::from_secs(1));
        let err = tool.execute(run("sleep 5")).await.unwrap_err();
        assert!(matches!(err, ToolError::CommandTimeout(1)));
    }
}
