//! Local command execution using `tokio::process`

use std::io::Write;
use std::process::Stdio;
use std::time::Instant;

use async_trait::async_trait;
use tokio::process::Command;
use tracing::{debug, instrument, warn};

use crate::error::ExecError;
use crate::result::{CommandResult, CommandSpec, IoMode};
use crate::traits::CommandRunner;

/// Local command executor
///
/// Spawns the program directly (no shell) and waits for it to exit.
#[derive(Debug, Clone)]
pub struct LocalRunner;

impl LocalRunner {
    /// Create a new local runner
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    fn command(spec: &CommandSpec) -> Command {
        let mut cmd = Command::new(&spec.program);
        cmd.args(&spec.args);
        for (key, value) in &spec.env {
            cmd.env(key, value);
        }
        cmd
    }

    fn write_label(label: &str) -> Result<(), ExecError> {
        let mut stdout = std::io::stdout().lock();
        write!(stdout, "{label}: ").map_err(|e| ExecError::IoError(e.to_string()))?;
        stdout
            .flush()
            .map_err(|e| ExecError::IoError(e.to_string()))
    }

    async fn captured(&self, spec: &CommandSpec) -> Result<CommandResult, ExecError> {
        let start = Instant::now();

        let output = Self::command(spec)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .output()
            .await
            .map_err(|e| ExecError::from_spawn(&spec.program, &e))?;

        Ok(CommandResult {
            status: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).to_string(),
            stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            duration: start.elapsed(),
        })
    }

    async fn status_only(
        &self,
        spec: &CommandSpec,
        stdin: Stdio,
        stdout: Stdio,
        stderr: Stdio,
    ) -> Result<CommandResult, ExecError> {
        let start = Instant::now();

        let mut child = Self::command(spec)
            .stdin(stdin)
            .stdout(stdout)
            .stderr(stderr)
            .spawn()
            .map_err(|e| ExecError::from_spawn(&spec.program, &e))?;

        let status = child
            .wait()
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;

        Ok(CommandResult::from_status(
            status.code().unwrap_or(-1),
            start.elapsed(),
        ))
    }
}

impl Default for LocalRunner {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandRunner for LocalRunner {
    #[instrument(skip(self, spec), fields(program = %spec.program), level = "debug")]
    async fn run(&self, spec: &CommandSpec, mode: IoMode) -> Result<CommandResult, ExecError> {
        debug!(command = %spec, mode = ?mode, "executing local command");

        let result = match mode {
            IoMode::Captured => self.captured(spec).await?,
            IoMode::Passthrough { label } => {
                if let Some(label) = label {
                    Self::write_label(&label)?;
                }
                self.status_only(spec, Stdio::null(), Stdio::inherit(), Stdio::inherit())
                    .await?
            }
            IoMode::Interactive => {
                self.status_only(spec, Stdio::inherit(), Stdio::inherit(), Stdio::inherit())
                    .await?
            }
            IoMode::Silent => {
                self.status_only(spec, Stdio::null(), Stdio::null(), Stdio::null())
                    .await?
            }
        };

        debug!(
            command = %spec,
            status = result.status,
            duration = ?result.duration,
            "command completed"
        );

        if !result.success() {
            warn!(command = %spec, status = result.status, "command exited non-zero");
        }

        Ok(result)
    }

    fn runner_type(&self) -> &'static str {
        "local"
    }
}
