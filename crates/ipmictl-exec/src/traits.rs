//! Command runner trait

use async_trait::async_trait;

use crate::error::ExecError;
use crate::result::{CommandResult, CommandSpec, IoMode};

/// Runs external programs to completion
///
/// A non-zero exit status is returned as a normal `CommandResult`; only a
/// failure to start or wait on the child is an `ExecError`.
#[async_trait]
pub trait CommandRunner: Send + Sync {
    async fn run(&self, spec: &CommandSpec, mode: IoMode) -> Result<CommandResult, ExecError>;

    fn runner_type(&self) -> &'static str;
}
