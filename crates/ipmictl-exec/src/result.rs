//! Command description and result types

use std::fmt;
use std::time::Duration;

/// A program invocation: argv plus environment scoped to the child
#[derive(Clone, PartialEq, Eq)]
pub struct CommandSpec {
    /// Program to execute, looked up on `PATH`
    pub program: String,
    /// Arguments, not including the program name
    pub args: Vec<String>,
    /// Extra environment variables set on the child only
    pub env: Vec<(String, String)>,
}

impl CommandSpec {
    /// Create a new command with no arguments
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            args: Vec::new(),
            env: Vec::new(),
        }
    }

    /// Append one argument
    #[must_use]
    pub fn arg(mut self, arg: impl Into<String>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments
    #[must_use]
    pub fn args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Set an environment variable on the child
    #[must_use]
    pub fn env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    /// Look up an environment variable set on this command
    pub fn env_value(&self, key: &str) -> Option<&str> {
        self.env
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}

// Only the variable names are shown; values may hold secrets.
impl fmt::Debug for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CommandSpec")
            .field("program", &self.program)
            .field("args", &self.args)
            .field(
                "env",
                &self.env.iter().map(|(k, _)| k.as_str()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program)?;
        for arg in &self.args {
            write!(f, " {arg}")?;
        }
        Ok(())
    }
}

/// How the child's standard streams are wired
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IoMode {
    /// Collect stdout and stderr
    Captured,
    /// Inherit stdout/stderr, close stdin, optionally print `"<label>: "` first
    Passthrough {
        /// Prefix written to stdout before the child starts
        label: Option<String>,
    },
    /// Inherit all three streams so the child can drive the terminal
    Interactive,
    /// Discard stdout and stderr; only the exit status matters
    Silent,
}

impl IoMode {
    /// Passthrough with a host label
    pub fn labelled(label: impl Into<String>) -> Self {
        IoMode::Passthrough {
            label: Some(label.into()),
        }
    }

    /// Passthrough without a label
    #[must_use]
    pub fn passthrough() -> Self {
        IoMode::Passthrough { label: None }
    }
}

/// Result of a command execution
#[derive(Debug, Clone)]
pub struct CommandResult {
    /// Exit status code (0 for success, -1 when killed by a signal)
    pub status: i32,
    /// stdout output (empty unless captured)
    pub stdout: String,
    /// stderr output (empty unless captured)
    pub stderr: String,
    /// Time taken to execute
    pub duration: Duration,
}

impl CommandResult {
    /// Result carrying only an exit status
    #[must_use]
    pub fn from_status(status: i32, duration: Duration) -> Self {
        Self {
            status,
            stdout: String::new(),
            stderr: String::new(),
            duration,
        }
    }

    /// Check if command succeeded (exit code 0)
    #[must_use]
    pub fn success(&self) -> bool {
        self.status == 0
    }

    /// stdout split into lines
    pub fn lines(&self) -> Vec<&str> {
        self.stdout.lines().collect()
    }
}
