//! Error types for ipmictl-exec

use std::io;

use thiserror::Error;

/// Errors that can occur while launching or waiting on a child process
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// Binary is not on the search path
    #[error("binary not found: {program}")]
    NotFound {
        /// Program that was looked up
        program: String,
    },

    /// Binary exists but may not be executed by this user
    #[error("permission denied: {program}")]
    PermissionDenied {
        /// Program that was refused
        program: String,
    },

    /// Process spawn error
    #[error("failed to spawn process: {0}")]
    SpawnError(String),

    /// I/O error while waiting on the child
    #[error("I/O error: {0}")]
    IoError(String),
}

impl ExecError {
    /// Classify an error returned by `spawn`
    pub fn from_spawn(program: &str, err: &io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::NotFound => ExecError::NotFound {
                program: program.to_string(),
            },
            io::ErrorKind::PermissionDenied => ExecError::PermissionDenied {
                program: program.to_string(),
            },
            _ => ExecError::SpawnError(format!("{program}: {err}")),
        }
    }

    /// Check if the binary could not be run at all (missing or not executable)
    #[must_use]
    pub fn is_missing_binary(&self) -> bool {
        matches!(
            self,
            ExecError::NotFound { .. } | ExecError::PermissionDenied { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_spawn_not_found() {
        let err = io::Error::from(io::ErrorKind::NotFound);
        let exec = ExecError::from_spawn("ipmitool", &err);

        assert!(matches!(exec, ExecError::NotFound { ref program } if program == "ipmitool"));
        assert!(exec.is_missing_binary());
    }

    #[test]
    fn test_from_spawn_permission_denied() {
        let err = io::Error::from(io::ErrorKind::PermissionDenied);
        let exec = ExecError::from_spawn("service", &err);

        assert!(exec.is_missing_binary());
    }

    #[test]
    fn test_from_spawn_other() {
        let err = io::Error::other("boom");
        let exec = ExecError::from_spawn("fping", &err);

        assert!(matches!(exec, ExecError::SpawnError(_)));
        assert!(!exec.is_missing_binary());
    }
}
