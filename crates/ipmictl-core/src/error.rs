//! Core error types for ipmictl-core

use std::path::PathBuf;

use ipmictl_exec::ExecError;
use thiserror::Error;

/// Errors that abort an ipmictl command
#[derive(Error, Debug, Clone)]
pub enum IpmiError {
    /// Configuration file could not be read or parsed, or a key is missing
    #[error("configuration error: {0}")]
    ConfigError(String),

    /// Secrets file could not be read
    #[error("cannot read credentials file {path}: {reason}")]
    CredentialsUnreadable {
        /// Secrets file path
        path: PathBuf,
        /// Underlying I/O error
        reason: String,
    },

    /// Secrets file lacks a required key
    #[error("credentials file {path} has no value for {key}")]
    CredentialMissing {
        /// Secrets file path
        path: PathBuf,
        /// Missing key
        key: String,
    },

    /// Host-set expression does not parse
    #[error("invalid hostlist {expr:?}: {reason}")]
    InvalidHostlist {
        /// Offending expression
        expr: String,
        /// What is wrong with it
        reason: String,
    },

    /// Command needs exactly one host
    #[error("Only one host allowed for this command (got {0})")]
    SingleHostRequired(usize),

    /// External binary could not be executed
    #[error("Binary not found, check your path and/or retry as root. You were trying to run:\n {command}")]
    BinaryNotFound {
        /// Command line that was attempted
        command: String,
    },

    /// FRU query returned too little output
    #[error("The host {0} can't be reached")]
    Unreachable(String),

    /// FRU output does not have the expected layout
    #[error("unexpected FRU output from {host}: {reason}")]
    MalformedFru {
        /// Management hostname queried
        host: String,
        /// What is wrong with the output
        reason: String,
    },

    /// Console daemon probe returned an unknown status
    #[error("{command} (exit status {status})")]
    ConsoleProbeFailed {
        /// Probe command line
        command: String,
        /// Exit status returned
        status: i32,
    },

    /// Verb is deliberately disabled
    #[error("{0}")]
    NotImplemented(&'static str),

    /// Any other execution failure
    #[error("execution error: {0}")]
    Exec(#[from] ExecError),
}

impl IpmiError {
    /// Map an execution error for `command`, singling out a missing binary
    pub fn from_exec(err: ExecError, command: impl std::fmt::Display) -> Self {
        if err.is_missing_binary() {
            IpmiError::BinaryNotFound {
                command: command.to_string(),
            }
        } else {
            IpmiError::Exec(err)
        }
    }
}

/// Result type for core operations
pub type Result<T> = std::result::Result<T, IpmiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_exec_missing_binary() {
        let err = IpmiError::from_exec(
            ExecError::NotFound {
                program: "service".to_string(),
            },
            "service conman status",
        );

        assert!(matches!(err, IpmiError::BinaryNotFound { .. }));
        assert!(err.to_string().contains("service conman status"));
        assert!(err.to_string().contains("retry as root"));
    }

    #[test]
    fn test_from_exec_other() {
        let err = IpmiError::from_exec(ExecError::IoError("broken pipe".to_string()), "fping");
        assert!(matches!(err, IpmiError::Exec(_)));
    }
}
