// Central Error Type for the Harness

use crate::domain::DomainError;
use crate::port::{ConfigLoadError, DiscoveryError, ExecutionError, WorkspaceError};
use std::path::PathBuf;
use thiserror::Error;

/// Harness-level error type
#[derive(Error, Debug)]
pub enum HarnessError {
    #[error("Error executing `{command}`: {source}")]
    Launch {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Subprocess `{command}` failed ({})", describe_exit(.exit_code))]
    Subprocess {
        command: String,
        exit_code: Option<i32>,
        stdout: String,
        stderr: String,
    },

    #[error("Subprocess `{command}` timed out after {timeout_ms}ms")]
    Timeout { command: String, timeout_ms: u64 },

    #[error("Config parse error in {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Assertion failed: {0}")]
    Assertion(String),

    #[error("Discovery error: {0}")]
    Discovery(#[from] DiscoveryError),

    #[error("Workspace error: {0}")]
    Workspace(#[from] WorkspaceError),

    #[error("Domain error: {0}")]
    Domain(#[from] DomainError),

    #[error("IO error: {0}")]
    Io(String),
}

/// Result type alias using HarnessError
pub type Result<T> = std::result::Result<T, HarnessError>;

fn describe_exit(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exit code {}", code),
        None => "terminated by signal".to_string(),
    }
}

impl From<ExecutionError> for HarnessError {
    fn from(err: ExecutionError) -> Self {
        match err {
            ExecutionError::SpawnFailed { command, source } => {
                HarnessError::Launch { command, source }
            }
            ExecutionError::Timeout {
                command,
                timeout_ms,
            } => HarnessError::Timeout {
                command,
                timeout_ms,
            },
            ExecutionError::IoError(msg) => HarnessError::Io(msg),
        }
    }
}

impl From<ConfigLoadError> for HarnessError {
    fn from(err: ConfigLoadError) -> Self {
        match err {
            ConfigLoadError::Parse { path, message } => HarnessError::ConfigParse { path, message },
            read @ ConfigLoadError::Read { .. } => HarnessError::Io(read.to_string()),
        }
    }
}
