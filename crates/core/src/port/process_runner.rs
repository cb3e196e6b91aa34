// Process Runner Port
// Abstraction for launching the driver as a child process and capturing its output

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// What to launch
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessSpec {
    pub program: String,
    pub args: Vec<String>,
    /// Child's working directory; the harness never changes its own
    pub working_dir: PathBuf,
    /// Variables added on top of the inherited environment
    pub env: HashMap<String, String>,
    /// Variables removed from the inherited environment
    pub env_remove: Vec<String>,
    /// None = wait indefinitely
    pub timeout: Option<Duration>,
}

impl ProcessSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>, working_dir: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            args,
            working_dir: working_dir.as_ref().to_path_buf(),
            env: HashMap::new(),
            env_remove: Vec::new(),
            timeout: None,
        }
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.insert(key.into(), value.into());
        self
    }

    pub fn without_env<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.env_remove.extend(keys.into_iter().map(Into::into));
        self
    }

    pub fn with_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    /// Space-joined command line, for diagnostics only
    pub fn command_line(&self) -> String {
        std::iter::once(self.program.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Result of a completed child process
#[derive(Debug, Clone)]
pub struct ProcessOutput {
    pub status: ExecutionStatus,
    pub exit_code: Option<i32>,
    pub duration_ms: i64,
    pub stdout: String,
    pub stderr: String,
}

impl ProcessOutput {
    pub fn success(&self) -> bool {
        self.status == ExecutionStatus::Success
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecutionStatus {
    /// Exit code 0
    Success,
    /// Non-zero exit code
    Failed,
    /// Terminated by a signal, no exit code
    Killed,
}

/// Execution errors
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("Spawn failed for `{command}`: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Process `{command}` timed out after {timeout_ms}ms")]
    Timeout { command: String, timeout_ms: u64 },

    #[error("IO error: {0}")]
    IoError(String),
}

/// Process runner trait
///
/// Implementations:
/// - SubprocessRunner: spawns a real child process (infra-system)
/// - MockProcessRunner: scripted outcomes for tests
#[async_trait]
pub trait ProcessRunner: Send + Sync {
    /// Launch `spec`, capture stdout and stderr fully, and wait for exit
    ///
    /// A non-zero exit is NOT an error at this level; it is reported in
    /// `ProcessOutput::status`.
    ///
    /// # Errors
    /// - ExecutionError::SpawnFailed if the executable cannot be started
    /// - ExecutionError::Timeout if `spec.timeout` elapses first
    async fn run(&self, spec: &ProcessSpec) -> Result<ProcessOutput, ExecutionError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Mock runner behavior
    #[derive(Debug, Clone)]
    pub enum MockBehavior {
        /// Exit with this code and output
        Exit {
            code: i32,
            stdout: String,
            stderr: String,
        },
        /// Killed by a signal
        Signaled,
        /// Executable not found
        SpawnFail,
        /// Exceeded the deadline
        Timeout(u64),
    }

    /// Mock Process Runner for testing
    pub struct MockProcessRunner {
        behavior: MockBehavior,
        calls: Arc<Mutex<Vec<ProcessSpec>>>,
    }

    impl MockProcessRunner {
        pub fn new(behavior: MockBehavior) -> Self {
            Self {
                behavior,
                calls: Arc::new(Mutex::new(Vec::new())),
            }
        }

        pub fn new_success() -> Self {
            Self::new(MockBehavior::Exit {
                code: 0,
                stdout: "mock output".to_string(),
                stderr: String::new(),
            })
        }

        pub fn new_exit(code: i32, stdout: &str, stderr: &str) -> Self {
            Self::new(MockBehavior::Exit {
                code,
                stdout: stdout.to_string(),
                stderr: stderr.to_string(),
            })
        }

        pub fn calls(&self) -> Vec<ProcessSpec> {
            self.calls.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl ProcessRunner for MockProcessRunner {
        async fn run(&self, spec: &ProcessSpec) -> Result<ProcessOutput, ExecutionError> {
            self.calls.lock().unwrap().push(spec.clone());

            match &self.behavior {
                MockBehavior::Exit {
                    code,
                    stdout,
                    stderr,
                } => Ok(ProcessOutput {
                    status: if *code == 0 {
                        ExecutionStatus::Success
                    } else {
                        ExecutionStatus::Failed
                    },
                    exit_code: Some(*code),
                    duration_ms: 10,
                    stdout: stdout.clone(),
                    stderr: stderr.clone(),
                }),
                MockBehavior::Signaled => Ok(ProcessOutput {
                    status: ExecutionStatus::Killed,
                    exit_code: None,
                    duration_ms: 10,
                    stdout: String::new(),
                    stderr: String::new(),
                }),
                MockBehavior::SpawnFail => Err(ExecutionError::SpawnFailed {
                    command: spec.command_line(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "mock: not found"),
                }),
                MockBehavior::Timeout(ms) => Err(ExecutionError::Timeout {
                    command: spec.command_line(),
                    timeout_ms: *ms,
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_spec_builder() {
        let spec = ProcessSpec::new("python3", vec!["temp.py".into(), "+devices=2".into()], "/tmp/ws")
            .with_env("HYDRA_FULL_ERROR", "1")
            .without_env(["LOCAL_RANK", "WORLD_SIZE"])
            .with_timeout(Some(Duration::from_secs(30)));

        assert_eq!(spec.command_line(), "python3 temp.py +devices=2");
        assert_eq!(spec.env.get("HYDRA_FULL_ERROR").map(String::as_str), Some("1"));
        assert_eq!(spec.env_remove, vec!["LOCAL_RANK", "WORLD_SIZE"]);
        assert_eq!(spec.working_dir, PathBuf::from("/tmp/ws"));
        assert_eq!(spec.timeout, Some(Duration::from_secs(30)));
    }
}
