// Subprocess runner implementation
// reason: tokio::process for async wait and concurrent pipe draining
use async_trait::async_trait;
use std::process::{ExitStatus, Stdio};
use std::sync::Arc;
use std::time::Duration;
use tokio::io::AsyncReadExt;
use tokio::process::{Child, Command};
use tokio::time::timeout;
use tracing::{debug, info, warn};

use launchcheck_core::application::constants::GRACEFUL_SHUTDOWN_TIMEOUT;
use launchcheck_core::port::{
    ExecutionError, ExecutionStatus, ProcessOutput, ProcessRunner, ProcessSpec, TimeProvider,
};

/// Subprocess runner
/// Spawns the child with piped stdout/stderr and drains both while waiting
pub struct SubprocessRunner {
    time_provider: Arc<dyn TimeProvider>,
    env_allowlist: Option<Vec<String>>,
}

impl SubprocessRunner {
    /// Create a runner that passes the full parent environment through
    ///
    /// # Example
    /// ```ignore
    /// let runner = SubprocessRunner::new(Arc::new(SystemTimeProvider));
    /// ```
    pub fn new(time_provider: Arc<dyn TimeProvider>) -> Self {
        Self {
            time_provider,
            env_allowlist: None,
        }
    }

    /// Only inherit the listed parent variables; `ProcessSpec::env` still applies
    pub fn with_env_allowlist(mut self, allowlist: Vec<String>) -> Self {
        self.env_allowlist = Some(allowlist);
        self
    }

    fn build_command(&self, spec: &ProcessSpec) -> Command {
        let mut command = Command::new(&spec.program);
        command
            .args(&spec.args)
            .current_dir(&spec.working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        // Own process group, so a timeout reaches the ranks the driver spawns
        #[cfg(unix)]
        command.process_group(0);

        if let Some(allowlist) = &self.env_allowlist {
            command.env_clear();
            command.envs(std::env::vars().filter(|(k, _)| allowlist.contains(k)));
        }
        for key in &spec.env_remove {
            command.env_remove(key);
        }
        command.envs(&spec.env);
        command
    }

    /// Spawn child process, drain its pipes and wait for exit
    async fn spawn_and_wait(
        &self,
        spec: &ProcessSpec,
    ) -> Result<(ExitStatus, Vec<u8>, Vec<u8>), ExecutionError> {
        let mut child =
            self.build_command(spec)
                .spawn()
                .map_err(|source| ExecutionError::SpawnFailed {
                    command: spec.command_line(),
                    source,
                })?;

        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| ExecutionError::IoError("stdout was not captured".to_string()))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| ExecutionError::IoError("stderr was not captured".to_string()))?;

        let read_stdout = async {
            let mut buf = Vec::new();
            stdout
                .read_to_end(&mut buf)
                .await
                .map_err(|e| ExecutionError::IoError(e.to_string()))?;
            Ok::<_, ExecutionError>(buf)
        };
        let read_stderr = async {
            let mut buf = Vec::new();
            stderr
                .read_to_end(&mut buf)
                .await
                .map_err(|e| ExecutionError::IoError(e.to_string()))?;
            Ok::<_, ExecutionError>(buf)
        };
        let wait = self.wait_with_deadline(&mut child, spec);

        let (status, out, err) = tokio::try_join!(wait, read_stdout, read_stderr)?;
        Ok((status, out, err))
    }

    async fn wait_with_deadline(
        &self,
        child: &mut Child,
        spec: &ProcessSpec,
    ) -> Result<ExitStatus, ExecutionError> {
        let Some(limit) = spec.timeout else {
            return child
                .wait()
                .await
                .map_err(|e| ExecutionError::IoError(e.to_string()));
        };

        match timeout(limit, child.wait()).await {
            Ok(status) => status.map_err(|e| ExecutionError::IoError(e.to_string())),
            Err(_) => {
                let timeout_ms = u64::try_from(limit.as_millis()).unwrap_or(u64::MAX);
                warn!(
                    command = %spec.command_line(),
                    timeout_ms,
                    "Subprocess exceeded its deadline, terminating"
                );
                self.terminate(child).await;
                Err(ExecutionError::Timeout {
                    command: spec.command_line(),
                    timeout_ms,
                })
            }
        }
    }

    /// SIGTERM to the child's process group, then SIGKILL to whatever is left
    ///
    /// The group gets SIGKILL even when the leader exits on SIGTERM; no
    /// spawned rank may outlive the run.
    async fn terminate(&self, child: &mut Child) {
        #[cfg(unix)]
        {
            use nix::sys::signal::{killpg, Signal};
            use nix::unistd::Pid;

            if let Some(pid) = child.id() {
                let group = Pid::from_raw(pid as i32);
                info!(pgid = %pid, "Sending SIGTERM to process group");
                if killpg(group, Signal::SIGTERM).is_ok()
                    && timeout(GRACEFUL_SHUTDOWN_TIMEOUT, child.wait()).await.is_ok()
                {
                    info!(pgid = %pid, "Process exited gracefully after SIGTERM");
                    // ESRCH here just means the group is already empty
                    let _ = killpg(group, Signal::SIGKILL);
                    return;
                }
                warn!(pgid = %pid, "Process did not exit after SIGTERM, sending SIGKILL");
                if let Err(e) = killpg(group, Signal::SIGKILL) {
                    debug!(pgid = %pid, error = %e, "SIGKILL to process group failed");
                }
            }
        }

        if let Err(e) = child.kill().await {
            warn!(error = %e, "Failed to kill subprocess");
        }
    }

    /// Build process output from exit status and captured pipes
    fn build_output(
        &self,
        status: ExitStatus,
        stdout: Vec<u8>,
        stderr: Vec<u8>,
        duration_ms: i64,
    ) -> ProcessOutput {
        let exec_status = match status.code() {
            Some(0) => ExecutionStatus::Success,
            Some(_) => ExecutionStatus::Failed,
            None => ExecutionStatus::Killed,
        };

        ProcessOutput {
            status: exec_status,
            exit_code: status.code(),
            duration_ms,
            stdout: String::from_utf8_lossy(&stdout).into_owned(),
            stderr: String::from_utf8_lossy(&stderr).into_owned(),
        }
    }
}

#[async_trait]
impl ProcessRunner for SubprocessRunner {
    async fn run(&self, spec: &ProcessSpec) -> Result<ProcessOutput, ExecutionError> {
        let start_time = self.time_provider.now_millis();

        debug!(
            program = %spec.program,
            args = ?spec.args,
            working_dir = %spec.working_dir.display(),
            timeout = ?spec.timeout,
            "Starting subprocess"
        );

        let (status, stdout, stderr) = self.spawn_and_wait(spec).await?;
        let duration_ms = self.time_provider.now_millis() - start_time;
        let output = self.build_output(status, stdout, stderr, duration_ms);

        debug!(
            program = %spec.program,
            duration_ms = %duration_ms,
            exit_code = ?output.exit_code,
            status = ?output.status,
            "Subprocess finished"
        );

        Ok(output)
    }
}
