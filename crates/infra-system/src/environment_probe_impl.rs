// Environment probe backed by short-lived commands
use async_trait::async_trait;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

use launchcheck_core::application::constants::GPU_QUERY_PROGRAM;
use launchcheck_core::port::{EnvironmentProbe, ProcessRunner, ProcessSpec};

const PROBE_TIMEOUT: Duration = Duration::from_secs(30);

/// Counts GPUs with `nvidia-smi -L` and checks imports with `<interpreter> -c`
pub struct CommandEnvironmentProbe {
    runner: Arc<dyn ProcessRunner>,
    interpreter: String,
    working_dir: PathBuf,
}

impl CommandEnvironmentProbe {
    pub fn new(runner: Arc<dyn ProcessRunner>, interpreter: impl Into<String>) -> Self {
        Self {
            runner,
            interpreter: interpreter.into(),
            working_dir: std::env::temp_dir(),
        }
    }

    /// Lines like `GPU 0: NVIDIA A100 (UUID: GPU-...)`
    fn count_gpu_lines(stdout: &str) -> u32 {
        stdout
            .lines()
            .filter(|line| line.trim_start().starts_with("GPU "))
            .count() as u32
    }
}

#[async_trait]
impl EnvironmentProbe for CommandEnvironmentProbe {
    async fn gpu_count(&self) -> u32 {
        let spec = ProcessSpec::new(GPU_QUERY_PROGRAM, vec!["-L".to_string()], &self.working_dir)
            .with_timeout(Some(PROBE_TIMEOUT));

        match self.runner.run(&spec).await {
            Ok(output) if output.success() => Self::count_gpu_lines(&output.stdout),
            Ok(output) => {
                debug!(exit_code = ?output.exit_code, "GPU query failed");
                0
            }
            Err(e) => {
                debug!(error = %e, "GPU query unavailable");
                0
            }
        }
    }

    async fn module_available(&self, module: &str) -> bool {
        let spec = ProcessSpec::new(
            self.interpreter.clone(),
            vec!["-c".to_string(), format!("import {}", module)],
            &self.working_dir,
        )
        .with_timeout(Some(PROBE_TIMEOUT));

        match self.runner.run(&spec).await {
            Ok(output) => output.success(),
            Err(e) => {
                debug!(module, error = %e, "Module probe failed");
                false
            }
        }
    }
}
