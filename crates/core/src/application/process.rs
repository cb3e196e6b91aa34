// Checked process run: launch, wait, and turn a bad exit into an error

use crate::error::{HarnessError, Result};
use crate::port::{ProcessOutput, ProcessRunner, ProcessSpec};
use tracing::{error, info};

/// Run `spec` to completion and require a zero exit code
///
/// On a non-zero exit (or a signal) the captured stderr and stdout are echoed
/// to the error log before `HarnessError::Subprocess` is returned. A spawn
/// failure is logged with the attempted command line and returned as
/// `HarnessError::Launch`. Nothing is retried.
pub async fn run_checked(runner: &dyn ProcessRunner, spec: &ProcessSpec) -> Result<ProcessOutput> {
    let command = spec.command_line();
    info!(
        command = %command,
        working_dir = %spec.working_dir.display(),
        "Launching subprocess"
    );

    let output = match runner.run(spec).await {
        Ok(output) => output,
        Err(e) => {
            error!(command = %command, error = %e, "Error executing subprocess");
            return Err(e.into());
        }
    };

    if !output.success() {
        error!(
            command = %command,
            exit_code = ?output.exit_code,
            "Subprocess error:\n{}",
            output.stderr
        );
        error!(command = %command, "Subprocess stdout:\n{}", output.stdout);
        return Err(HarnessError::Subprocess {
            command,
            exit_code: output.exit_code,
            stdout: output.stdout,
            stderr: output.stderr,
        });
    }

    info!(
        command = %command,
        duration_ms = output.duration_ms,
        "Subprocess completed"
    );
    Ok(output)
}
