// Harness Service: write driver, launch it, verify artifacts

use super::constants::{CLEARED_ENV_VARS, DEFAULT_INTERPRETER};
use super::isolation::run_in_isolated_directory;
use super::process::run_checked;
use super::report::{ScenarioOutcome, ScenarioReport};
use super::verify::ArtifactVerifier;
use crate::domain::{DriverScript, Scenario};
use crate::error::Result;
use crate::port::{
    ArtifactScanner, ConfigLoader, ProcessRunner, ProcessSpec, Workspace, WorkspaceFactory,
};
use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

/// Launch settings shared by every scenario
#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Interpreter that executes the driver script
    pub interpreter: String,
    pub timeout: Option<Duration>,
    /// Extra variables for the child, on top of the inherited environment
    pub env: HashMap<String, String>,
}

impl Default for HarnessConfig {
    fn default() -> Self {
        Self {
            interpreter: DEFAULT_INTERPRETER.to_string(),
            timeout: None,
            env: HashMap::new(),
        }
    }
}

pub struct HarnessService {
    runner: Arc<dyn ProcessRunner>,
    scanner: Arc<dyn ArtifactScanner>,
    loader: Arc<dyn ConfigLoader>,
    driver: DriverScript,
    config: HarnessConfig,
}

impl HarnessService {
    pub fn new(
        runner: Arc<dyn ProcessRunner>,
        scanner: Arc<dyn ArtifactScanner>,
        loader: Arc<dyn ConfigLoader>,
        driver: DriverScript,
        config: HarnessConfig,
    ) -> Self {
        Self {
            runner,
            scanner,
            loader,
            driver,
            config,
        }
    }

    /// Child process spec for `scenario`, rooted at `root`
    ///
    /// The script is addressed relative to `root`, which is also the child's
    /// working directory.
    pub fn process_spec(&self, root: &Path, scenario: &Scenario) -> Result<ProcessSpec> {
        let invocation =
            scenario.invocation(&self.config.interpreter, Path::new(self.driver.file_name()))?;

        let spec = ProcessSpec::new(invocation.program.clone(), invocation.args(), root)
            .without_env(CLEARED_ENV_VARS)
            .with_timeout(self.config.timeout);

        Ok(self
            .config
            .env
            .iter()
            .fold(spec, |spec, (k, v)| spec.with_env(k.as_str(), v.as_str())))
    }

    /// Run one scenario inside an already-acquired workspace
    pub async fn run_in(&self, workspace: &dyn Workspace, scenario: &Scenario) -> Result<ScenarioReport> {
        let root = workspace.root();
        let script = workspace.write_file(self.driver.file_name(), self.driver.body())?;
        info!(
            scenario = %scenario,
            script = %script.display(),
            "Driver script written"
        );

        let spec = self.process_spec(root, scenario)?;
        let output = run_checked(self.runner.as_ref(), &spec).await?;

        // Child has exited; only now is the tree inspected
        let artifacts = ArtifactVerifier::new(self.scanner.as_ref(), self.loader.as_ref())
            .verify(root, scenario)?;

        info!(
            scenario = %scenario,
            snapshots = artifacts.snapshots,
            logs = artifacts.logs,
            "Scenario passed"
        );

        Ok(ScenarioReport {
            scenario: scenario.clone(),
            label: scenario.to_string(),
            command: spec.command_line(),
            workspace: root.to_path_buf(),
            exit_code: output.exit_code,
            duration_ms: output.duration_ms,
            artifacts,
        })
    }

    /// Run one scenario in a fresh workspace from `factory`
    pub async fn run_isolated(
        &self,
        factory: &dyn WorkspaceFactory,
        scenario: &Scenario,
    ) -> Result<ScenarioReport> {
        run_in_isolated_directory(factory, |workspace| async move {
            self.run_in(workspace.as_ref(), scenario).await
        })
        .await
    }

    /// Run every scenario, each in its own workspace; a failure does not stop the rest
    pub async fn run_matrix(
        &self,
        factory: &dyn WorkspaceFactory,
        scenarios: &[Scenario],
    ) -> Vec<ScenarioOutcome> {
        let mut outcomes = Vec::with_capacity(scenarios.len());
        for scenario in scenarios {
            let outcome = match self.run_isolated(factory, scenario).await {
                Ok(report) => ScenarioOutcome::Passed(report),
                Err(error) => {
                    warn!(scenario = %scenario, error = %error, "Scenario failed");
                    ScenarioOutcome::Failed {
                        scenario: scenario.clone(),
                        error,
                    }
                }
            };
            outcomes.push(outcome);
        }
        outcomes
    }
}
