// Artifact verification for single-run and sweep scenarios
//
// Only called after the child has exited; counts and values come from a fresh
// scan of the workspace each time.

use crate::domain::artifact::{
    rank_from_snapshot_path, CONFIG_SNAPSHOT_PATTERN, PROCESS_LOG_PATTERN,
    SPAWNED_SNAPSHOT_PATTERN,
};
use crate::domain::scenario::{DEVICES_KEY, SWEEP_KEY};
use crate::domain::{ConfigSnapshot, Scenario};
use crate::error::{HarnessError, Result};
use crate::port::{ArtifactScanner, ConfigLoader};
use serde::Serialize;
use std::path::Path;
use tracing::debug;

/// What the scan found
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactSummary {
    pub snapshots: usize,
    pub logs: usize,
}

pub struct ArtifactVerifier<'a> {
    scanner: &'a dyn ArtifactScanner,
    loader: &'a dyn ConfigLoader,
}

impl<'a> ArtifactVerifier<'a> {
    pub fn new(scanner: &'a dyn ArtifactScanner, loader: &'a dyn ConfigLoader) -> Self {
        Self { scanner, loader }
    }

    pub fn verify(&self, root: &Path, scenario: &Scenario) -> Result<ArtifactSummary> {
        match scenario {
            Scenario::SingleRun { devices, .. } => {
                self.verify_single_run(root, scenario, *devices)
            }
            Scenario::Sweep { devices, .. } => self.verify_sweep(root, scenario, *devices),
        }
    }

    /// N snapshots (one per process), the first records N devices, N-1 logs
    fn verify_single_run(
        &self,
        root: &Path,
        scenario: &Scenario,
        devices: u32,
    ) -> Result<ArtifactSummary> {
        let snapshots = self.scanner.collect_sorted(root, CONFIG_SNAPSHOT_PATTERN)?;
        expect_count(
            "config snapshots",
            CONFIG_SNAPSHOT_PATTERN,
            scenario.expected_snapshots(),
            snapshots.len(),
        )?;

        if let Some(first) = snapshots.first() {
            let snapshot = self.loader.load(first)?;
            expect_field(&snapshot, DEVICES_KEY, i64::from(devices))?;
        }

        let logs = self.count_logs(root, scenario)?;
        Ok(ArtifactSummary {
            snapshots: snapshots.len(),
            logs,
        })
    }

    /// jobs x (N-1) spawned snapshots, each records N devices and its own rank
    fn verify_sweep(
        &self,
        root: &Path,
        scenario: &Scenario,
        devices: u32,
    ) -> Result<ArtifactSummary> {
        let snapshots = self.scanner.collect_sorted(root, SPAWNED_SNAPSHOT_PATTERN)?;
        expect_count(
            "spawned config snapshots",
            SPAWNED_SNAPSHOT_PATTERN,
            scenario.expected_snapshots(),
            snapshots.len(),
        )?;

        for path in &snapshots {
            let rank = rank_from_snapshot_path(path).ok_or_else(|| {
                HarnessError::Assertion(format!(
                    "{} is not nested under an integer rank directory",
                    path.display()
                ))
            })?;
            let snapshot = self.loader.load(path)?;
            expect_field(&snapshot, DEVICES_KEY, i64::from(devices))?;
            expect_field(&snapshot, SWEEP_KEY, rank)?;
            debug!(path = %path.display(), rank, "Sweep snapshot verified");
        }

        let logs = self.count_logs(root, scenario)?;
        Ok(ArtifactSummary {
            snapshots: snapshots.len(),
            logs,
        })
    }

    fn count_logs(&self, root: &Path, scenario: &Scenario) -> Result<usize> {
        let logs = self.scanner.collect_sorted(root, PROCESS_LOG_PATTERN)?;
        expect_count(
            "process logs",
            PROCESS_LOG_PATTERN,
            scenario.expected_logs(),
            logs.len(),
        )?;
        Ok(logs.len())
    }
}

fn expect_count(what: &str, pattern: &str, expected: usize, found: usize) -> Result<()> {
    if expected != found {
        return Err(HarnessError::Assertion(format!(
            "expected {} {} matching '{}', found {}",
            expected, what, pattern, found
        )));
    }
    Ok(())
}

fn expect_field(snapshot: &ConfigSnapshot, key: &str, expected: i64) -> Result<()> {
    match snapshot.get_i64(key) {
        Some(actual) if actual == expected => Ok(()),
        Some(actual) => Err(HarnessError::Assertion(format!(
            "{}: expected {} == {}, got {}",
            snapshot.path().display(),
            key,
            expected,
            actual
        ))),
        None => Err(HarnessError::Assertion(format!(
            "{}: missing integer field '{}'",
            snapshot.path().display(),
            key
        ))),
    }
}
