// Scenario Domain Model
// The two launch shapes the harness verifies and the artifact counts each must produce

use super::error::{DomainError, Result};
use super::invocation::{Invocation, Override};
use serde::Serialize;
use std::fmt;
use std::path::Path;

pub const DEVICES_KEY: &str = "devices";
pub const STRATEGY_KEY: &str = "strategy";
pub const OUTPUT_SUBDIR_KEY: &str = "hydra.output_subdir";
/// Auxiliary parameter swept in multirun jobs; each job records its own index
pub const SWEEP_KEY: &str = "foo";
pub const DDP_STRATEGY: &str = "ddp";
pub const DEFAULT_DEVICES: u32 = 2;

/// A launch shape with its expected on-disk outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum Scenario {
    /// One job, N processes
    SingleRun {
        devices: u32,
        output_subdir: Option<String>,
    },
    /// `num_jobs` jobs, each with N processes
    Sweep { devices: u32, num_jobs: u32 },
}

impl Scenario {
    pub fn single_run(devices: u32, output_subdir: Option<String>) -> Result<Self> {
        validate_devices(devices)?;
        if let Some(subdir) = &output_subdir {
            validate_subdir(subdir)?;
        }
        Ok(Scenario::SingleRun {
            devices,
            output_subdir,
        })
    }

    pub fn sweep(devices: u32, num_jobs: u32) -> Result<Self> {
        validate_devices(devices)?;
        if num_jobs == 0 {
            return Err(DomainError::InvalidJobCount(num_jobs));
        }
        Ok(Scenario::Sweep { devices, num_jobs })
    }

    /// The parametrized cases the harness ships with: three single runs
    /// (default subdir, a plain name, a hidden name) and sweeps of 1 and 2 jobs
    pub fn default_matrix() -> Vec<Scenario> {
        vec![
            Scenario::SingleRun {
                devices: DEFAULT_DEVICES,
                output_subdir: None,
            },
            Scenario::SingleRun {
                devices: DEFAULT_DEVICES,
                output_subdir: Some("dksa".to_string()),
            },
            Scenario::SingleRun {
                devices: DEFAULT_DEVICES,
                output_subdir: Some(".hello".to_string()),
            },
            Scenario::Sweep {
                devices: DEFAULT_DEVICES,
                num_jobs: 1,
            },
            Scenario::Sweep {
                devices: DEFAULT_DEVICES,
                num_jobs: 2,
            },
        ]
    }

    pub fn devices(&self) -> u32 {
        match self {
            Scenario::SingleRun { devices, .. } | Scenario::Sweep { devices, .. } => *devices,
        }
    }

    pub fn is_sweep(&self) -> bool {
        matches!(self, Scenario::Sweep { .. })
    }

    /// Processes launched by the framework on top of the launching one
    fn spawned_per_job(&self) -> usize {
        self.devices().saturating_sub(1) as usize
    }

    /// Single run: every process writes a snapshot (N).
    /// Sweep: only spawned processes are counted (jobs x (N-1)).
    pub fn expected_snapshots(&self) -> usize {
        match self {
            Scenario::SingleRun { devices, .. } => *devices as usize,
            Scenario::Sweep { num_jobs, .. } => *num_jobs as usize * self.spawned_per_job(),
        }
    }

    /// The launching process never writes a numbered log
    pub fn expected_logs(&self) -> usize {
        match self {
            Scenario::SingleRun { .. } => self.spawned_per_job(),
            Scenario::Sweep { num_jobs, .. } => *num_jobs as usize * self.spawned_per_job(),
        }
    }

    pub fn overrides(&self) -> Result<Vec<Override>> {
        let mut overrides = vec![
            Override::append(DEVICES_KEY, self.devices())?,
            Override::append_quoted(STRATEGY_KEY, DDP_STRATEGY)?,
        ];
        match self {
            Scenario::SingleRun {
                output_subdir: Some(subdir),
                ..
            } => overrides.push(Override::set(OUTPUT_SUBDIR_KEY, subdir)?),
            Scenario::SingleRun { .. } => {}
            Scenario::Sweep { num_jobs, .. } => {
                overrides.push(Override::sweep(SWEEP_KEY, 0..*num_jobs)?)
            }
        }
        Ok(overrides)
    }

    pub fn invocation(&self, program: &str, script: &Path) -> Result<Invocation> {
        let invocation = self
            .overrides()?
            .into_iter()
            .fold(Invocation::new(program, script), Invocation::with_override);
        Ok(invocation.with_multirun(self.is_sweep()))
    }
}

impl fmt::Display for Scenario {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scenario::SingleRun {
                devices,
                output_subdir: None,
            } => write!(f, "single-run(devices={})", devices),
            Scenario::SingleRun {
                devices,
                output_subdir: Some(subdir),
            } => write!(f, "single-run(devices={}, subdir={})", devices, subdir),
            Scenario::Sweep { devices, num_jobs } => {
                write!(f, "sweep(devices={}, jobs={})", devices, num_jobs)
            }
        }
    }
}

fn validate_devices(devices: u32) -> Result<()> {
    if devices == 0 {
        return Err(DomainError::InvalidDeviceCount(devices));
    }
    Ok(())
}

fn validate_subdir(subdir: &str) -> Result<()> {
    let single_segment = !subdir.is_empty()
        && subdir != "."
        && subdir != ".."
        && !subdir.contains(['/', '\\', '=', ',']);
    if single_segment {
        Ok(())
    } else {
        Err(DomainError::InvalidOutputSubdir(subdir.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_expected_counts() {
        let single = Scenario::single_run(2, None).unwrap();
        assert_eq!(single.expected_snapshots(), 2);
        assert_eq!(single.expected_logs(), 1);

        let sweep = Scenario::sweep(2, 2).unwrap();
        assert_eq!(sweep.expected_snapshots(), 2);
        assert_eq!(sweep.expected_logs(), 2);

        let wide = Scenario::sweep(4, 3).unwrap();
        assert_eq!(wide.expected_snapshots(), 9);
        assert_eq!(wide.expected_logs(), 9);
    }

    #[test]
    fn test_single_device_spawns_nothing() {
        let single = Scenario::single_run(1, None).unwrap();
        assert_eq!(single.expected_snapshots(), 1);
        assert_eq!(single.expected_logs(), 0);

        let sweep = Scenario::sweep(1, 3).unwrap();
        assert_eq!(sweep.expected_snapshots(), 0);
    }

    #[test]
    fn test_validation() {
        assert_eq!(
            Scenario::single_run(0, None),
            Err(DomainError::InvalidDeviceCount(0))
        );
        assert_eq!(Scenario::sweep(2, 0), Err(DomainError::InvalidJobCount(0)));
        assert!(Scenario::single_run(2, Some(String::new())).is_err());
        assert!(Scenario::single_run(2, Some("a/b".to_string())).is_err());
        assert!(Scenario::single_run(2, Some("..".to_string())).is_err());
        assert!(Scenario::single_run(2, Some(".hello".to_string())).is_ok());
    }

    #[test]
    fn test_single_run_invocation() {
        let scenario = Scenario::single_run(2, Some("dksa".to_string())).unwrap();
        let inv = scenario.invocation("python3", Path::new("temp.py")).unwrap();
        assert_eq!(
            inv.args(),
            vec![
                "temp.py",
                "+devices=2",
                "+strategy=\"ddp\"",
                "hydra.output_subdir=dksa"
            ]
        );
        assert!(!inv.multirun);
    }

    #[test]
    fn test_sweep_invocation() {
        let scenario = Scenario::sweep(2, 3).unwrap();
        let inv = scenario.invocation("python3", Path::new("temp.py")).unwrap();
        assert_eq!(
            inv.args(),
            vec![
                "temp.py",
                "+devices=2",
                "+strategy=\"ddp\"",
                "+foo=0,1,2",
                "--multirun"
            ]
        );
    }

    #[test]
    fn test_default_matrix() {
        let matrix = Scenario::default_matrix();
        assert_eq!(matrix.len(), 5);
        assert_eq!(matrix.iter().filter(|s| s.is_sweep()).count(), 2);
        assert!(matrix.iter().all(|s| s.devices() == DEFAULT_DEVICES));
        assert_eq!(matrix[2].to_string(), "single-run(devices=2, subdir=.hello)");
        assert_eq!(matrix[4].to_string(), "sweep(devices=2, jobs=2)");
    }
}
