// Launch preconditions: skip real runs on hosts that cannot perform them

use super::constants::{MIN_GPUS, REQUIRED_MODULES};
use crate::port::EnvironmentProbe;
use tracing::info;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreconditionOutcome {
    Satisfied,
    Unmet(Vec<String>),
}

impl PreconditionOutcome {
    pub fn is_satisfied(&self) -> bool {
        matches!(self, PreconditionOutcome::Satisfied)
    }

    pub fn reasons(&self) -> &[String] {
        match self {
            PreconditionOutcome::Satisfied => &[],
            PreconditionOutcome::Unmet(reasons) => reasons,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Preconditions {
    pub min_gpus: u32,
    pub modules: Vec<String>,
}

impl Default for Preconditions {
    fn default() -> Self {
        Self {
            min_gpus: MIN_GPUS,
            modules: REQUIRED_MODULES.iter().map(|m| m.to_string()).collect(),
        }
    }
}

impl Preconditions {
    /// Require at least `devices` GPUs (never fewer than the default minimum)
    pub fn for_devices(devices: u32) -> Self {
        Self {
            min_gpus: devices.max(MIN_GPUS),
            ..Self::default()
        }
    }

    pub async fn check(&self, probe: &dyn EnvironmentProbe) -> PreconditionOutcome {
        let mut reasons = Vec::new();

        let gpus = probe.gpu_count().await;
        if gpus < self.min_gpus {
            reasons.push(format!("{} GPU(s) visible, {} required", gpus, self.min_gpus));
        }

        for module in &self.modules {
            if !probe.module_available(module).await {
                reasons.push(format!("module '{}' is not importable", module));
            }
        }

        info!(gpus, unmet = reasons.len(), "Checked launch preconditions");

        if reasons.is_empty() {
            PreconditionOutcome::Satisfied
        } else {
            PreconditionOutcome::Unmet(reasons)
        }
    }
}
