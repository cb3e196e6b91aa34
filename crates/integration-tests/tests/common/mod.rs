//! Shared wiring: real adapters, fake launcher script run by `sh`

#![allow(dead_code)]

use std::collections::HashMap;
use std::sync::Arc;

use launchcheck_core::application::{HarnessConfig, HarnessService};
use launchcheck_core::domain::DriverScript;
use launchcheck_core::port::time_provider::SystemTimeProvider;
use launchcheck_infra_system::{GlobArtifactScanner, SubprocessRunner, YamlConfigLoader};

pub const FAKE_LAUNCHER: &str = include_str!("../fixtures/fake_hydra_ddp.sh");

pub fn fake_driver() -> DriverScript {
    DriverScript::new("fake_ddp.sh", FAKE_LAUNCHER).unwrap()
}

pub fn service_with(driver: DriverScript, config: HarnessConfig) -> HarnessService {
    HarnessService::new(
        Arc::new(SubprocessRunner::new(Arc::new(SystemTimeProvider))),
        Arc::new(GlobArtifactScanner::new()),
        Arc::new(YamlConfigLoader),
        driver,
        config,
    )
}

/// Harness over the fake launcher, with extra child environment
pub fn fake_service(env: &[(&str, &str)]) -> HarnessService {
    let env: HashMap<String, String> = env
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    service_with(
        fake_driver(),
        HarnessConfig {
            interpreter: "sh".to_string(),
            env,
            ..HarnessConfig::default()
        },
    )
}
