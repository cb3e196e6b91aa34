//! Real launch with the built-in training driver
//!
//! Needs two or more GPUs plus an interpreter with the training framework and
//! hydra installed. Run with `cargo test -- --ignored`.

use std::sync::Arc;

use launchcheck_core::application::{HarnessConfig, Preconditions};
use launchcheck_core::domain::{DriverScript, Scenario};
use launchcheck_core::port::time_provider::SystemTimeProvider;
use launchcheck_infra_system::{CommandEnvironmentProbe, SubprocessRunner, TempWorkspaceFactory};

mod common;

#[tokio::test]
#[ignore = "requires 2+ GPUs and hydra"]
async fn test_training_driver_matrix() {
    let runner = Arc::new(SubprocessRunner::new(Arc::new(SystemTimeProvider)));
    let probe = CommandEnvironmentProbe::new(runner, "python3");
    let outcome = Preconditions::default().check(&probe).await;
    if !outcome.is_satisfied() {
        println!("skipping: {}", outcome.reasons().join("; "));
        return;
    }

    let service = common::service_with(DriverScript::training(), HarnessConfig::default());
    let factory = TempWorkspaceFactory::new();

    for outcome in service
        .run_matrix(&factory, &Scenario::default_matrix())
        .await
    {
        assert!(
            !outcome.is_failure(),
            "{}: {}",
            outcome.scenario(),
            outcome.detail()
        );
    }
}
