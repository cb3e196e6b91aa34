//! End-to-end scenario runs against the fake launcher
//!
//! Real process spawning, real temp workspaces, real glob + YAML parsing.

#![cfg(unix)]

mod common;

use launchcheck_core::domain::rank_from_snapshot_path;
use launchcheck_core::domain::Scenario;
use launchcheck_core::port::{ArtifactScanner, ConfigLoader};
use launchcheck_infra_system::{GlobArtifactScanner, TempWorkspaceFactory, YamlConfigLoader};

use common::fake_service;

/// Two devices, default output subdir: 2 snapshots, first records 2 devices, 1 log
#[tokio::test]
async fn test_single_run_two_devices() {
    let service = fake_service(&[]);
    let factory = TempWorkspaceFactory::new();

    let report = service
        .run_isolated(&factory, &Scenario::single_run(2, None).unwrap())
        .await
        .unwrap();

    assert_eq!(report.exit_code, Some(0));
    assert_eq!(report.artifacts.snapshots, 2);
    assert_eq!(report.artifacts.logs, 1);
    assert_eq!(report.command, "sh fake_ddp.sh +devices=2 +strategy=\"ddp\"");
}

#[tokio::test]
async fn test_single_run_output_subdir_overrides() {
    let service = fake_service(&[]);
    let parent = tempfile::tempdir().unwrap();
    let factory = TempWorkspaceFactory::new().in_dir(parent.path()).keep(true);

    for subdir in ["dksa", ".hello"] {
        let scenario = Scenario::single_run(2, Some(subdir.to_string())).unwrap();
        let report = service.run_isolated(&factory, &scenario).await.unwrap();

        let snapshot = report
            .workspace
            .join("outputs/2026-10-19/12-00-00")
            .join(subdir)
            .join("config.yaml");
        assert!(snapshot.is_file(), "missing {}", snapshot.display());
        assert_eq!(report.artifacts.snapshots, 2);
        assert_eq!(report.artifacts.logs, 1);
    }
}

/// For all N >= 1: N snapshots and N-1 logs
#[tokio::test]
async fn test_single_run_counts_scale_with_devices() {
    let service = fake_service(&[]);
    let factory = TempWorkspaceFactory::new();

    for devices in 1..=4 {
        let report = service
            .run_isolated(&factory, &Scenario::single_run(devices, None).unwrap())
            .await
            .unwrap();
        assert_eq!(report.artifacts.snapshots, devices as usize);
        assert_eq!(report.artifacts.logs, devices as usize - 1);
    }
}

/// Two devices, two jobs: one spawned snapshot per job, foo == rank directory
#[tokio::test]
async fn test_sweep_two_jobs() {
    let service = fake_service(&[]);
    let parent = tempfile::tempdir().unwrap();
    let factory = TempWorkspaceFactory::new().in_dir(parent.path()).keep(true);

    let report = service
        .run_isolated(&factory, &Scenario::sweep(2, 2).unwrap())
        .await
        .unwrap();

    assert_eq!(report.artifacts.snapshots, 2);
    assert_eq!(report.artifacts.logs, 2);

    // Independently re-check every spawned snapshot
    let scanner = GlobArtifactScanner::new();
    let all = scanner
        .collect_sorted(&report.workspace, "**/config.yaml")
        .unwrap();
    assert_eq!(all.len(), 4, "every process of every job writes a snapshot");

    let snapshots = scanner
        .collect_sorted(&report.workspace, "**/.pl_ddp_hydra_*/config.yaml")
        .unwrap();
    assert_eq!(snapshots.len(), 2);
    for (expected_rank, path) in snapshots.iter().enumerate() {
        let rank = rank_from_snapshot_path(path).unwrap();
        assert_eq!(rank, expected_rank as i64);

        let snapshot = YamlConfigLoader.load(path).unwrap();
        assert_eq!(snapshot.get_i64("devices"), Some(2));
        assert_eq!(snapshot.get_i64("foo"), Some(rank));
    }
}

/// For all jobs >= 1: jobs x (N-1) snapshots and logs
#[tokio::test]
async fn test_sweep_counts_scale_with_jobs_and_devices() {
    let service = fake_service(&[]);
    let factory = TempWorkspaceFactory::new();

    for (devices, num_jobs) in [(2, 1), (2, 3), (3, 2), (4, 3)] {
        let scenario = Scenario::sweep(devices, num_jobs).unwrap();
        let report = service.run_isolated(&factory, &scenario).await.unwrap();

        let expected = (num_jobs * (devices - 1)) as usize;
        assert_eq!(report.artifacts.snapshots, expected, "{}", scenario);
        assert_eq!(report.artifacts.logs, expected, "{}", scenario);
    }
}

#[tokio::test]
async fn test_default_matrix_passes() {
    let service = fake_service(&[]);
    let factory = TempWorkspaceFactory::new();

    let outcomes = service
        .run_matrix(&factory, &Scenario::default_matrix())
        .await;

    assert_eq!(outcomes.len(), 5);
    for outcome in &outcomes {
        assert_eq!(outcome.status(), "passed", "{}: {}", outcome.scenario(), outcome.detail());
    }
}

#[tokio::test]
async fn test_workspace_removed_after_run() {
    let service = fake_service(&[]);
    let factory = TempWorkspaceFactory::new();

    let report = service
        .run_isolated(&factory, &Scenario::single_run(2, None).unwrap())
        .await
        .unwrap();

    assert!(!report.workspace.exists());
}

#[tokio::test]
async fn test_rescan_after_deletion_is_empty() {
    let service = fake_service(&[]);
    let parent = tempfile::tempdir().unwrap();
    let factory = TempWorkspaceFactory::new().in_dir(parent.path()).keep(true);

    let report = service
        .run_isolated(&factory, &Scenario::single_run(3, None).unwrap())
        .await
        .unwrap();

    let scanner = GlobArtifactScanner::new();
    assert_eq!(
        scanner
            .discover(&report.workspace, "**/config.yaml")
            .unwrap()
            .count(),
        3
    );

    std::fs::remove_dir_all(report.workspace.join("outputs")).unwrap();
    assert_eq!(
        scanner
            .discover(&report.workspace, "**/config.yaml")
            .unwrap()
            .count(),
        0
    );
}
