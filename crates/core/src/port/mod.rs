// Port Layer - Interfaces for external dependencies

pub mod artifact_scanner;
pub mod config_loader;
pub mod environment_probe;
pub mod process_runner;
pub mod time_provider;
pub mod workspace;

// Re-exports
pub use artifact_scanner::{ArtifactIter, ArtifactScanner, DiscoveryError};
pub use config_loader::{ConfigLoadError, ConfigLoader};
pub use environment_probe::EnvironmentProbe;
pub use process_runner::{
    ExecutionError, ExecutionStatus, ProcessOutput, ProcessRunner, ProcessSpec,
};
pub use time_provider::TimeProvider;
pub use workspace::{Workspace, WorkspaceError, WorkspaceFactory};
