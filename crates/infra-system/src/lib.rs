// launchcheck Infrastructure - System Adapters
// Implements: ProcessRunner, ArtifactScanner, ConfigLoader, WorkspaceFactory, EnvironmentProbe

pub mod environment_probe_impl;
pub mod glob_scanner;
pub mod subprocess_runner;
pub mod temp_workspace;
pub mod yaml_loader;

pub use environment_probe_impl::CommandEnvironmentProbe;
pub use glob_scanner::GlobArtifactScanner;
pub use subprocess_runner::SubprocessRunner;
pub use temp_workspace::{TempWorkspace, TempWorkspaceFactory};
pub use yaml_loader::YamlConfigLoader;
