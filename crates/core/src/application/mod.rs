// Application Layer - Use Cases

pub mod constants;
pub mod harness;
pub mod isolation;
pub mod preconditions;
pub mod process;
pub mod report;
pub mod verify;

// Re-exports
pub use harness::{HarnessConfig, HarnessService};
pub use isolation::run_in_isolated_directory;
pub use preconditions::{PreconditionOutcome, Preconditions};
pub use process::run_checked;
pub use report::{OutcomeRow, ScenarioOutcome, ScenarioReport};
pub use verify::{ArtifactSummary, ArtifactVerifier};
