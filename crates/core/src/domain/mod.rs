// Domain Layer - Pure values describing what is launched and what must appear on disk

pub mod artifact;
pub mod driver;
pub mod error;
pub mod invocation;
pub mod scenario;
pub mod snapshot;

// Re-exports
pub use artifact::rank_from_snapshot_path;
pub use driver::DriverScript;
pub use error::DomainError;
pub use invocation::{Invocation, Override};
pub use scenario::Scenario;
pub use snapshot::ConfigSnapshot;
