// launchcheck Core - Domain Logic & Ports
// NO infrastructure dependencies: process spawning, globbing and YAML live in adapters

pub mod application;
pub mod domain;
pub mod error;
pub mod port;

pub use error::{HarnessError, Result};
