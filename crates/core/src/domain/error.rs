// Domain Error Types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Invalid device count: {0} (must be at least 1)")]
    InvalidDeviceCount(u32),

    #[error("Invalid sweep job count: {0} (must be at least 1)")]
    InvalidJobCount(u32),

    #[error("Invalid output subdirectory: {0:?}")]
    InvalidOutputSubdir(String),

    #[error("Invalid override key: {0:?}")]
    InvalidOverrideKey(String),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

pub type Result<T> = std::result::Result<T, DomainError>;
