// Config Loader Port
// Parses a structured (nested key-value) config file into a ConfigSnapshot

use crate::domain::ConfigSnapshot;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigLoadError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed config {path}: {message}")]
    Parse { path: PathBuf, message: String },
}

pub trait ConfigLoader: Send + Sync {
    fn load(&self, path: &Path) -> Result<ConfigSnapshot, ConfigLoadError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use serde_json::Value;
    use std::collections::HashMap;

    /// Serves snapshots keyed by file path; unknown paths fail to read
    #[derive(Default)]
    pub struct MockConfigLoader {
        snapshots: HashMap<PathBuf, Value>,
    }

    impl MockConfigLoader {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(mut self, path: impl Into<PathBuf>, values: Value) -> Self {
            self.snapshots.insert(path.into(), values);
            self
        }
    }

    impl ConfigLoader for MockConfigLoader {
        fn load(&self, path: &Path) -> Result<ConfigSnapshot, ConfigLoadError> {
            self.snapshots
                .get(path)
                .map(|values| ConfigSnapshot::new(path, values.clone()))
                .ok_or_else(|| ConfigLoadError::Read {
                    path: path.to_path_buf(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "mock: no snapshot"),
                })
        }
    }
}
