// Artifact Scanner Port
// Finds files the child process left under a root directory

use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiscoveryError {
    #[error("Invalid glob pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("Cannot read {path}: {message}")]
    Unreadable { path: PathBuf, message: String },
}

/// Lazy sequence of matches; each item is produced while walking the tree
pub type ArtifactIter = Box<dyn Iterator<Item = Result<PathBuf, DiscoveryError>>>;

pub trait ArtifactScanner: Send + Sync {
    /// Start a fresh scan of `root` for `pattern` (relative, may contain `**`)
    ///
    /// Every call reflects the filesystem at the time it is iterated;
    /// nothing is cached between calls.
    fn discover(&self, root: &Path, pattern: &str) -> Result<ArtifactIter, DiscoveryError>;

    /// Drain a scan into a sorted list, failing on the first unreadable entry
    fn collect_sorted(&self, root: &Path, pattern: &str) -> Result<Vec<PathBuf>, DiscoveryError> {
        let mut paths = self
            .discover(root, pattern)?
            .collect::<Result<Vec<_>, _>>()?;
        paths.sort();
        Ok(paths)
    }
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;

    /// Returns preset paths per pattern, joined onto the scanned root
    #[derive(Default)]
    pub struct MockArtifactScanner {
        results: Mutex<HashMap<String, Vec<PathBuf>>>,
    }

    impl MockArtifactScanner {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with(self, pattern: &str, relative: &[&str]) -> Self {
            self.results.lock().unwrap().insert(
                pattern.to_string(),
                relative.iter().map(PathBuf::from).collect(),
            );
            self
        }

        pub fn clear(&self) {
            self.results.lock().unwrap().clear();
        }
    }

    impl ArtifactScanner for MockArtifactScanner {
        fn discover(&self, root: &Path, pattern: &str) -> Result<ArtifactIter, DiscoveryError> {
            let paths: Vec<PathBuf> = self
                .results
                .lock()
                .unwrap()
                .get(pattern)
                .cloned()
                .unwrap_or_default()
                .into_iter()
                .map(|p| root.join(p))
                .collect();
            Ok(Box::new(paths.into_iter().map(Ok)))
        }
    }
}
