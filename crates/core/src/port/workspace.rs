// Workspace Port
// Scratch directory a single harness run owns; released when the last handle drops

use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum WorkspaceError {
    #[error("Failed to create workspace: {0}")]
    Create(#[source] std::io::Error),

    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid workspace file name: {0:?}")]
    InvalidName(String),
}

pub trait Workspace: Send + Sync {
    /// Base directory every path of this run is resolved against
    fn root(&self) -> &Path;

    /// Write `contents` to `root/file_name`, returning the full path
    fn write_file(&self, file_name: &str, contents: &str) -> Result<PathBuf, WorkspaceError>;
}

pub trait WorkspaceFactory: Send + Sync {
    fn create(&self) -> Result<Arc<dyn Workspace>, WorkspaceError>;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    /// In-memory workspace; counts releases through a shared counter
    pub struct MockWorkspace {
        root: PathBuf,
        files: Mutex<Vec<(String, String)>>,
        released: Arc<AtomicUsize>,
    }

    impl MockWorkspace {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self {
                root: root.into(),
                files: Mutex::new(Vec::new()),
                released: Arc::new(AtomicUsize::new(0)),
            }
        }

        pub fn files(&self) -> Vec<(String, String)> {
            self.files.lock().unwrap().clone()
        }
    }

    impl Drop for MockWorkspace {
        fn drop(&mut self) {
            self.released.fetch_add(1, Ordering::SeqCst);
        }
    }

    impl Workspace for MockWorkspace {
        fn root(&self) -> &Path {
            &self.root
        }

        fn write_file(&self, file_name: &str, contents: &str) -> Result<PathBuf, WorkspaceError> {
            self.files
                .lock()
                .unwrap()
                .push((file_name.to_string(), contents.to_string()));
            Ok(self.root.join(file_name))
        }
    }

    pub struct MockWorkspaceFactory {
        root: PathBuf,
        created: AtomicUsize,
        released: Arc<AtomicUsize>,
        fail: bool,
    }

    impl MockWorkspaceFactory {
        pub fn new(root: impl Into<PathBuf>) -> Self {
            Self {
                root: root.into(),
                created: AtomicUsize::new(0),
                released: Arc::new(AtomicUsize::new(0)),
                fail: false,
            }
        }

        pub fn failing() -> Self {
            Self {
                fail: true,
                ..Self::new("/nonexistent")
            }
        }

        pub fn created(&self) -> usize {
            self.created.load(Ordering::SeqCst)
        }

        pub fn released(&self) -> usize {
            self.released.load(Ordering::SeqCst)
        }
    }

    impl WorkspaceFactory for MockWorkspaceFactory {
        fn create(&self) -> Result<Arc<dyn Workspace>, WorkspaceError> {
            if self.fail {
                return Err(WorkspaceError::Create(std::io::Error::new(
                    std::io::ErrorKind::PermissionDenied,
                    "mock: cannot create",
                )));
            }
            self.created.fetch_add(1, Ordering::SeqCst);
            let mut workspace = MockWorkspace::new(self.root.clone());
            workspace.released = self.released.clone();
            Ok(Arc::new(workspace))
        }
    }
}
