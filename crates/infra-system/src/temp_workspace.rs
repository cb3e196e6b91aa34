// Temporary-directory workspace
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tempfile::TempDir;
use tracing::debug;

use launchcheck_core::port::{Workspace, WorkspaceError, WorkspaceFactory};

const DEFAULT_PREFIX: &str = "launchcheck-";

/// Workspace backed by a `TempDir`; the directory is removed when dropped
/// unless the factory was told to keep it
pub struct TempWorkspace {
    dir: TempDir,
    kept: bool,
}

impl Workspace for TempWorkspace {
    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn write_file(&self, file_name: &str, contents: &str) -> Result<PathBuf, WorkspaceError> {
        if file_name.is_empty() || Path::new(file_name).components().count() != 1 {
            return Err(WorkspaceError::InvalidName(file_name.to_string()));
        }

        let path = self.dir.path().join(file_name);
        fs::write(&path, contents).map_err(|source| WorkspaceError::Write {
            path: path.clone(),
            source,
        })?;
        Ok(path)
    }
}

impl Drop for TempWorkspace {
    fn drop(&mut self) {
        if self.kept {
            debug!(workspace = %self.dir.path().display(), "Keeping workspace");
        } else {
            debug!(workspace = %self.dir.path().display(), "Removing workspace");
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct TempWorkspaceFactory {
    parent: Option<PathBuf>,
    keep: bool,
}

impl TempWorkspaceFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create workspaces under `parent` instead of the system temp dir
    pub fn in_dir(mut self, parent: impl Into<PathBuf>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Leave workspaces on disk after the run, for inspection
    pub fn keep(mut self, keep: bool) -> Self {
        self.keep = keep;
        self
    }
}

impl WorkspaceFactory for TempWorkspaceFactory {
    fn create(&self) -> Result<Arc<dyn Workspace>, WorkspaceError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(DEFAULT_PREFIX).disable_cleanup(self.keep);

        let dir = match &self.parent {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(WorkspaceError::Create)?;
                builder.tempdir_in(parent)
            }
            None => builder.tempdir(),
        }
        .map_err(WorkspaceError::Create)?;

        debug!(workspace = %dir.path().display(), keep = self.keep, "Created workspace");
        Ok(Arc::new(TempWorkspace {
            dir,
            kept: self.keep,
        }))
    }
}
