// Isolated working directory scope

use crate::error::Result;
use crate::port::{Workspace, WorkspaceFactory};
use std::future::Future;
use std::sync::Arc;
use tracing::{debug, info};

/// Run `body` against a freshly created workspace
///
/// The body gets its own handle; the scope keeps another and drops it after
/// the body resolves, so the directory is released whether the body returned
/// Ok, returned Err, or unwound. Nothing here touches the process's current
/// directory: callers resolve paths against `workspace.root()`.
pub async fn run_in_isolated_directory<T, F, Fut>(
    factory: &dyn WorkspaceFactory,
    body: F,
) -> Result<T>
where
    F: FnOnce(Arc<dyn Workspace>) -> Fut,
    Fut: Future<Output = Result<T>>,
{
    let workspace = factory.create()?;
    let root = workspace.root().to_path_buf();
    info!(workspace = %root.display(), "Acquired isolated workspace");

    let outcome = body(workspace.clone()).await;

    drop(workspace);
    debug!(
        workspace = %root.display(),
        ok = outcome.is_ok(),
        "Released isolated workspace"
    );

    outcome
}
