// Artifact Domain Model
// Files the external launcher leaves behind, and how to find them

use std::path::Path;

/// Every resolved-config snapshot, at any depth
pub const CONFIG_SNAPSHOT_PATTERN: &str = "**/config.yaml";

/// Snapshots written by processes the framework spawned itself
pub const SPAWNED_SNAPSHOT_PATTERN: &str = "**/.pl_ddp_hydra_*/config.yaml";

/// Per-process logs of spawned ranks
pub const PROCESS_LOG_PATTERN: &str = "**/train_ddp_process_*.log";

/// Rank encoded in a sweep snapshot path: `<...>/<rank>/.pl_ddp_hydra_<id>/config.yaml`
///
/// Returns `None` when the grandparent segment is missing or not an integer.
pub fn rank_from_snapshot_path(path: &Path) -> Option<i64> {
    path.parent()?
        .parent()?
        .file_name()?
        .to_str()?
        .parse()
        .ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rank_from_snapshot_path() {
        let path = Path::new("multirun/2026-10-19/12-00-00/1/.pl_ddp_hydra_ab12/config.yaml");
        assert_eq!(rank_from_snapshot_path(path), Some(1));

        let path = Path::new("/tmp/x/0/.pl_ddp_hydra_z/config.yaml");
        assert_eq!(rank_from_snapshot_path(path), Some(0));
    }

    #[test]
    fn test_rank_missing_or_not_numeric() {
        assert_eq!(
            rank_from_snapshot_path(Path::new("outputs/run/.hydra/config.yaml")),
            None
        );
        assert_eq!(rank_from_snapshot_path(Path::new("config.yaml")), None);
        assert_eq!(rank_from_snapshot_path(Path::new("x/config.yaml")), None);
    }
}
