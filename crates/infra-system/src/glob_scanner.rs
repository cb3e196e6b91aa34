// Glob-based artifact discovery
use glob::{MatchOptions, Pattern};
use std::path::Path;
use tracing::debug;

use launchcheck_core::port::{ArtifactIter, ArtifactScanner, DiscoveryError};

/// Walks the tree lazily with `glob`; hidden directories are matched by `*` and `**`
pub struct GlobArtifactScanner {
    options: MatchOptions,
}

impl GlobArtifactScanner {
    pub fn new() -> Self {
        Self {
            options: MatchOptions {
                case_sensitive: true,
                require_literal_separator: true,
                require_literal_leading_dot: false,
            },
        }
    }

    fn full_pattern(root: &Path, pattern: &str) -> Result<String, DiscoveryError> {
        if pattern.is_empty() || Path::new(pattern).is_absolute() {
            return Err(DiscoveryError::InvalidPattern {
                pattern: pattern.to_string(),
                message: "pattern must be relative to the scan root".to_string(),
            });
        }

        // Root is a literal path; only `pattern` may carry wildcards
        let root = Pattern::escape(&root.to_string_lossy());
        Ok(format!("{}/{}", root.trim_end_matches('/'), pattern))
    }
}

impl Default for GlobArtifactScanner {
    fn default() -> Self {
        Self::new()
    }
}

impl ArtifactScanner for GlobArtifactScanner {
    fn discover(&self, root: &Path, pattern: &str) -> Result<ArtifactIter, DiscoveryError> {
        let full = Self::full_pattern(root, pattern)?;
        debug!(pattern = %full, "Scanning for artifacts");

        let paths = glob::glob_with(&full, self.options).map_err(|e| {
            DiscoveryError::InvalidPattern {
                pattern: pattern.to_string(),
                message: e.to_string(),
            }
        })?;

        Ok(Box::new(paths.map(|entry| {
            entry.map_err(|e| DiscoveryError::Unreadable {
                path: e.path().to_path_buf(),
                message: e.error().to_string(),
            })
        })))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::PathBuf;

    fn touch(root: &Path, relative: &str) {
        let path = root.join(relative);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, "x").unwrap();
    }

    fn relative(root: &Path, found: Vec<PathBuf>) -> Vec<String> {
        found
            .into_iter()
            .map(|p| p.strip_prefix(root).unwrap().to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn test_recursive_match_includes_hidden_dirs() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "outputs/a/b/.hydra/config.yaml");
        touch(dir.path(), "outputs/a/b/.pl_ddp_hydra_x1/config.yaml");
        touch(dir.path(), "outputs/a/b/hydra.yaml");

        let scanner = GlobArtifactScanner::new();
        let found = scanner.collect_sorted(dir.path(), "**/config.yaml").unwrap();
        assert_eq!(
            relative(dir.path(), found),
            vec![
                "outputs/a/b/.hydra/config.yaml",
                "outputs/a/b/.pl_ddp_hydra_x1/config.yaml"
            ]
        );
    }

    #[test]
    fn test_spawned_snapshot_pattern() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "multirun/d/t/0/.hydra/config.yaml");
        touch(dir.path(), "multirun/d/t/0/.pl_ddp_hydra_a/config.yaml");
        touch(dir.path(), "multirun/d/t/1/.pl_ddp_hydra_b/config.yaml");

        let found = GlobArtifactScanner::new()
            .collect_sorted(dir.path(), "**/.pl_ddp_hydra_*/config.yaml")
            .unwrap();
        assert_eq!(found.len(), 2);
        assert!(found[0].ends_with("0/.pl_ddp_hydra_a/config.yaml"));
    }

    #[test]
    fn test_rescan_reflects_deletions() {
        let dir = tempfile::tempdir().unwrap();
        touch(dir.path(), "run/train_ddp_process_1.log");

        let scanner = GlobArtifactScanner::new();
        assert_eq!(
            scanner
                .discover(dir.path(), "**/train_ddp_process_*.log")
                .unwrap()
                .count(),
            1
        );

        fs::remove_dir_all(dir.path().join("run")).unwrap();
        assert_eq!(
            scanner
                .discover(dir.path(), "**/train_ddp_process_*.log")
                .unwrap()
                .count(),
            0
        );
    }

    #[test]
    fn test_root_with_glob_characters_is_literal() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("weird[1]");
        touch(&root, "x/config.yaml");

        let found = GlobArtifactScanner::new()
            .collect_sorted(&root, "**/config.yaml")
            .unwrap();
        assert_eq!(found.len(), 1);
    }

    #[test]
    fn test_rejects_absolute_and_malformed_patterns() {
        let scanner = GlobArtifactScanner::new();
        let root = Path::new("/tmp");
        assert!(matches!(
            scanner.discover(root, "/etc/*.conf"),
            Err(DiscoveryError::InvalidPattern { .. })
        ));
        assert!(matches!(
            scanner.discover(root, "***/x"),
            Err(DiscoveryError::InvalidPattern { .. })
        ));
    }
}
