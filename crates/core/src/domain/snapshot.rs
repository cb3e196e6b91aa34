// Config Snapshot
// Resolved configuration one spawned process recorded on disk

use serde_json::Value;
use std::path::{Path, PathBuf};

/// Parsed snapshot: the file it came from and its nested mapping
#[derive(Debug, Clone, PartialEq)]
pub struct ConfigSnapshot {
    path: PathBuf,
    values: Value,
}

impl ConfigSnapshot {
    pub fn new(path: impl AsRef<Path>, values: Value) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            values,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up a dotted key (`hydra.job.name`) in the nested mapping
    pub fn get(&self, key: &str) -> Option<&Value> {
        key.split('.')
            .try_fold(&self.values, |node, segment| node.get(segment))
    }

    pub fn get_i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(Value::as_i64)
    }

    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_lookup() {
        let snapshot = ConfigSnapshot::new(
            "config.yaml",
            json!({"devices": 2, "strategy": "ddp", "hydra": {"job": {"name": "temp"}}}),
        );

        assert_eq!(snapshot.get_i64("devices"), Some(2));
        assert_eq!(snapshot.get_str("strategy"), Some("ddp"));
        assert_eq!(snapshot.get_str("hydra.job.name"), Some("temp"));
        assert_eq!(snapshot.get("hydra.job.missing"), None);
        assert_eq!(snapshot.get_i64("strategy"), None);
    }
}
