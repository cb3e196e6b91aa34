// YAML config snapshot loader
use serde_json::Value;
use std::fs;
use std::path::Path;

use launchcheck_core::domain::ConfigSnapshot;
use launchcheck_core::port::{ConfigLoadError, ConfigLoader};

pub struct YamlConfigLoader;

impl YamlConfigLoader {
    /// Parse YAML text; the document must be a mapping (an empty document is an empty mapping)
    pub fn parse(path: &Path, content: &str) -> Result<ConfigSnapshot, ConfigLoadError> {
        let value: Value = serde_yaml::from_str(content).map_err(|e| ConfigLoadError::Parse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

        let value = match value {
            Value::Null => Value::Object(Default::default()),
            Value::Object(_) => value,
            other => {
                return Err(ConfigLoadError::Parse {
                    path: path.to_path_buf(),
                    message: format!("top-level document is not a mapping: {}", other),
                })
            }
        };

        Ok(ConfigSnapshot::new(path, value))
    }
}

impl ConfigLoader for YamlConfigLoader {
    fn load(&self, path: &Path) -> Result<ConfigSnapshot, ConfigLoadError> {
        let content = fs::read_to_string(path).map_err(|source| ConfigLoadError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(path, &content)
    }
}
