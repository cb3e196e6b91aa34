//! Layered settings: built-in defaults, optional config file, `LAUNCHCHECK_*` env vars

use anyhow::{Context, Result};
use config::{Config, Environment, File};
use launchcheck_core::application::constants::DEFAULT_INTERPRETER;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_FILE: &str = "launchcheck";
const DEFAULT_LOG_DIR: &str = "~/.launchcheck/logs";
const ENV_PREFIX: &str = "LAUNCHCHECK";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// Interpreter that runs the driver script
    pub interpreter: String,
    /// Driver script on disk; None = built-in training driver
    pub driver: Option<String>,
    pub timeout_secs: Option<u64>,
    pub keep_workspace: bool,
    /// Parent directory for workspaces; None = system temp dir
    pub workspace_dir: Option<String>,
    pub log_dir: String,
    /// "pretty" or "json"
    pub log_format: String,
}

impl Settings {
    /// `path` must exist when given; otherwise `./launchcheck.{toml,yaml,json}` is optional
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let file = match path {
            Some(path) => File::from(path).required(true),
            None => File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        Config::builder()
            .set_default("interpreter", DEFAULT_INTERPRETER)?
            .set_default("keep_workspace", false)?
            .set_default("log_dir", DEFAULT_LOG_DIR)?
            .set_default("log_format", "pretty")?
            .add_source(file)
            .add_source(Environment::with_prefix(ENV_PREFIX).try_parsing(true))
            .build()
            .context("Failed to load settings")?
            .try_deserialize()
            .context("Invalid settings")
    }

    pub fn driver_path(&self) -> Option<PathBuf> {
        self.driver.as_deref().map(expand)
    }

    pub fn workspace_path(&self) -> Option<PathBuf> {
        self.workspace_dir.as_deref().map(expand)
    }

    pub fn log_path(&self) -> PathBuf {
        expand(&self.log_dir)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}

fn expand(path: &str) -> PathBuf {
    PathBuf::from(shellexpand::tilde(path).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("launchcheck.toml");
        std::fs::write(
            &path,
            "interpreter = \"python3.11\"\ntimeout_secs = 900\nkeep_workspace = true\ndriver = \"~/drivers/ddp.py\"\n",
        )
        .unwrap();

        let settings = Settings::load(Some(&path)).unwrap();
        assert_eq!(settings.interpreter, "python3.11");
        assert_eq!(settings.timeout(), Some(Duration::from_secs(900)));
        assert!(settings.keep_workspace);
        assert_eq!(settings.log_format, "pretty");
        assert!(!settings
            .driver_path()
            .unwrap()
            .to_string_lossy()
            .starts_with('~'));
    }

    #[test]
    fn test_missing_explicit_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        assert!(Settings::load(Some(&dir.path().join("absent.toml"))).is_err());
    }
}
