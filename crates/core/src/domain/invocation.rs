// Invocation Domain Model
// Typed command line for the driver script: interpreter, script, overrides

use super::error::{DomainError, Result};
use std::fmt;
use std::path::{Path, PathBuf};

/// Flag that asks the configuration tool to expand sweeps into one job per value
pub const MULTIRUN_FLAG: &str = "--multirun";

/// A single configuration override token
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Override {
    /// Adds a key that is not in the base config: `+key=value`
    Append { key: String, value: String },
    /// Replaces an existing key: `key=value`
    Set { key: String, value: String },
    /// Adds a key with a comma-separated value list: `+key=v0,v1,...`
    Sweep { key: String, values: Vec<String> },
}

impl Override {
    pub fn append(key: impl Into<String>, value: impl ToString) -> Result<Self> {
        let key = validate_key(key.into())?;
        Ok(Override::Append {
            key,
            value: value.to_string(),
        })
    }

    pub fn set(key: impl Into<String>, value: impl ToString) -> Result<Self> {
        let key = validate_key(key.into())?;
        Ok(Override::Set {
            key,
            value: value.to_string(),
        })
    }

    /// Quoted string value, e.g. `+strategy="ddp"`
    pub fn append_quoted(key: impl Into<String>, value: &str) -> Result<Self> {
        Self::append(key, format!("\"{}\"", value))
    }

    pub fn sweep<I, V>(key: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = V>,
        V: ToString,
    {
        let key = validate_key(key.into())?;
        let values: Vec<String> = values.into_iter().map(|v| v.to_string()).collect();
        if values.is_empty() {
            return Err(DomainError::ValidationError(format!(
                "sweep over '{}' needs at least one value",
                key
            )));
        }
        Ok(Override::Sweep { key, values })
    }
}

impl fmt::Display for Override {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Override::Append { key, value } => write!(f, "+{}={}", key, value),
            Override::Set { key, value } => write!(f, "{}={}", key, value),
            Override::Sweep { key, values } => write!(f, "+{}={}", key, values.join(",")),
        }
    }
}

fn validate_key(key: String) -> Result<String> {
    let valid = !key.is_empty()
        && !key.starts_with('+')
        && key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-'));
    if valid {
        Ok(key)
    } else {
        Err(DomainError::InvalidOverrideKey(key))
    }
}

/// Full command line for one driver run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub program: String,
    pub script: PathBuf,
    pub overrides: Vec<Override>,
    pub multirun: bool,
}

impl Invocation {
    pub fn new(program: impl Into<String>, script: impl AsRef<Path>) -> Self {
        Self {
            program: program.into(),
            script: script.as_ref().to_path_buf(),
            overrides: Vec::new(),
            multirun: false,
        }
    }

    pub fn with_override(mut self, ov: Override) -> Self {
        self.overrides.push(ov);
        self
    }

    pub fn with_multirun(mut self, multirun: bool) -> Self {
        self.multirun = multirun;
        self
    }

    /// Arguments passed to `program`, in order
    pub fn args(&self) -> Vec<String> {
        let mut args = Vec::with_capacity(self.overrides.len() + 2);
        args.push(self.script.to_string_lossy().into_owned());
        args.extend(self.overrides.iter().map(|o| o.to_string()));
        if self.multirun {
            args.push(MULTIRUN_FLAG.to_string());
        }
        args
    }
}
