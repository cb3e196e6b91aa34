// Driver Script
// Program file written into the workspace and executed as the child process

use super::error::{DomainError, Result};

/// File name the training driver is written under
pub const DEFAULT_DRIVER_FILE_NAME: &str = "temp.py";

const TRAINING_DRIVER_BODY: &str = include_str!("../../fixtures/train_ddp_driver.py");

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DriverScript {
    file_name: String,
    body: String,
}

impl DriverScript {
    /// Script body is taken as-is; `file_name` must be a bare file name
    pub fn new(file_name: impl Into<String>, body: impl Into<String>) -> Result<Self> {
        let file_name = file_name.into();
        if file_name.is_empty()
            || file_name.contains(['/', '\\'])
            || file_name == "."
            || file_name == ".."
        {
            return Err(DomainError::ValidationError(format!(
                "driver file name must be a bare file name, got {:?}",
                file_name
            )));
        }
        Ok(Self {
            file_name,
            body: body.into(),
        })
    }

    /// Checked-in DDP training driver (Hydra entry point, fast_dev_run)
    pub fn training() -> Self {
        Self {
            file_name: DEFAULT_DRIVER_FILE_NAME.to_string(),
            body: TRAINING_DRIVER_BODY.to_string(),
        }
    }

    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    pub fn body(&self) -> &str {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_training_driver_fixture() {
        let driver = DriverScript::training();
        assert_eq!(driver.file_name(), "temp.py");
        assert!(driver.body().contains("@hydra.main"));
        assert!(driver.body().contains("LOCAL_RANK"));
    }

    #[test]
    fn test_rejects_nested_file_name() {
        assert!(DriverScript::new("sub/run.sh", "exit 0").is_err());
        assert!(DriverScript::new("", "exit 0").is_err());
        assert!(DriverScript::new("run.sh", "exit 0").is_ok());
    }
}
