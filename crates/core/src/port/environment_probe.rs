// Environment Probe Port
// Reports whether the host can run a real multi-device launch at all

use async_trait::async_trait;

/// Environment probe port for launch preconditions
#[async_trait]
pub trait EnvironmentProbe: Send + Sync {
    /// Number of visible GPUs (0 if none or the query tool is missing)
    async fn gpu_count(&self) -> u32;

    /// Whether `module` imports under the configured interpreter
    async fn module_available(&self, module: &str) -> bool;
}

// ============================================================================
// Mock Implementations for Testing
// ============================================================================

pub mod mocks {
    use super::*;

    pub struct MockEnvironmentProbe {
        gpus: u32,
        modules: Vec<String>,
    }

    impl MockEnvironmentProbe {
        pub fn new(gpus: u32, modules: &[&str]) -> Self {
            Self {
                gpus,
                modules: modules.iter().map(|m| m.to_string()).collect(),
            }
        }
    }

    #[async_trait]
    impl EnvironmentProbe for MockEnvironmentProbe {
        async fn gpu_count(&self) -> u32 {
            self.gpus
        }

        async fn module_available(&self, module: &str) -> bool {
            self.modules.iter().any(|m| m == module)
        }
    }
}
