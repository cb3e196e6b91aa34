// Harness constants (no magic values)

use std::time::Duration;

/// Rank variables stripped from the child's inherited environment so a leaked
/// parent value cannot satisfy or break the driver's own teardown check
pub const CLEARED_ENV_VARS: [&str; 3] = ["LOCAL_RANK", "NODE_RANK", "WORLD_SIZE"];

/// Grace period between SIGTERM and SIGKILL when a run times out
pub const GRACEFUL_SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(5);

/// Minimum visible GPUs for a real multi-device launch
pub const MIN_GPUS: u32 = 2;

/// Modules the training driver imports besides the framework itself
pub const REQUIRED_MODULES: [&str; 1] = ["hydra"];

/// Default interpreter for the driver script
pub const DEFAULT_INTERPRETER: &str = "python3";

/// Tool used to enumerate GPUs
pub const GPU_QUERY_PROGRAM: &str = "nvidia-smi";
