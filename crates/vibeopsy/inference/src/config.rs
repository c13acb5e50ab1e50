//! Configuration for the remote inference endpoint.

use serde::{Deserialize, Serialize};

/// Remote inference configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Route scans to the remote endpoint instead of the synthetic engine
    #[serde(default)]
    pub enabled: bool,

    /// Full URL of the inference route
    #[serde(default = "default_endpoint")]
    pub endpoint: String,

    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Honour HTTP(S)_PROXY from the environment
    #[serde(default)]
    pub use_system_proxy: bool,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            endpoint: default_endpoint(),
            timeout_secs: default_timeout(),
            use_system_proxy: false,
        }
    }
}

fn default_endpoint() -> String {
    "http://127.0.0.1:8000/inference".to_string()
}

fn default_timeout() -> u64 {
    60
}
