//! Runner configuration

use serde::{Deserialize, Serialize};

/// Configuration of a [`crate::DebugRunner`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RunnerConfig {
    /// Platform identifier the core connector reports to the program
    pub platform: String,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            platform: "rust-host".to_string(),
        }
    }
}

impl RunnerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}
