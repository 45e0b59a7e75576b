//! Probe configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Liveness probe configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProbeConfig {
    /// Timeout for a single probe, in seconds
    #[serde(default = "default_probe_timeout")]
    pub timeout_secs: u64,
    /// Completion budget for a probe request
    #[serde(default = "default_probe_max_tokens")]
    pub max_tokens: u32,
    /// Prompt sent with the probe
    #[serde(default = "default_probe_prompt")]
    pub prompt: String,
    /// Interval for the periodic probe task, in seconds (0 disables)
    #[serde(default)]
    pub interval_secs: u64,
}

impl Default for ProbeConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_probe_timeout(),
            max_tokens: default_probe_max_tokens(),
            prompt: default_probe_prompt(),
            interval_secs: 0,
        }
    }
}
