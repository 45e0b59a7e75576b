//! Health tracking configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Escalating cooldown policy for repeated failures
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BackoffConfig {
    /// Cooldown after the first failure, in seconds
    #[serde(default = "default_backoff_base")]
    pub base_secs: u64,
    /// Upper bound for the cooldown, in seconds
    #[serde(default = "default_backoff_max")]
    pub max_secs: u64,
    /// Growth factor applied per consecutive failure
    #[serde(default = "default_backoff_multiplier")]
    pub multiplier: f64,
}

impl Default for BackoffConfig {
    fn default() -> Self {
        Self {
            base_secs: default_backoff_base(),
            max_secs: default_backoff_max(),
            multiplier: default_backoff_multiplier(),
        }
    }
}

/// Health tracking configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthConfig {
    /// Cooldown applied when a live call fails without a more specific policy
    #[serde(default = "default_cooldown")]
    pub default_cooldown_secs: u64,
    /// Backoff for probe failures
    #[serde(default)]
    pub backoff: BackoffConfig,
    /// Interval between sweeps of expired entries, in seconds (0 disables)
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            default_cooldown_secs: default_cooldown(),
            backoff: BackoffConfig::default(),
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}
