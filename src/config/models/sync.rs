//! Model registry sync configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Model list fetch and registry sync configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncConfig {
    /// Timeout for a single provider's model list fetch, in seconds
    #[serde(default = "default_sync_timeout")]
    pub timeout_secs: u64,
    /// Provider types whose registry rows are limited to zero-priced models
    #[serde(default = "default_free_only")]
    pub free_only: Vec<ProviderType>,
    /// Remove registry rows of providers that are no longer configured
    #[serde(default = "default_true")]
    pub prune_missing_providers: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_sync_timeout(),
            free_only: default_free_only(),
            prune_missing_providers: true,
        }
    }
}
