//! Top-level orchestrator configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Orchestrator configuration as read from YAML
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrchestratorConfig {
    /// Provider rows seeding the provider store
    #[serde(default)]
    pub providers: Vec<ProviderConfig>,
    /// Health tracking
    #[serde(default)]
    pub health: HealthConfig,
    /// Liveness probes
    #[serde(default)]
    pub probe: ProbeConfig,
    /// Registry sync
    #[serde(default)]
    pub sync: SyncConfig,
    /// Rate limiter housekeeping
    #[serde(default)]
    pub rate_limit: RateLimitConfig,
    /// Create provider rows from well-known API key variables on initialize
    #[serde(default)]
    pub bootstrap_from_env: bool,
    /// Register a local Ollama instance on initialize when one answers
    #[serde(default)]
    pub detect_local_ollama: bool,
}
