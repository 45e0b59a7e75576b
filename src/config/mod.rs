//! Configuration management for the orchestrator
//!
//! Configuration is read from YAML, optionally overridden from
//! `ORCHESTRATOR_*` environment variables, and validated before use.

pub mod models;
pub mod validation;

pub use models::*;
pub use validation::Validate;

use crate::utils::error::{OrchestratorError, Result};
use std::env;
use std::path::Path;
use tracing::{debug, info};

/// Environment variable naming the configuration file
pub const CONFIG_PATH_ENV: &str = "ORCHESTRATOR_CONFIG";

/// Main configuration struct
#[derive(Debug, Clone, Default)]
pub struct Config {
    /// Orchestrator configuration
    pub orchestrator: OrchestratorConfig,
}

impl Config {
    /// Load configuration from a YAML file
    pub async fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading configuration from: {:?}", path);

        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| OrchestratorError::Config(format!("Failed to read config file: {}", e)))?;

        let config = Self::from_yaml(&content)?;
        debug!("Configuration loaded successfully");
        Ok(config)
    }

    /// Parse and validate configuration from a YAML string
    pub fn from_yaml(content: &str) -> Result<Self> {
        let orchestrator: OrchestratorConfig = serde_yaml::from_str(content)
            .map_err(|e| OrchestratorError::Config(format!("Failed to parse config: {}", e)))?;

        let config = Self { orchestrator };
        config.validate()?;
        Ok(config)
    }

    /// Build configuration from defaults plus environment overrides
    pub fn from_env() -> Result<Self> {
        info!("Loading configuration from environment variables");

        let mut config = Self::default();
        config.apply_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `ORCHESTRATOR_*` overrides on top of the current values
    pub fn apply_env_overrides(&mut self) -> Result<()> {
        let orchestrator = &mut self.orchestrator;

        if let Some(value) = env_u64("ORCHESTRATOR_DEFAULT_COOLDOWN_SECS")? {
            orchestrator.health.default_cooldown_secs = value;
        }
        if let Some(value) = env_u64("ORCHESTRATOR_PROBE_TIMEOUT_SECS")? {
            orchestrator.probe.timeout_secs = value;
        }
        if let Some(value) = env_u64("ORCHESTRATOR_PROBE_INTERVAL_SECS")? {
            orchestrator.probe.interval_secs = value;
        }
        if let Some(value) = env_u64("ORCHESTRATOR_SYNC_TIMEOUT_SECS")? {
            orchestrator.sync.timeout_secs = value;
        }
        if let Ok(value) = env::var("ORCHESTRATOR_BOOTSTRAP_FROM_ENV") {
            orchestrator.bootstrap_from_env = value.parse().map_err(|e| {
                OrchestratorError::Config(format!("Invalid ORCHESTRATOR_BOOTSTRAP_FROM_ENV: {}", e))
            })?;
        }

        if let Ok(value) = env::var("ORCHESTRATOR_DETECT_LOCAL_OLLAMA") {
            orchestrator.detect_local_ollama = value.parse().map_err(|e| {
                OrchestratorError::Config(format!("Invalid ORCHESTRATOR_DETECT_LOCAL_OLLAMA: {}", e))
            })?;
        }

        Ok(())
    }

    /// Get provider rows
    pub fn providers(&self) -> &[ProviderConfig] {
        &self.orchestrator.providers
    }

    /// Get health configuration
    pub fn health(&self) -> &HealthConfig {
        &self.orchestrator.health
    }

    /// Get probe configuration
    pub fn probe(&self) -> &ProbeConfig {
        &self.orchestrator.probe
    }

    /// Get sync configuration
    pub fn sync(&self) -> &SyncConfig {
        &self.orchestrator.sync
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<()> {
        self.orchestrator
            .validate()
            .map_err(|e| OrchestratorError::Config(format!("Invalid configuration: {}", e)))
    }

    /// Convert to YAML string; API keys are never serialized
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(&self.orchestrator)?)
    }
}

fn env_u64(key: &str) -> Result<Option<u64>> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e| OrchestratorError::Config(format!("Invalid {}: {}", key, e))),
        Err(_) => Ok(None),
    }
}
