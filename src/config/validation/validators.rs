//! Validators for the orchestrator configuration

use super::trait_def::Validate;
use crate::config::models::*;
use std::collections::HashSet;
use tracing::debug;
use url::Url;

impl Validate for OrchestratorConfig {
    fn validate(&self) -> Result<(), String> {
        debug!("Validating orchestrator configuration");

        let mut seen = HashSet::new();
        for provider in &self.providers {
            if !seen.insert(provider.id.as_str()) {
                return Err(format!("Duplicate provider id: {}", provider.id));
            }
        }

        self.health.validate()?;
        self.probe.validate()?;
        self.sync.validate()?;

        Ok(())
    }
}

/// Provider rows are validated individually so that one bad row only
/// disables that provider.
impl Validate for ProviderConfig {
    fn validate(&self) -> Result<(), String> {
        if self.id.trim().is_empty() {
            return Err("Provider id cannot be empty".to_string());
        }

        if self.timeout == 0 {
            return Err(format!("Provider {} timeout must be greater than 0", self.id));
        }

        match self.effective_base_url() {
            Some(base_url) => {
                let url = Url::parse(&base_url)
                    .map_err(|e| format!("Provider {} has invalid base_url: {}", self.id, e))?;
                if !matches!(url.scheme(), "http" | "https") {
                    return Err(format!(
                        "Provider {} base_url must use http:// or https://, got: {}",
                        self.id,
                        url.scheme()
                    ));
                }
            }
            None => {
                return Err(format!(
                    "Provider {} of type {} requires a base_url",
                    self.id, self.provider_type
                ));
            }
        }

        let mut model_ids = HashSet::new();
        for model in &self.models {
            if model.id.trim().is_empty() {
                return Err(format!("Provider {} declares a model with empty id", self.id));
            }
            if !model_ids.insert(model.id.as_str()) {
                return Err(format!(
                    "Provider {} declares model {} twice",
                    self.id, model.id
                ));
            }
        }

        Ok(())
    }
}

impl Validate for HealthConfig {
    fn validate(&self) -> Result<(), String> {
        self.backoff.validate()
    }
}

impl Validate for BackoffConfig {
    fn validate(&self) -> Result<(), String> {
        if self.base_secs == 0 {
            return Err("Backoff base must be greater than 0".to_string());
        }

        if self.max_secs < self.base_secs {
            return Err("Backoff max must not be smaller than base".to_string());
        }

        if self.multiplier < 1.0 {
            return Err("Backoff multiplier must be at least 1.0".to_string());
        }

        Ok(())
    }
}

impl Validate for ProbeConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("Probe timeout must be greater than 0".to_string());
        }

        if self.max_tokens == 0 {
            return Err("Probe max_tokens must be greater than 0".to_string());
        }

        Ok(())
    }
}

impl Validate for SyncConfig {
    fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("Sync timeout must be greater than 0".to_string());
        }

        Ok(())
    }
}
