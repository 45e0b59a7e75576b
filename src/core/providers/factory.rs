//! Upstream client construction

use super::client::UpstreamClient;
use super::openai_compatible::OpenAiCompatibleClient;
use crate::config::ProviderConfig;
use crate::utils::error::{OrchestratorError, Result};
use std::sync::Arc;
use std::time::Duration;

/// Builds the upstream client for a provider row
///
/// The config handed in already carries resolved credentials.
pub trait ClientFactory: Send + Sync {
    fn build(&self, config: &ProviderConfig) -> Result<Arc<dyn UpstreamClient>>;
}

/// Factory producing [`OpenAiCompatibleClient`]s
#[derive(Debug, Clone, Copy, Default)]
pub struct HttpClientFactory;

impl ClientFactory for HttpClientFactory {
    fn build(&self, config: &ProviderConfig) -> Result<Arc<dyn UpstreamClient>> {
        let base_url = config.effective_base_url().ok_or_else(|| {
            OrchestratorError::provider_config(&config.id, "no base_url configured")
        })?;

        let client = OpenAiCompatibleClient::new(
            config.id.clone(),
            base_url,
            config.api_key.clone(),
            Duration::from_secs(config.timeout),
        )
        .map_err(|e| OrchestratorError::provider_config(&config.id, e.to_string()))?;

        Ok(Arc::new(client))
    }
}
