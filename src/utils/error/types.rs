//! Error types for the orchestrator

use crate::core::providers::UpstreamError;
use thiserror::Error;

/// Result type alias for the orchestrator
pub type Result<T> = std::result::Result<T, OrchestratorError>;

/// Main error type for the orchestrator
///
/// Rate limit rejections and cooldowns are normally reported as structured
/// results by the checks themselves. The `AdmissionRejected` and
/// `ProviderUnhealthy` variants exist for callers that want to bubble those
/// outcomes up with `?`.
#[derive(Error, Debug)]
pub enum OrchestratorError {
    /// Configuration errors affecting the whole orchestrator
    #[error("Configuration error: {0}")]
    Config(String),

    /// Missing or invalid configuration for a single provider
    #[error("Configuration error for provider {provider}: {message}")]
    ProviderConfiguration { provider: String, message: String },

    /// A configured rate limit would be exceeded
    #[error("Rate limit exceeded for model {model}: {limit}")]
    AdmissionRejected { model: String, limit: String },

    /// The provider is cooling down after a failure
    #[error("Provider {0} is cooling down")]
    ProviderUnhealthy(String),

    /// A liveness probe failed
    #[error("Probe failed for {provider}/{model}: {message}")]
    ProbeFailure {
        provider: String,
        model: String,
        message: String,
    },

    /// Selection exhausted every candidate
    #[error(
        "No eligible provider for model {model} ({unhealthy} cooling down, {rate_limited} rate limited)"
    )]
    NoEligibleProvider {
        model: String,
        unhealthy: usize,
        rate_limited: usize,
    },

    /// Provider not present in the cache
    #[error("Provider not found: {0}")]
    ProviderNotFound(String),

    /// Upstream API errors
    #[error("Upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    /// Provider store or model registry errors
    #[error("Store error: {0}")]
    Store(String),

    /// HTTP client errors
    #[error("HTTP client error: {0}")]
    HttpClient(#[from] reqwest::Error),

    /// Serialization errors
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// YAML parsing errors
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl OrchestratorError {
    /// Build a configuration error scoped to one provider
    pub fn provider_config(provider: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ProviderConfiguration {
            provider: provider.into(),
            message: message.into(),
        }
    }

    /// Whether the caller can recover by trying another provider or backing off
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            OrchestratorError::AdmissionRejected { .. }
                | OrchestratorError::ProviderUnhealthy(_)
                | OrchestratorError::ProbeFailure { .. }
        ) || matches!(self, OrchestratorError::Upstream(e) if e.is_retryable())
    }

    /// Short machine-readable error kind, used in log fields
    pub fn kind(&self) -> &'static str {
        match self {
            OrchestratorError::Config(_) => "config",
            OrchestratorError::ProviderConfiguration { .. } => "provider_configuration",
            OrchestratorError::AdmissionRejected { .. } => "admission_rejected",
            OrchestratorError::ProviderUnhealthy(_) => "provider_unhealthy",
            OrchestratorError::ProbeFailure { .. } => "probe_failure",
            OrchestratorError::NoEligibleProvider { .. } => "no_eligible_provider",
            OrchestratorError::ProviderNotFound(_) => "provider_not_found",
            OrchestratorError::Upstream(_) => "upstream",
            OrchestratorError::Store(_) => "store",
            OrchestratorError::HttpClient(_) => "http_client",
            OrchestratorError::Serialization(_) => "serialization",
            OrchestratorError::Yaml(_) => "yaml",
            OrchestratorError::Io(_) => "io",
        }
    }
}
