//! Test fixtures and data factories
//!
//! Provides factory methods for creating test data with sensible defaults.
//! All factories create real objects, not mocks.

use llm_orchestrator::config::{ModelDeclaration, OrchestratorConfig};
use llm_orchestrator::{
    InMemoryModelRegistry, InMemoryProviderStore, ProviderConfig, ProviderManager, ProviderType,
    RateLimits,
};
use serde_json::{Value, json};
use std::sync::Arc;

/// Factory for creating provider rows
pub struct ProviderFactory;

impl ProviderFactory {
    /// A custom OpenAI-compatible provider with a stored key
    pub fn custom(id: &str, base_url: &str) -> ProviderConfig {
        Self::typed(id, ProviderType::Custom, base_url)
    }

    /// A provider of the given family pointed at `base_url`
    pub fn typed(id: &str, provider_type: ProviderType, base_url: &str) -> ProviderConfig {
        ProviderConfig::new(id, format!("{} (Test)", id), provider_type)
            .with_base_url(base_url)
            .with_api_key(format!("{}-test-key", id))
    }

    /// A model declaration serving `class` within `limits`
    pub fn model(id: &str, class: &str, limits: RateLimits) -> ModelDeclaration {
        ModelDeclaration::new(id).with_class(class).with_limits(limits)
    }
}

/// Factory for orchestrator configurations
pub struct ConfigFactory;

impl ConfigFactory {
    /// Configuration with short timeouts suitable for tests
    pub fn with_providers(providers: Vec<ProviderConfig>) -> OrchestratorConfig {
        let mut config = OrchestratorConfig {
            providers,
            ..OrchestratorConfig::default()
        };
        config.probe.timeout_secs = 2;
        config.sync.timeout_secs = 2;
        config
    }

    /// Manager over in-memory storage that ignores the process environment
    pub fn manager(config: OrchestratorConfig) -> ProviderManager {
        let store = InMemoryProviderStore::from_configs(config.providers.clone());
        ProviderManager::new(
            config,
            Arc::new(store),
            Arc::new(InMemoryModelRegistry::new()),
        )
        .with_env(|_| None)
    }
}

/// Factory for upstream `/models` bodies
pub struct ModelListFactory;

impl ModelListFactory {
    /// OpenAI-style list of plain model ids
    pub fn openai(ids: &[&str]) -> Value {
        let data: Vec<_> = ids
            .iter()
            .map(|id| json!({ "id": id, "object": "model", "owned_by": "test" }))
            .collect();
        json!({ "object": "list", "data": data })
    }

    /// OpenRouter-style list with per-token prices as strings
    pub fn priced(entries: &[(&str, &str)]) -> Value {
        let data: Vec<_> = entries
            .iter()
            .map(|(id, price)| {
                json!({
                    "id": id,
                    "name": id,
                    "context_length": 8192,
                    "pricing": { "prompt": price, "completion": price }
                })
            })
            .collect();
        json!({ "data": data })
    }
}

/// A minimal successful chat completion body
pub fn completion_body(model: &str) -> Value {
    json!({
        "id": "chatcmpl-test",
        "object": "chat.completion",
        "model": model,
        "choices": [{
            "index": 0,
            "message": { "role": "assistant", "content": "pong" },
            "finish_reason": "stop"
        }],
        "usage": { "prompt_tokens": 1, "completion_tokens": 1, "total_tokens": 2 }
    })
}
