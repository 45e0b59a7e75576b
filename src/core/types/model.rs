//! Model registry types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Capability tags a model may advertise
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ModelCapability {
    Vision,
    Tools,
    Streaming,
    JsonMode,
}

/// Per-token pricing as advertised upstream (cost per token, provider currency)
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelPricing {
    pub prompt: f64,
    pub completion: f64,
}

impl ModelPricing {
    pub fn is_free(&self) -> bool {
        self.prompt == 0.0 && self.completion == 0.0
    }
}

/// A model exposed by a provider
///
/// Instances are immutable snapshots: a sync replaces a provider's whole set
/// instead of editing entries in place.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LLMModel {
    /// Upstream model id
    pub id: String,
    /// Owning provider id
    pub provider_id: String,
    /// Display name
    pub name: String,
    /// Capability tags
    #[serde(default)]
    pub capabilities: Vec<ModelCapability>,
    /// Context window in tokens, when advertised
    #[serde(default)]
    pub context_window: Option<u32>,
    /// Pricing, when advertised
    #[serde(default)]
    pub pricing: Option<ModelPricing>,
    /// When this snapshot was taken
    pub discovered_at: DateTime<Utc>,
}

impl LLMModel {
    pub fn new(provider_id: impl Into<String>, id: impl Into<String>) -> Self {
        let id = id.into();
        Self {
            name: id.clone(),
            id,
            provider_id: provider_id.into(),
            capabilities: Vec::new(),
            context_window: None,
            pricing: None,
            discovered_at: Utc::now(),
        }
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_capability(mut self, capability: ModelCapability) -> Self {
        if !self.capabilities.contains(&capability) {
            self.capabilities.push(capability);
        }
        self
    }

    pub fn with_context_window(mut self, tokens: u32) -> Self {
        self.context_window = Some(tokens);
        self
    }

    pub fn with_pricing(mut self, pricing: ModelPricing) -> Self {
        self.pricing = Some(pricing);
        self
    }

    pub fn supports(&self, capability: ModelCapability) -> bool {
        self.capabilities.contains(&capability)
    }

    /// Zero-priced on both prompt and completion; unknown pricing is not free
    pub fn is_free(&self) -> bool {
        self.pricing.is_some_and(|p| p.is_free())
    }

    /// Key used for rate-limit accounting: `<provider_id>/<model_id>`
    pub fn qualified_id(&self) -> String {
        qualified_model_id(&self.provider_id, &self.id)
    }
}

/// Rate-limit key for a model served by a specific provider
pub fn qualified_model_id(provider_id: &str, model_id: &str) -> String {
    format!("{}/{}", provider_id, model_id)
}
