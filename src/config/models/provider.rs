//! Provider configuration

use super::*;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upstream provider family
///
/// Determines the default base URL and the environment variable consulted for
/// credentials. Every family is spoken to through the OpenAI-compatible API.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderType {
    OpenAI,
    OpenRouter,
    Groq,
    Nvidia,
    Cerebras,
    Mistral,
    Google,
    Ollama,
    /// Any other OpenAI-compatible endpoint; `base_url` is mandatory
    #[serde(other)]
    Custom,
}

impl ProviderType {
    /// Lowercase name used in ids, logs and serialized configs
    pub fn as_str(&self) -> &'static str {
        match self {
            ProviderType::OpenAI => "openai",
            ProviderType::OpenRouter => "openrouter",
            ProviderType::Groq => "groq",
            ProviderType::Nvidia => "nvidia",
            ProviderType::Cerebras => "cerebras",
            ProviderType::Mistral => "mistral",
            ProviderType::Google => "google",
            ProviderType::Ollama => "ollama",
            ProviderType::Custom => "custom",
        }
    }

    /// Default API base for this provider family
    pub fn default_base_url(&self) -> Option<&'static str> {
        match self {
            ProviderType::OpenAI => Some("https://api.openai.com/v1"),
            ProviderType::OpenRouter => Some("https://openrouter.ai/api/v1"),
            ProviderType::Groq => Some("https://api.groq.com/openai/v1"),
            ProviderType::Nvidia => Some("https://integrate.api.nvidia.com/v1"),
            ProviderType::Cerebras => Some("https://api.cerebras.ai/v1"),
            ProviderType::Mistral => Some("https://api.mistral.ai/v1"),
            ProviderType::Google => {
                Some("https://generativelanguage.googleapis.com/v1beta/openai")
            }
            ProviderType::Ollama => Some(OLLAMA_DEFAULT_HOST),
            ProviderType::Custom => None,
        }
    }

    /// Environment variable holding the API key for this family
    pub fn api_key_env(&self) -> Option<&'static str> {
        match self {
            ProviderType::OpenAI => Some("OPENAI_API_KEY"),
            ProviderType::OpenRouter => Some("OPENROUTER_API_KEY"),
            ProviderType::Groq => Some("GROQ_API_KEY"),
            ProviderType::Nvidia => Some("NVIDIA_API_KEY"),
            ProviderType::Cerebras => Some("CEREBRAS_API_KEY"),
            ProviderType::Mistral => Some("MISTRAL_API_KEY"),
            ProviderType::Google => Some("GOOGLE_GENERATIVE_AI_API_KEY"),
            ProviderType::Ollama => Some("OLLAMA_API_KEY"),
            ProviderType::Custom => None,
        }
    }

    /// Local runtimes serve without credentials
    pub fn requires_api_key(&self) -> bool {
        !matches!(self, ProviderType::Ollama)
    }
}

impl fmt::Display for ProviderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A model a provider is declared to serve, with its rate-limit budget
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ModelDeclaration {
    /// Upstream model id (e.g. "llama-3.1-8b-instant")
    pub id: String,
    /// Model class this model can serve (e.g. "fast"); the id always matches too
    #[serde(default)]
    pub class: Option<String>,
    /// Rate-limit budget for this model on this provider
    #[serde(default)]
    pub limits: RateLimits,
}

impl ModelDeclaration {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            class: None,
            limits: RateLimits::default(),
        }
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.class = Some(class.into());
        self
    }

    pub fn with_limits(mut self, limits: RateLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Whether this declaration serves requests for `model_class`
    pub fn serves(&self, model_class: &str) -> bool {
        self.id == model_class || self.class.as_deref() == Some(model_class)
    }
}

/// Provider configuration
#[derive(Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderConfig {
    /// Stable, unique identifier
    pub id: String,
    /// Human readable label
    pub label: String,
    /// Provider family
    pub provider_type: ProviderType,
    /// API base; falls back to the family default
    #[serde(default)]
    pub base_url: Option<String>,
    /// API key; never logged
    #[serde(default, skip_serializing)]
    pub api_key: Option<String>,
    /// Models this provider is declared to serve
    #[serde(default)]
    pub models: Vec<ModelDeclaration>,
    /// Request timeout in seconds
    #[serde(default = "default_timeout")]
    pub timeout: u64,
    /// Whether provider is enabled
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl ProviderConfig {
    pub fn new(
        id: impl Into<String>,
        label: impl Into<String>,
        provider_type: ProviderType,
    ) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            provider_type,
            base_url: None,
            api_key: None,
            models: Vec::new(),
            timeout: default_timeout(),
            enabled: true,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn with_model(mut self, model: ModelDeclaration) -> Self {
        self.models.push(model);
        self
    }

    /// Configured base URL, or the family default
    pub fn effective_base_url(&self) -> Option<String> {
        self.base_url
            .clone()
            .filter(|url| !url.trim().is_empty())
            .or_else(|| self.provider_type.default_base_url().map(str::to_string))
    }

    /// Declared models that serve `model_class`, in declaration order
    pub fn models_serving<'a>(
        &'a self,
        model_class: &'a str,
    ) -> impl Iterator<Item = &'a ModelDeclaration> + 'a {
        self.models.iter().filter(move |m| m.serves(model_class))
    }
}

impl fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("id", &self.id)
            .field("label", &self.label)
            .field("provider_type", &self.provider_type)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("models", &self.models)
            .field("timeout", &self.timeout)
            .field("enabled", &self.enabled)
            .finish()
    }
}
