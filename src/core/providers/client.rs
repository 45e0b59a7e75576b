//! Upstream client trait and request/response types

use super::error::UpstreamError;
use crate::core::types::LLMModel;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt::Debug;

/// Chat message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    System,
    User,
    Assistant,
}

/// Single chat message
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }
}

/// Chat completion request in the OpenAI wire shape
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

impl CompletionRequest {
    /// Cheapest request that still exercises the completion path
    pub fn probe(model: impl Into<String>, prompt: impl Into<String>, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            messages: vec![ChatMessage::user(prompt)],
            max_tokens: Some(max_tokens),
            temperature: Some(0.0),
        }
    }
}

/// Token accounting reported by the upstream
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Usage {
    #[serde(default)]
    pub prompt_tokens: u64,
    #[serde(default)]
    pub completion_tokens: u64,
    #[serde(default)]
    pub total_tokens: u64,
}

/// Chat completion response, reduced to what the orchestrator consumes
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionResponse {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub model: String,
    /// Text of the first choice
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub usage: Option<Usage>,
}

/// Network collaborator for one provider
///
/// Implementations hold the provider's base URL and credential. Every call
/// is expected to finish or fail within the provider's configured timeout;
/// callers add their own bound on top.
#[async_trait]
pub trait UpstreamClient: Send + Sync + Debug {
    /// Id of the provider this client talks to
    fn provider_id(&self) -> &str;

    /// Models currently served by the provider
    async fn list_models(&self) -> Result<Vec<LLMModel>, UpstreamError>;

    /// Run a chat completion
    async fn complete(&self, request: CompletionRequest)
    -> Result<CompletionResponse, UpstreamError>;
}
