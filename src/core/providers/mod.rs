//! Upstream LLM API access
//!
//! The orchestrator only needs two calls from a provider: list the models it
//! serves and run a (probe-sized) chat completion. Both sit behind
//! [`UpstreamClient`] so the manager and probe service can be driven by
//! scripted clients in tests.

pub mod client;
pub mod decode;
pub mod error;
pub mod factory;
pub mod openai_compatible;

pub use client::{
    ChatMessage, CompletionRequest, CompletionResponse, MessageRole, UpstreamClient, Usage,
};
pub use decode::parse_model_list;
pub use error::UpstreamError;
pub use factory::{ClientFactory, HttpClientFactory};
pub use openai_compatible::OpenAiCompatibleClient;
