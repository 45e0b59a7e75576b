//! Shared data model

pub mod model;
pub mod provider;

pub use model::{LLMModel, ModelCapability, ModelPricing, qualified_model_id};
pub use provider::ProviderStatus;
