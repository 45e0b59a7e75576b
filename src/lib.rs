//! # LLM Orchestrator
//!
//! Provider orchestration core for LLM gateways. It keeps a set of
//! OpenAI-compatible upstream providers usable: providers that fail are
//! cooled down, per-model request and token budgets are enforced, cheap
//! liveness probes confirm recovery, and each provider's model list is
//! reconciled into a registry.
//!
//! ## Features
//!
//! - **Health cooldowns**: time-bounded unhealthy marks, longest expiry wins
//! - **Rate limiting**: requests per minute, tokens per minute and requests per day, per model
//! - **Probing**: single-flight liveness checks with escalating backoff
//! - **Selection**: first healthy provider/model pair with remaining budget
//! - **Registry sync**: per-provider model lists with free-only filtering
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use llm_orchestrator::{Config, ProviderManager};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::from_file("config/orchestrator.yaml").await?;
//!     let manager = ProviderManager::from_config(config.orchestrator);
//!     manager.initialize().await?;
//!
//!     let selection = manager.select("fast", 500)?;
//!     println!("Routing to {}/{}", selection.provider_id, selection.model_id);
//!     manager.record_usage(&selection, 480);
//!     Ok(())
//! }
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_inception)]

pub mod config;
pub mod core;
pub mod storage;
pub mod utils;

// Re-export main types
pub use config::{Config, OrchestratorConfig, ProviderConfig, ProviderType, RateLimits};
pub use utils::error::{OrchestratorError, Result};

pub use core::health::{CooldownReason, HealthTracker};
pub use core::manager::{ProviderManager, Selection, SyncReport};
pub use core::probe::{ProbeOutcome, ProbeService};
pub use core::providers::{UpstreamClient, UpstreamError};
pub use core::rate_limiter::{LimitKind, RateLimitDecision, RateLimiter};
pub use core::types::{LLMModel, ModelCapability, ModelPricing, ProviderStatus};
pub use storage::{InMemoryModelRegistry, InMemoryProviderStore, ModelRegistry, ProviderStore};

// Version information
/// Current version of the crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
/// Name of the crate
pub const NAME: &str = env!("CARGO_PKG_NAME");
/// Description of the crate
pub const DESCRIPTION: &str = env!("CARGO_PKG_DESCRIPTION");

/// Orchestrator build information
#[derive(Debug, Clone)]
pub struct BuildInfo {
    /// Version number
    pub version: &'static str,
    /// `git describe` of the source tree
    pub git_commit: &'static str,
    /// Compiler that built the crate
    pub rustc: &'static str,
}

impl Default for BuildInfo {
    fn default() -> Self {
        Self {
            version: VERSION,
            git_commit: option_env!("ORCHESTRATOR_GIT_COMMIT").unwrap_or("unknown"),
            rustc: option_env!("ORCHESTRATOR_RUSTC").unwrap_or("unknown"),
        }
    }
}

/// Build information embedded at compile time
pub fn build_info() -> BuildInfo {
    BuildInfo::default()
}
