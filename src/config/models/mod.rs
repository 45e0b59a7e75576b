//! Configuration data models

pub mod health;
pub mod orchestrator;
pub mod probe;
pub mod provider;
pub mod rate_limit;
pub mod sync;

pub use health::*;
pub use orchestrator::*;
pub use probe::*;
pub use provider::*;
pub use rate_limit::*;
pub use sync::*;

/// Local Ollama endpoint used when none is configured
pub const OLLAMA_DEFAULT_HOST: &str = "http://localhost:11434/v1";

/// Default request timeout in seconds
pub fn default_timeout() -> u64 {
    30
}

pub fn default_true() -> bool {
    true
}

/// Default cooldown for failed live calls, in seconds
pub fn default_cooldown() -> u64 {
    60
}

pub fn default_backoff_base() -> u64 {
    30
}

pub fn default_backoff_max() -> u64 {
    30 * 60
}

pub fn default_backoff_multiplier() -> f64 {
    2.0
}

pub fn default_sweep_interval() -> u64 {
    300
}

pub fn default_probe_timeout() -> u64 {
    10
}

pub fn default_probe_max_tokens() -> u32 {
    1
}

pub fn default_probe_prompt() -> String {
    "ping".to_string()
}

pub fn default_sync_timeout() -> u64 {
    30
}

pub fn default_free_only() -> Vec<ProviderType> {
    vec![ProviderType::OpenRouter]
}
