//! Core functionality for the orchestrator
//!
//! This module contains the provider lifecycle, health and rate-limit state,
//! liveness probing and the upstream client seam.

pub mod health; // Provider cooldowns and probe backoff
pub mod manager; // Provider cache, selection, sync and probing policy
pub mod probe; // Single-flight liveness probes
pub mod providers; // Upstream client abstraction
pub mod rate_limiter; // Per-model rpm/tpm/rpd accounting
pub mod types;

pub use health::HealthTracker;
pub use manager::{ProviderManager, Selection, SyncReport};
pub use probe::{ProbeOutcome, ProbeService};
pub use rate_limiter::RateLimiter;
