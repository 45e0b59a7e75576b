//! Storage seams for provider rows and the model registry
//!
//! Persistence lives outside the orchestrator. These traits describe what it
//! reads and writes; the in-memory implementations back the binary and the
//! tests.

/// Provider configuration rows
pub mod providers;
/// Central model registry
pub mod registry;

pub use providers::{InMemoryProviderStore, ProviderStore};
pub use registry::{InMemoryModelRegistry, ModelRegistry};
