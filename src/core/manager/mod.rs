//! Provider orchestration
//!
//! [`ProviderManager`] owns the provider cache and composes the health
//! tracker, rate limiter and probe service to answer which provider and
//! model may serve a request. It also reconciles provider model lists into
//! the model registry.
//!
//! # Module Structure
//!
//! - `manager` - Cache, lookups and the health/rate-limit facade
//! - `bootstrap` - Environment bootstrap and credential resolution
//! - `selection` - Provider/model selection for a model class
//! - `sync` - Model listing and registry reconciliation
//! - `probing` - Probe policy and the periodic probe task

mod bootstrap;
mod manager;
mod probing;
mod selection;
mod sync;


pub use bootstrap::{ENV_PROVIDERS, EnvLookup, resolve_credentials};
pub use manager::{ProviderHandle, ProviderManager};
pub use selection::Selection;
pub use sync::SyncReport;
