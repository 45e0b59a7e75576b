//! Provider health tracking
//!
//! A provider is either healthy or cooling down until some instant. Failed
//! live calls and failed probes put it into cooldown; the cooldown expires on
//! its own, or is cleared early by a successful probe.
//!
//! # Module Structure
//!
//! - `types` - Cooldown reasons and health entries
//! - `tracker` - The [`HealthTracker`] state machine
//! - `backoff` - Escalating cooldowns for repeated failures

pub mod backoff;
pub mod tracker;
pub mod types;


pub use backoff::BackoffPolicy;
pub use tracker::HealthTracker;
pub use types::{CooldownReason, HealthEntry};
