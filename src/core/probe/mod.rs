//! Active liveness probes
//!
//! A probe is the cheapest chat completion a provider accepts. Concurrent
//! probes of the same provider/model pair share one upstream call.

mod service;
mod types;


pub use service::ProbeService;
pub use types::ProbeOutcome;
