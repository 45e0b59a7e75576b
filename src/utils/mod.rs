//! Utility modules for the orchestrator
//!
//! - **error**: error types and the crate `Result` alias
//! - **logging**: tracing subscriber setup

pub mod error;
pub mod logging;

pub use error::{OrchestratorError, Result};
pub use logging::{LogFormat, init_tracing};
