//! Error handling for the orchestrator

mod types;


pub use types::{OrchestratorError, Result};
