//! Integration tests for llm-orchestrator
//!
//! These tests verify the interaction between multiple components
//! and drive the production HTTP client against mock upstreams.

pub mod health_tests;
pub mod manager_tests;
pub mod probe_tests;
pub mod rate_limit_tests;
pub mod selection_tests;
pub mod sync_tests;
