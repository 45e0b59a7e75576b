//! Common test utilities for llm-orchestrator
//!
//! This module provides shared test infrastructure for all tests:
//! - Provider and configuration fixtures
//! - Mock OpenAI-compatible upstreams
//!
//! # Usage
//!
//! ```rust
//! use crate::common::{fixtures, upstream::MockUpstream};
//!
//! #[tokio::test]
//! async fn my_test() {
//!     let upstream = MockUpstream::start().await;
//!     let provider = fixtures::ProviderFactory::custom("p1", &upstream.base_url());
//!     // ...
//! }
//! ```

pub mod fixtures;
pub mod upstream;

// Re-export commonly used items
pub use fixtures::{ConfigFactory, ModelListFactory, ProviderFactory};
pub use upstream::MockUpstream;

/// Skip test if environment variable is not set
#[macro_export]
macro_rules! skip_without_env {
    ($var:expr) => {
        if std::env::var($var).is_err() {
            eprintln!("Skipping test: {} environment variable not set", $var);
            return;
        }
    };
}

/// Assert that a result is Ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($expr:expr) => {
        match $expr {
            Ok(v) => v,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
}

/// Assert that a result is Err
#[macro_export]
macro_rules! assert_err {
    ($expr:expr) => {
        match $expr {
            Ok(v) => panic!("Expected Err, got Ok: {:?}", v),
            Err(e) => e,
        }
    };
}
