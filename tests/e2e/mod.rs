//! End-to-end tests against real providers
//!
//! These tests are ignored by default and require API keys:
//!
//! ```bash
//! GROQ_API_KEY=... cargo test --test lib e2e -- --ignored
//! ```
