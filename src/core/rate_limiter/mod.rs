//! Per-model rate limiting
//!
//! Fixed-window admission control over three independent budgets: requests
//! per minute, tokens per minute and requests per day. State is partitioned
//! per key so updates to one model never contend with another.

mod limiter;
mod state;
mod types;
mod utils;


pub use crate::config::models::rate_limit::RateLimits;
pub use limiter::RateLimiter;
pub use state::{DAY_WINDOW, MINUTE_WINDOW, RateLimitState};
pub use types::{LimitKind, RateLimitDecision};
