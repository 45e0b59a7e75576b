//! Core rate limiter implementation

use super::state::RateLimitState;
use super::types::RateLimitDecision;
use crate::config::models::rate_limit::RateLimits;
use dashmap::DashMap;
use std::sync::Arc;
use tokio::time::Instant;
use tracing::debug;

/// Rate limiter keyed by model
///
/// Keys are opaque; the provider manager uses `<provider_id>/<model_id>` so
/// two accounts serving the same model keep separate budgets. Every method
/// runs under the key's shard lock only, so calls for different keys proceed
/// independently and calls for the same key are linearizable.
#[derive(Debug, Clone, Default)]
pub struct RateLimiter {
    /// Counters by key, created on first increment
    pub(super) states: Arc<DashMap<String, RateLimitState>>,
}

impl RateLimiter {
    /// Create an empty rate limiter
    pub fn new() -> Self {
        Self::default()
    }

    /// Check whether one more request of `estimated_tokens` would be admitted
    ///
    /// Expired windows are rolled forward on a copy; stored counters are
    /// never touched. A check followed by a separate `increment` can race
    /// with other callers; use `check_and_increment` when the limit must
    /// hold under concurrency.
    pub fn check(&self, key: &str, limits: &RateLimits, estimated_tokens: u64) -> RateLimitDecision {
        if limits.is_unlimited() {
            return RateLimitDecision::allow();
        }

        let now = Instant::now();
        let exceeded = match self.states.get(key) {
            Some(state) => state.rolled(now).exceeded(limits, estimated_tokens),
            None => RateLimitState::new(now).exceeded(limits, estimated_tokens),
        };

        if let Some(kind) = exceeded {
            debug!(key = %key, limit = %kind, "Rate limit would be exceeded");
        }
        RateLimitDecision::from_exceeded(exceeded)
    }

    /// Account for a dispatched request
    ///
    /// Adds one to both request counters and `tokens` to the token counter.
    /// Keys without any configured limit are not tracked.
    pub fn increment(&self, key: &str, limits: &RateLimits, tokens: u64) {
        if limits.is_unlimited() {
            return;
        }

        self.with_state(key, |state| state.record(tokens));
    }

    /// Atomically check and account for a request
    ///
    /// The request is recorded with `estimated_tokens` only when admitted.
    pub fn check_and_increment(
        &self,
        key: &str,
        limits: &RateLimits,
        estimated_tokens: u64,
    ) -> RateLimitDecision {
        if limits.is_unlimited() {
            return RateLimitDecision::allow();
        }

        let exceeded = self.with_state(key, |state| {
            let exceeded = state.exceeded(limits, estimated_tokens);
            if exceeded.is_none() {
                state.record(estimated_tokens);
            }
            exceeded
        });

        if let Some(kind) = exceeded {
            debug!(key = %key, limit = %kind, "Rate limit exceeded");
        }
        RateLimitDecision::from_exceeded(exceeded)
    }

    /// Current counters for a key, rolled forward to now
    pub fn state(&self, key: &str) -> Option<RateLimitState> {
        let now = Instant::now();
        self.states.get(key).map(|state| state.rolled(now))
    }

    /// Number of tracked keys
    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Run `f` on the rolled state for `key`, creating it if absent
    fn with_state<T>(&self, key: &str, f: impl FnOnce(&mut RateLimitState) -> T) -> T {
        let now = Instant::now();
        // Avoid a String allocation when the key already exists
        if let Some(mut state) = self.states.get_mut(key) {
            state.roll(now);
            return f(&mut state);
        }

        let mut state = self
            .states
            .entry(key.to_string())
            .or_insert_with(|| RateLimitState::new(now));
        state.roll(now);
        f(&mut state)
    }
}
