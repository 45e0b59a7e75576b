//! Fixed-window counters

use super::types::LimitKind;
use crate::config::models::rate_limit::RateLimits;
use serde::Serialize;
use std::time::Duration;
use tokio::time::Instant;

/// Length of the per-minute window
pub const MINUTE_WINDOW: Duration = Duration::from_secs(60);
/// Length of the per-day window
pub const DAY_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Counters for one rate-limit key
///
/// Both windows are anchored at the first observed use and advance in whole
/// multiples of their length, so a window boundary resets its counters
/// exactly once regardless of how long the key sat idle.
#[derive(Debug, Clone, Serialize)]
pub struct RateLimitState {
    requests_this_minute: u64,
    tokens_this_minute: u64,
    #[serde(skip)]
    minute_started_at: Instant,
    requests_today: u64,
    #[serde(skip)]
    day_started_at: Instant,
}

impl RateLimitState {
    pub(super) fn new(now: Instant) -> Self {
        Self {
            requests_this_minute: 0,
            tokens_this_minute: 0,
            minute_started_at: now,
            requests_today: 0,
            day_started_at: now,
        }
    }

    pub fn requests_this_minute(&self) -> u64 {
        self.requests_this_minute
    }

    pub fn tokens_this_minute(&self) -> u64 {
        self.tokens_this_minute
    }

    pub fn requests_today(&self) -> u64 {
        self.requests_today
    }

    pub fn minute_started_at(&self) -> Instant {
        self.minute_started_at
    }

    pub fn day_started_at(&self) -> Instant {
        self.day_started_at
    }

    /// Advance expired windows to the boundary containing `now`
    pub(super) fn roll(&mut self, now: Instant) {
        if let Some(start) = advance(self.minute_started_at, MINUTE_WINDOW, now) {
            self.minute_started_at = start;
            self.requests_this_minute = 0;
            self.tokens_this_minute = 0;
        }
        if let Some(start) = advance(self.day_started_at, DAY_WINDOW, now) {
            self.day_started_at = start;
            self.requests_today = 0;
        }
    }

    /// Copy of this state as it would look at `now`
    pub(super) fn rolled(&self, now: Instant) -> Self {
        let mut state = self.clone();
        state.roll(now);
        state
    }

    /// First budget that admitting one more request of `estimated_tokens`
    /// would exceed
    pub(super) fn exceeded(&self, limits: &RateLimits, estimated_tokens: u64) -> Option<LimitKind> {
        if let Some(rpm) = limits.rpm {
            if self.requests_this_minute.saturating_add(1) > rpm {
                return Some(LimitKind::Rpm);
            }
        }
        if let Some(tpm) = limits.tpm {
            if self.tokens_this_minute.saturating_add(estimated_tokens) > tpm {
                return Some(LimitKind::Tpm);
            }
        }
        if let Some(rpd) = limits.rpd {
            if self.requests_today.saturating_add(1) > rpd {
                return Some(LimitKind::Rpd);
            }
        }
        None
    }

    pub(super) fn record(&mut self, tokens: u64) {
        self.requests_this_minute = self.requests_this_minute.saturating_add(1);
        self.requests_today = self.requests_today.saturating_add(1);
        self.tokens_this_minute = self.tokens_this_minute.saturating_add(tokens);
    }

    /// Both windows have ended, so the state carries no information
    pub(super) fn is_idle(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.minute_started_at) >= MINUTE_WINDOW
            && now.saturating_duration_since(self.day_started_at) >= DAY_WINDOW
    }
}

/// New window start if the window beginning at `start` has ended by `now`
fn advance(start: Instant, window: Duration, now: Instant) -> Option<Instant> {
    let elapsed = now.saturating_duration_since(start);
    if elapsed < window {
        return None;
    }
    let periods = elapsed.as_secs() / window.as_secs();
    Some(start + Duration::from_secs(periods * window.as_secs()))
}
