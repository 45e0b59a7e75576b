//! Escalating cooldown policy

use crate::config::BackoffConfig;
use std::time::Duration;

/// Exponential cooldown: `base * multiplier^(failures - 1)`, capped at `max`
#[derive(Debug, Clone, PartialEq)]
pub struct BackoffPolicy {
    base: Duration,
    max: Duration,
    multiplier: f64,
}

impl BackoffPolicy {
    pub fn new(base: Duration, max: Duration, multiplier: f64) -> Self {
        Self {
            base,
            max: max.max(base),
            multiplier: multiplier.max(1.0),
        }
    }

    /// Cooldown after `consecutive_failures` failures in a row
    pub fn cooldown(&self, consecutive_failures: u32) -> Duration {
        let exponent = consecutive_failures.saturating_sub(1).min(i32::MAX as u32) as i32;
        let secs = self.base.as_secs_f64() * self.multiplier.powi(exponent);
        if !secs.is_finite() || secs >= self.max.as_secs_f64() {
            return self.max;
        }
        Duration::from_secs_f64(secs)
    }

    /// Upstream Retry-After, bounded by the longest backoff cooldown
    pub fn retry_after(&self, retry_after: Duration) -> Duration {
        retry_after.min(self.max)
    }
}

impl From<&BackoffConfig> for BackoffPolicy {
    fn from(config: &BackoffConfig) -> Self {
        Self::new(
            Duration::from_secs(config.base_secs),
            Duration::from_secs(config.max_secs),
            config.multiplier,
        )
    }
}

impl Default for BackoffPolicy {
    fn default() -> Self {
        Self::from(&BackoffConfig::default())
    }
}
