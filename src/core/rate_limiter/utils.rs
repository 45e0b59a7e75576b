//! Housekeeping for the rate limiter

use super::limiter::RateLimiter;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::debug;

impl RateLimiter {
    /// Drop keys whose minute and day windows have both ended
    ///
    /// Returns the number of keys removed. Removing an idle key is
    /// indistinguishable from keeping it: the next use starts fresh windows
    /// either way.
    pub fn purge_idle(&self) -> usize {
        let now = Instant::now();
        let before = self.states.len();
        self.states.retain(|_, state| !state.is_idle(now));
        let removed = before.saturating_sub(self.states.len());
        if removed > 0 {
            debug!(removed, "Purged idle rate limit state");
        }
        removed
    }

    /// Start background purge task
    pub fn start_sweeper_task(&self, interval: Duration) -> JoinHandle<()> {
        let limiter = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                limiter.purge_idle();
            }
        })
    }
}
