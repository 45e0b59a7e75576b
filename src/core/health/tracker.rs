//! Health tracker implementation

use super::types::{CooldownReason, HealthEntry};
use chrono::Utc;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{debug, info, warn};

/// Expiry used when `now + cooldown` does not fit in an `Instant`
const FAR_FUTURE: Duration = Duration::from_secs(100 * 365 * 24 * 60 * 60);

/// Per-provider cooldown state
///
/// Expiry is evaluated on read, so an expired entry behaves exactly like no
/// entry. The sweeper only reclaims memory.
#[derive(Debug, Clone, Default)]
pub struct HealthTracker {
    entries: Arc<DashMap<String, HealthEntry>>,
    /// Consecutive failures since the last recovery
    failures: Arc<DashMap<String, u32>>,
}

impl HealthTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Put a provider into cooldown for `cooldown`
    pub fn mark_unhealthy(&self, provider_id: &str, cooldown: Duration) -> bool {
        self.mark_unhealthy_with_reason(provider_id, cooldown, CooldownReason::Manual)
    }

    /// Put a provider into cooldown, recording why
    ///
    /// The later expiry always wins: a shorter cooldown never cuts an active
    /// one short. Returns whether the expiry moved. A zero cooldown is a no-op.
    pub fn mark_unhealthy_with_reason(
        &self,
        provider_id: &str,
        cooldown: Duration,
        reason: CooldownReason,
    ) -> bool {
        if cooldown.is_zero() {
            return false;
        }

        let now = Instant::now();
        let until = now
            .checked_add(cooldown)
            .or_else(|| now.checked_add(FAR_FUTURE))
            .unwrap_or(now);
        let fresh = HealthEntry {
            unhealthy_until: until,
            reason,
            marked_at: Utc::now(),
        };

        let extended = match self.entries.entry(provider_id.to_string()) {
            Entry::Occupied(mut occupied) => {
                if until > occupied.get().unhealthy_until {
                    occupied.insert(fresh);
                    true
                } else {
                    false
                }
            }
            Entry::Vacant(vacant) => {
                vacant.insert(fresh);
                true
            }
        };

        if extended {
            warn!(
                provider = %provider_id,
                cooldown_secs = cooldown.as_secs(),
                reason = %reason,
                "Provider marked unhealthy"
            );
        } else {
            debug!(
                provider = %provider_id,
                cooldown_secs = cooldown.as_secs(),
                "Existing cooldown outlasts the new one"
            );
        }
        extended
    }

    /// True unless the provider is inside an active cooldown
    pub fn is_healthy(&self, provider_id: &str) -> bool {
        let now = Instant::now();
        self.entries
            .get(provider_id)
            .is_none_or(|entry| !entry.is_active(now))
    }

    /// Clear any cooldown and the consecutive failure count
    pub fn mark_healthy(&self, provider_id: &str) {
        let now = Instant::now();
        let was_cooling = self
            .entries
            .remove(provider_id)
            .is_some_and(|(_, entry)| entry.is_active(now));
        self.failures.remove(provider_id);

        if was_cooling {
            info!(provider = %provider_id, "Provider recovered");
        }
    }

    /// Count one more consecutive failure, returning the new count
    pub fn record_failure(&self, provider_id: &str) -> u32 {
        let mut count = self.failures.entry(provider_id.to_string()).or_insert(0);
        *count = count.saturating_add(1);
        *count
    }

    pub fn consecutive_failures(&self, provider_id: &str) -> u32 {
        self.failures.get(provider_id).map_or(0, |count| *count)
    }

    /// Active cooldown for a provider
    pub fn entry(&self, provider_id: &str) -> Option<HealthEntry> {
        let now = Instant::now();
        self.entries
            .get(provider_id)
            .filter(|entry| entry.is_active(now))
            .map(|entry| entry.value().clone())
    }

    /// All providers currently cooling down, sorted by id
    pub fn cooling_down(&self) -> Vec<(String, HealthEntry)> {
        let now = Instant::now();
        let mut active: Vec<_> = self
            .entries
            .iter()
            .filter(|entry| entry.is_active(now))
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        active.sort_by(|a, b| a.0.cmp(&b.0));
        active
    }

    /// Drop expired entries, returning how many were removed
    ///
    /// Failure counts survive so that backoff keeps escalating until a
    /// provider is explicitly marked healthy.
    pub fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let before = self.entries.len();
        self.entries.retain(|_, entry| entry.is_active(now));
        let removed = before.saturating_sub(self.entries.len());
        if removed > 0 {
            debug!(removed, "Purged expired health entries");
        }
        removed
    }

    /// Start background purge task
    pub fn start_sweeper_task(&self, interval: Duration) -> JoinHandle<()> {
        let tracker = self.clone();
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.tick().await;
            loop {
                ticker.tick().await;
                tracker.purge_expired();
            }
        })
    }
}
