//! Probe policy and periodic probing

use super::manager::{ProviderHandle, ProviderManager};
use crate::core::probe::ProbeOutcome;
use crate::utils::error::{OrchestratorError, Result};
use chrono::Utc;
use futures::future::join_all;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

impl ProviderManager {
    /// Probe one provider/model pair and apply the outcome to health state
    ///
    /// Success clears any cooldown and the failure count. Failure counts one
    /// more consecutive failure and cools the provider down for the backoff
    /// duration, or for the upstream's Retry-After (bounded by the backoff
    /// maximum) when that is longer.
    /// Concurrent probes of the same pair apply the outcome once.
    pub async fn probe(&self, provider_id: &str, model_id: &str) -> Result<bool> {
        let handle = self
            .get_provider(provider_id)
            .ok_or_else(|| OrchestratorError::ProviderNotFound(provider_id.to_string()))?;

        let health = self.health.clone();
        let backoff = self.backoff.clone();
        let last_checked = self.last_checked.clone();
        let id = provider_id.to_string();

        let outcome = self
            .probes
            .probe_with(handle.client.clone(), model_id, move |outcome| {
                last_checked.insert(id.clone(), Utc::now());
                match outcome {
                    ProbeOutcome::Reachable { latency } => {
                        debug!(provider = %id, latency_ms = latency.as_millis() as u64, "Probe succeeded");
                        health.mark_healthy(&id);
                    }
                    ProbeOutcome::Failed {
                        reason,
                        message,
                        retry_after,
                    } => {
                        let failures = health.record_failure(&id);
                        let mut cooldown = backoff.cooldown(failures);
                        if let Some(retry_after) = retry_after {
                            cooldown = cooldown.max(backoff.retry_after(*retry_after));
                        }
                        warn!(
                            provider = %id,
                            failures,
                            cooldown_secs = cooldown.as_secs(),
                            error = %message,
                            "Probe failed"
                        );
                        health.mark_unhealthy_with_reason(&id, cooldown, *reason);
                    }
                }
            })
            .await;

        Ok(outcome.is_reachable())
    }

    /// Probe every cached provider concurrently
    ///
    /// Each provider is probed with its first declared model, falling back to
    /// the first registry model. Providers with neither are skipped.
    pub async fn probe_all(&self) -> BTreeMap<String, bool> {
        let mut targets = Vec::new();
        for handle in self.handles() {
            match self.probe_target(&handle).await {
                Some(model_id) => targets.push((handle.id().to_string(), model_id)),
                None => debug!(provider = %handle.id(), "No model to probe"),
            }
        }

        let results = join_all(
            targets
                .iter()
                .map(|(provider_id, model_id)| self.probe(provider_id, model_id)),
        )
        .await;

        let outcomes: BTreeMap<_, _> = targets
            .into_iter()
            .zip(results)
            .filter_map(|((provider_id, _), result)| match result {
                Ok(reachable) => Some((provider_id, reachable)),
                // Removed from the cache by a concurrent initialize
                Err(_) => None,
            })
            .collect();

        info!(
            probed = outcomes.len(),
            reachable = outcomes.values().filter(|ok| **ok).count(),
            "Probe pass complete"
        );
        outcomes
    }

    async fn probe_target(&self, handle: &ProviderHandle) -> Option<String> {
        if let Some(model) = handle.config.models.first() {
            return Some(model.id.clone());
        }
        match self.registry.models_for(handle.id()).await {
            Ok(models) => models.into_iter().next().map(|m| m.id),
            Err(e) => {
                warn!(provider = %handle.id(), error = %e, "Registry lookup failed");
                None
            }
        }
    }

    /// Start background probing of all providers
    pub fn start_probe_task(self: Arc<Self>, interval: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                self.probe_all().await;
            }
        })
    }
}
