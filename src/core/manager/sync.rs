//! Model listing and registry reconciliation

use super::manager::{ProviderHandle, ProviderManager};
use crate::core::providers::UpstreamError;
use crate::core::types::LLMModel;
use crate::utils::error::Result;
use futures::future::join_all;
use serde::Serialize;
use std::collections::{BTreeMap, HashSet};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of one registry sync pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Rows written per provider
    pub synced: BTreeMap<String, usize>,
    /// Providers whose rows were left untouched because the fetch or write failed
    pub failed: Vec<String>,
    /// Providers whose rows were removed because they are no longer configured
    pub pruned: Vec<String>,
}

impl SyncReport {
    pub fn total_models(&self) -> usize {
        self.synced.values().sum()
    }
}

impl ProviderManager {
    /// Live model lists of every cached provider, flattened in provider id order
    ///
    /// Providers that fail or time out are logged and skipped.
    pub async fn get_all_models(&self) -> Vec<LLMModel> {
        let handles = self.handles();
        let results = join_all(handles.iter().map(|handle| self.fetch_models(handle))).await;

        handles
            .iter()
            .zip(results)
            .flat_map(|(handle, result)| match result {
                Ok(models) => models,
                Err(e) => {
                    warn!(provider = %handle.id(), error = %e, "Failed to fetch models");
                    Vec::new()
                }
            })
            .collect()
    }

    /// Reconcile every cached provider's model list into the registry
    ///
    /// Providers sync in parallel. Each successful provider's rows are
    /// replaced in one swap; a failed provider keeps its previous rows.
    /// Afterwards, rows of providers no longer in the cache are pruned when
    /// `sync.prune_missing_providers` is set. Only a registry failure during
    /// pruning is returned as an error.
    pub async fn sync_models_to_registry(&self) -> Result<SyncReport> {
        let handles = self.handles();
        info!(providers = handles.len(), "Syncing models to registry");

        let results = join_all(handles.iter().map(|handle| self.sync_provider(handle))).await;

        let mut report = SyncReport::default();
        for (handle, result) in handles.iter().zip(results) {
            match result {
                Ok(count) => {
                    report.synced.insert(handle.id().to_string(), count);
                }
                Err(e) => {
                    warn!(provider = %handle.id(), error = %e, "Model sync failed");
                    report.failed.push(handle.id().to_string());
                }
            }
        }

        if self.config.sync.prune_missing_providers {
            for provider_id in self.registry.provider_ids().await? {
                if !self.providers.contains_key(&provider_id) {
                    let removed = self.registry.remove_provider(&provider_id).await?;
                    info!(provider = %provider_id, removed, "Pruned registry rows of removed provider");
                    report.pruned.push(provider_id);
                }
            }
        }

        info!(
            synced = report.synced.len(),
            models = report.total_models(),
            failed = report.failed.len(),
            pruned = report.pruned.len(),
            "Registry sync complete"
        );
        Ok(report)
    }

    /// Fetch, filter and write one provider's models under its sync lock
    async fn sync_provider(&self, handle: &ProviderHandle) -> Result<usize> {
        let lock = self
            .sync_locks
            .entry(handle.id().to_string())
            .or_default()
            .clone();
        let _guard = lock.lock().await;

        let models = self.fetch_models(handle).await?;
        let free_only = self
            .config
            .sync
            .free_only
            .contains(&handle.config.provider_type);
        let models = reconcile(handle.id(), models, free_only);
        let count = models.len();

        self.registry
            .replace_provider_models(handle.id(), models)
            .await?;
        debug!(provider = %handle.id(), count, "Registry rows replaced");
        Ok(count)
    }

    async fn fetch_models(
        &self,
        handle: &ProviderHandle,
    ) -> std::result::Result<Vec<LLMModel>, UpstreamError> {
        let timeout_secs = self.config.sync.timeout_secs;
        tokio::time::timeout(
            Duration::from_secs(timeout_secs),
            handle.client.list_models(),
        )
        .await
        .map_err(|_| UpstreamError::Timeout(timeout_secs))?
    }
}

/// Dedupe by model id (first wins), pin ownership and apply the free-only filter
fn reconcile(provider_id: &str, models: Vec<LLMModel>, free_only: bool) -> Vec<LLMModel> {
    let mut seen = HashSet::new();
    models
        .into_iter()
        .filter(|model| !free_only || model.is_free())
        .filter(|model| seen.insert(model.id.clone()))
        .map(|mut model| {
            model.provider_id = provider_id.to_string();
            model
        })
        .collect()
}
