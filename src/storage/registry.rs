//! Model registry reconciled by sync, replaced one provider at a time

use crate::core::types::LLMModel;
use crate::utils::error::Result;
use async_trait::async_trait;
use dashmap::DashMap;
use std::sync::Arc;

/// Central registry of models per provider
///
/// Writers replace a provider's whole set at once; readers never observe a
/// partially written set.
#[async_trait]
pub trait ModelRegistry: Send + Sync {
    /// Atomically replace every row of `provider_id` with `models`
    async fn replace_provider_models(&self, provider_id: &str, models: Vec<LLMModel>)
    -> Result<()>;

    async fn models_for(&self, provider_id: &str) -> Result<Vec<LLMModel>>;

    /// Every row, grouped by provider id in ascending order
    async fn all_models(&self) -> Result<Vec<LLMModel>>;

    /// Providers that currently own rows, sorted
    async fn provider_ids(&self) -> Result<Vec<String>>;

    /// Drop every row of `provider_id`, returning how many were removed
    async fn remove_provider(&self, provider_id: &str) -> Result<usize>;
}

/// Registry held in memory
#[derive(Debug, Clone, Default)]
pub struct InMemoryModelRegistry {
    rows: Arc<DashMap<String, Arc<Vec<LLMModel>>>>,
}

impl InMemoryModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Total number of rows
    pub fn len(&self) -> usize {
        self.rows.iter().map(|entry| entry.value().len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[async_trait]
impl ModelRegistry for InMemoryModelRegistry {
    async fn replace_provider_models(
        &self,
        provider_id: &str,
        models: Vec<LLMModel>,
    ) -> Result<()> {
        self.rows.insert(provider_id.to_string(), Arc::new(models));
        Ok(())
    }

    async fn models_for(&self, provider_id: &str) -> Result<Vec<LLMModel>> {
        Ok(self
            .rows
            .get(provider_id)
            .map(|models| models.as_ref().clone())
            .unwrap_or_default())
    }

    async fn all_models(&self) -> Result<Vec<LLMModel>> {
        let mut sets: Vec<_> = self
            .rows
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        sets.sort_by(|a, b| a.0.cmp(&b.0));
        Ok(sets
            .into_iter()
            .flat_map(|(_, models)| models.as_ref().clone())
            .collect())
    }

    async fn provider_ids(&self) -> Result<Vec<String>> {
        let mut ids: Vec<_> = self
            .rows
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| entry.key().clone())
            .collect();
        ids.sort();
        Ok(ids)
    }

    async fn remove_provider(&self, provider_id: &str) -> Result<usize> {
        Ok(self
            .rows
            .remove(provider_id)
            .map_or(0, |(_, models)| models.len()))
    }
}
