//! Provider rows read on initialize and written by env bootstrap

use crate::config::ProviderConfig;
use crate::utils::error::Result;
use async_trait::async_trait;
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

/// Source of provider configuration rows
#[async_trait]
pub trait ProviderStore: Send + Sync {
    /// Every enabled row
    async fn load_enabled(&self) -> Result<Vec<ProviderConfig>>;

    async fn find_by_id(&self, id: &str) -> Result<Option<ProviderConfig>>;

    async fn find_by_label(&self, label: &str) -> Result<Option<ProviderConfig>>;

    /// Insert or replace the row with the same id
    async fn upsert(&self, config: ProviderConfig) -> Result<()>;
}

/// Provider rows held in memory, ordered by id
#[derive(Debug, Clone, Default)]
pub struct InMemoryProviderStore {
    rows: Arc<RwLock<BTreeMap<String, ProviderConfig>>>,
}

impl InMemoryProviderStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the store, later rows replacing earlier ones with the same id
    pub fn from_configs(configs: impl IntoIterator<Item = ProviderConfig>) -> Self {
        let rows = configs
            .into_iter()
            .map(|config| (config.id.clone(), config))
            .collect();
        Self {
            rows: Arc::new(RwLock::new(rows)),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.read().is_empty()
    }
}

#[async_trait]
impl ProviderStore for InMemoryProviderStore {
    async fn load_enabled(&self) -> Result<Vec<ProviderConfig>> {
        Ok(self
            .rows
            .read()
            .values()
            .filter(|config| config.enabled)
            .cloned()
            .collect())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<ProviderConfig>> {
        Ok(self.rows.read().get(id).cloned())
    }

    async fn find_by_label(&self, label: &str) -> Result<Option<ProviderConfig>> {
        Ok(self
            .rows
            .read()
            .values()
            .find(|config| config.label == label)
            .cloned())
    }

    async fn upsert(&self, config: ProviderConfig) -> Result<()> {
        self.rows.write().insert(config.id.clone(), config);
        Ok(())
    }
}
