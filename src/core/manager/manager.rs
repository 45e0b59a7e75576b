//! Provider manager core structure

use super::bootstrap::{EnvLookup, process_env};
use crate::config::{OrchestratorConfig, ProviderConfig, Validate};
use crate::core::health::{BackoffPolicy, CooldownReason, HealthTracker};
use crate::core::probe::ProbeService;
use crate::core::providers::{ClientFactory, HttpClientFactory, UpstreamClient, UpstreamError};
use crate::core::rate_limiter::{RateLimitDecision, RateLimiter, RateLimits};
use crate::core::types::ProviderStatus;
use crate::storage::{InMemoryModelRegistry, InMemoryProviderStore, ModelRegistry, ProviderStore};
use crate::utils::error::{OrchestratorError, Result};
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Mutex;
use tokio::task::JoinHandle;
use tokio::time::Instant;
use tracing::{info, warn};

/// A cached provider: its resolved configuration and upstream client
#[derive(Debug, Clone)]
pub struct ProviderHandle {
    pub config: ProviderConfig,
    pub client: Arc<dyn UpstreamClient>,
}

impl ProviderHandle {
    pub fn id(&self) -> &str {
        &self.config.id
    }
}

/// Provider manager
///
/// Constructed once and shared behind an `Arc`. Every method takes `&self`;
/// the cache and all per-provider state are concurrent maps.
pub struct ProviderManager {
    pub(super) config: OrchestratorConfig,
    pub(super) store: Arc<dyn ProviderStore>,
    pub(super) registry: Arc<dyn ModelRegistry>,
    pub(super) factory: Arc<dyn ClientFactory>,
    pub(super) env: EnvLookup,

    /// Cached providers by id
    pub(super) providers: DashMap<String, Arc<ProviderHandle>>,
    pub(super) health: HealthTracker,
    pub(super) rate_limiter: RateLimiter,
    pub(super) probes: ProbeService,
    pub(super) backoff: BackoffPolicy,
    /// Time of the latest probe per provider
    pub(super) last_checked: Arc<DashMap<String, DateTime<Utc>>>,

    pub(super) init_lock: Mutex<()>,
    pub(super) sync_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ProviderManager {
    /// Create a manager over the given store and registry
    pub fn new(
        config: OrchestratorConfig,
        store: Arc<dyn ProviderStore>,
        registry: Arc<dyn ModelRegistry>,
    ) -> Self {
        Self {
            probes: ProbeService::new(config.probe.clone()),
            backoff: BackoffPolicy::from(&config.health.backoff),
            config,
            store,
            registry,
            factory: Arc::new(HttpClientFactory),
            env: process_env(),
            providers: DashMap::new(),
            health: HealthTracker::new(),
            rate_limiter: RateLimiter::new(),
            last_checked: Arc::new(DashMap::new()),
            init_lock: Mutex::new(()),
            sync_locks: DashMap::new(),
        }
    }

    /// Create a manager with in-memory storage seeded from `config.providers`
    pub fn from_config(config: OrchestratorConfig) -> Self {
        let store = InMemoryProviderStore::from_configs(config.providers.clone());
        Self::new(config, Arc::new(store), Arc::new(InMemoryModelRegistry::new()))
    }

    /// Use a different upstream client factory (builder pattern)
    pub fn with_client_factory(mut self, factory: Arc<dyn ClientFactory>) -> Self {
        self.factory = factory;
        self
    }

    /// Resolve environment variables through `lookup` instead of the process
    /// environment (builder pattern)
    pub fn with_env<F>(mut self, lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String> + Send + Sync + 'static,
    {
        self.env = Arc::new(lookup);
        self
    }

    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    pub fn health(&self) -> &HealthTracker {
        &self.health
    }

    pub fn rate_limiter(&self) -> &RateLimiter {
        &self.rate_limiter
    }

    pub fn registry(&self) -> &Arc<dyn ModelRegistry> {
        &self.registry
    }

    // ========== Lifecycle ==========

    /// Load enabled providers and rebuild the cache
    ///
    /// Providers whose configuration cannot be resolved are skipped and
    /// logged. A failure of the store itself is returned. Safe to call
    /// repeatedly; concurrent calls run one after another.
    pub async fn initialize(&self) -> Result<usize> {
        let _guard = self.init_lock.lock().await;
        info!("Initializing provider manager");

        if self.config.bootstrap_from_env {
            self.bootstrap_from_env().await;
        }
        if self.config.detect_local_ollama {
            self.detect_local_ollama().await;
        }

        let rows = self.store.load_enabled().await?;
        let mut loaded = HashSet::new();

        for row in rows {
            let id = row.id.clone();
            match self.prepare(row) {
                Ok(handle) => {
                    info!(
                        provider = %id,
                        provider_type = %handle.config.provider_type,
                        "Provider online"
                    );
                    self.providers.insert(id.clone(), Arc::new(handle));
                    loaded.insert(id);
                }
                Err(e) => {
                    warn!(provider = %id, error = %e, "Skipping provider");
                }
            }
        }

        self.providers.retain(|id, _| loaded.contains(id));
        info!(providers = loaded.len(), "Provider manager initialized");
        Ok(loaded.len())
    }

    /// Resolve credentials, validate and build the client for one row
    fn prepare(&self, row: ProviderConfig) -> Result<ProviderHandle> {
        let config = super::bootstrap::resolve_credentials(row, self.env.as_ref())?;
        config
            .validate()
            .map_err(|e| OrchestratorError::provider_config(&config.id, e))?;
        let client = self.factory.build(&config)?;
        Ok(ProviderHandle { config, client })
    }

    /// Start the sweepers and the periodic probe task enabled in config
    pub fn start_background_tasks(self: &Arc<Self>) -> Vec<JoinHandle<()>> {
        let mut tasks = Vec::new();
        if self.config.health.sweep_interval_secs > 0 {
            tasks.push(
                self.health
                    .start_sweeper_task(Duration::from_secs(self.config.health.sweep_interval_secs)),
            );
        }
        if self.config.rate_limit.sweep_interval_secs > 0 {
            tasks.push(self.rate_limiter.start_sweeper_task(Duration::from_secs(
                self.config.rate_limit.sweep_interval_secs,
            )));
        }
        if self.config.probe.interval_secs > 0 {
            tasks.push(
                self.clone()
                    .start_probe_task(Duration::from_secs(self.config.probe.interval_secs)),
            );
        }
        tasks
    }

    // ========== Lookup ==========

    /// Exact lookup by id
    pub fn get_provider(&self, id: &str) -> Option<Arc<ProviderHandle>> {
        self.providers.get(id).map(|handle| handle.value().clone())
    }

    /// Whether any cached provider id contains `partial_id` (case-sensitive)
    pub fn has_provider(&self, partial_id: &str) -> bool {
        self.providers
            .iter()
            .any(|entry| entry.key().contains(partial_id))
    }

    /// Cached provider ids, sorted
    pub fn provider_ids(&self) -> Vec<String> {
        let mut ids: Vec<_> = self.providers.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Cached providers, sorted by id
    pub(super) fn handles(&self) -> Vec<Arc<ProviderHandle>> {
        let mut handles: Vec<_> = self.providers.iter().map(|e| e.value().clone()).collect();
        handles.sort_by(|a, b| a.config.id.cmp(&b.config.id));
        handles
    }

    /// Status views of every cached provider, sorted by id
    pub fn statuses(&self) -> Vec<ProviderStatus> {
        let now = Instant::now();
        self.handles()
            .into_iter()
            .map(|handle| {
                let id = handle.id();
                let cooldown = self.health.entry(id);
                ProviderStatus {
                    id: id.to_string(),
                    label: handle.config.label.clone(),
                    provider_type: handle.config.provider_type.clone(),
                    base_url: handle.config.effective_base_url(),
                    is_healthy: cooldown.is_none(),
                    cooldown_reason: cooldown.as_ref().map(|e| e.reason.to_string()),
                    cooldown_remaining_secs: cooldown.as_ref().map(|e| e.remaining(now).as_secs()),
                    last_checked_at: self.last_checked.get(id).map(|t| *t.value()),
                    models: handle.config.models.iter().map(|m| m.id.clone()).collect(),
                }
            })
            .collect()
    }

    // ========== Health ==========

    pub fn mark_unhealthy(&self, provider_id: &str, cooldown: Duration) {
        self.health.mark_unhealthy(provider_id, cooldown);
    }

    pub fn is_healthy(&self, provider_id: &str) -> bool {
        self.health.is_healthy(provider_id)
    }

    /// `Err(ProviderUnhealthy)` while the provider is cooling down
    pub fn require_healthy(&self, provider_id: &str) -> Result<()> {
        if self.health.is_healthy(provider_id) {
            Ok(())
        } else {
            Err(OrchestratorError::ProviderUnhealthy(provider_id.to_string()))
        }
    }

    /// Cool a provider down after a failed live call
    ///
    /// The cooldown is the configured default, or the upstream's Retry-After
    /// when longer. Retry-After is bounded by the backoff maximum. Request rejections do not affect health. Returns whether
    /// a cooldown was applied or extended.
    pub fn report_failure(&self, provider_id: &str, error: &UpstreamError) -> bool {
        let Some(reason) = CooldownReason::from_upstream(error) else {
            return false;
        };

        let mut cooldown = Duration::from_secs(self.config.health.default_cooldown_secs);
        if let Some(retry_after) = error.retry_after() {
            cooldown = cooldown.max(self.backoff.retry_after(Duration::from_secs(retry_after)));
        }
        self.health
            .mark_unhealthy_with_reason(provider_id, cooldown, reason)
    }

    // ========== Rate Limits ==========

    pub fn check_rate_limit(
        &self,
        model_id: &str,
        limits: &RateLimits,
        estimated_tokens: u64,
    ) -> RateLimitDecision {
        self.rate_limiter.check(model_id, limits, estimated_tokens)
    }

    pub fn increment_rate_limit(&self, model_id: &str, limits: &RateLimits, tokens: u64) {
        self.rate_limiter.increment(model_id, limits, tokens);
    }
}
