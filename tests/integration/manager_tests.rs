//! Provider manager integration tests
//!
//! Tests initialization, lookups and failure reporting over real HTTP.

#[cfg(test)]
mod tests {
    use crate::common::{ConfigFactory, ModelListFactory, MockUpstream, ProviderFactory};
    use llm_orchestrator::{
        CooldownReason, OrchestratorError, ProviderStore, ProviderType, UpstreamClient,
        UpstreamError,
    };
    use llm_orchestrator::core::providers::CompletionRequest;

    /// Test live model listing across providers, skipping a broken one
    #[tokio::test]
    async fn test_get_all_models_across_providers() {
        let healthy = MockUpstream::start().await;
        healthy
            .serve_models(ModelListFactory::openai(&["llama-3.1-8b", "gemma2-9b"]))
            .await;
        let broken = MockUpstream::start().await;
        broken.fail_models(500).await;

        let manager = ConfigFactory::manager(ConfigFactory::with_providers(vec![
            ProviderFactory::custom("alpha", &healthy.base_url()),
            ProviderFactory::custom("beta", &broken.base_url()),
        ]));
        manager.initialize().await.unwrap();

        let ids: Vec<_> = manager
            .get_all_models()
            .await
            .iter()
            .map(|m| m.qualified_id())
            .collect();
        assert_eq!(ids, vec!["alpha/llama-3.1-8b", "alpha/gemma2-9b"]);
    }

    /// Test a live failure reported by the caller cools the provider down
    #[tokio::test]
    async fn test_report_failure_from_live_call() {
        let upstream = MockUpstream::start().await;
        upstream.fail_completions(429, Some(120)).await;

        let manager = ConfigFactory::manager(ConfigFactory::with_providers(vec![
            ProviderFactory::custom("alpha", &upstream.base_url()),
        ]));
        manager.initialize().await.unwrap();

        let handle = manager.get_provider("alpha").unwrap();
        let err = handle
            .client
            .complete(CompletionRequest::probe("m1", "ping", 1))
            .await
            .unwrap_err();
        assert_eq!(err, UpstreamError::RateLimited { retry_after: Some(120) });

        assert!(manager.report_failure("alpha", &err));
        let status = &manager.statuses()[0];
        assert!(!status.is_healthy);
        assert_eq!(status.cooldown_reason.as_deref(), Some("rate_limit"));
        assert!(status.cooldown_remaining_secs.unwrap() > 60);
        assert_eq!(
            manager.health().entry("alpha").map(|e| e.reason),
            Some(CooldownReason::RateLimit)
        );
    }

    /// Test re-initialization picks up rows added to the store
    #[tokio::test]
    async fn test_reinitialize_picks_up_new_rows() {
        let upstream = MockUpstream::start().await;
        let store = llm_orchestrator::InMemoryProviderStore::new();
        let manager = llm_orchestrator::ProviderManager::new(
            ConfigFactory::with_providers(Vec::new()),
            std::sync::Arc::new(store.clone()),
            std::sync::Arc::new(llm_orchestrator::InMemoryModelRegistry::new()),
        )
        .with_env(|_| None);

        assert_eq!(manager.initialize().await.unwrap(), 0);
        assert!(!manager.has_provider("alpha"));

        store
            .upsert(ProviderFactory::custom("alpha", &upstream.base_url()))
            .await
            .unwrap();
        assert_eq!(manager.initialize().await.unwrap(), 1);
        assert!(manager.has_provider("alp"));
    }

    /// Test a provider without any resolvable key is skipped
    #[tokio::test]
    async fn test_missing_key_skips_provider() {
        let mut keyless = ProviderFactory::typed("nvidia", ProviderType::Nvidia, "https://integrate.api.nvidia.com/v1");
        keyless.api_key = None;

        let manager = ConfigFactory::manager(ConfigFactory::with_providers(vec![keyless]));
        assert_eq!(manager.initialize().await.unwrap(), 0);
        assert!(matches!(
            manager.probe("nvidia", "m1").await,
            Err(OrchestratorError::ProviderNotFound(_))
        ));
    }

    /// Test concurrent initialization converges on one cache
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_initialize() {
        let upstream = MockUpstream::start().await;
        let manager = std::sync::Arc::new(ConfigFactory::manager(ConfigFactory::with_providers(
            vec![
                ProviderFactory::custom("alpha", &upstream.base_url()),
                ProviderFactory::custom("beta", &upstream.base_url()),
            ],
        )));

        let tasks: Vec<_> = (0..8)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.initialize().await.unwrap() })
            })
            .collect();
        for task in tasks {
            assert_eq!(task.await.unwrap(), 2);
        }
        assert_eq!(manager.provider_ids(), vec!["alpha", "beta"]);
    }
}
