//! Registry sync integration tests
//!
//! Tests model list reconciliation against mock upstreams.

#[cfg(test)]
mod tests {
    use crate::common::{ConfigFactory, ModelListFactory, MockUpstream, ProviderFactory};
    use llm_orchestrator::{ModelRegistry, ProviderType};

    /// Test a full sync, then a partial failure that keeps previous rows
    #[tokio::test]
    async fn test_sync_then_partial_failure() {
        let alpha = MockUpstream::start().await;
        alpha
            .serve_models(ModelListFactory::openai(&["llama-3.1-8b", "llama-3.1-70b"]))
            .await;
        let beta = MockUpstream::start().await;
        beta.serve_models(ModelListFactory::openai(&["mistral-small"])).await;

        let manager = ConfigFactory::manager(ConfigFactory::with_providers(vec![
            ProviderFactory::custom("alpha", &alpha.base_url()),
            ProviderFactory::custom("beta", &beta.base_url()),
        ]));
        manager.initialize().await.unwrap();

        let report = manager.sync_models_to_registry().await.unwrap();
        assert_eq!(report.total_models(), 3);
        assert!(report.failed.is_empty());

        alpha.reset().await;
        alpha.fail_models(503).await;
        beta.reset().await;
        beta.serve_models(ModelListFactory::openai(&["mistral-small", "mistral-large"]))
            .await;

        let report = manager.sync_models_to_registry().await.unwrap();
        assert_eq!(report.failed, vec!["alpha"]);
        assert_eq!(report.synced.get("beta"), Some(&2));

        let registry = manager.registry();
        let alpha_ids: Vec<_> = registry
            .models_for("alpha")
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.id)
            .collect();
        assert_eq!(alpha_ids, vec!["llama-3.1-8b", "llama-3.1-70b"]);
        assert_eq!(registry.all_models().await.unwrap().len(), 4);
    }

    /// Test OpenRouter rows keep only free models
    #[tokio::test]
    async fn test_free_only_filter() {
        let upstream = MockUpstream::start().await;
        upstream
            .serve_models(ModelListFactory::priced(&[
                ("meta-llama/llama-3.1-8b-instruct:free", "0"),
                ("openai/gpt-4o", "0.0000025"),
                ("google/gemma-2-9b-it:free", "0"),
            ]))
            .await;

        let manager = ConfigFactory::manager(ConfigFactory::with_providers(vec![
            ProviderFactory::typed("openrouter", ProviderType::OpenRouter, &upstream.base_url()),
        ]));
        manager.initialize().await.unwrap();

        let report = manager.sync_models_to_registry().await.unwrap();
        assert_eq!(report.synced.get("openrouter"), Some(&2));

        let models = manager.registry().models_for("openrouter").await.unwrap();
        assert!(models.iter().all(|m| m.is_free()));
        assert!(models.iter().all(|m| m.provider_id == "openrouter"));
        assert_eq!(models[0].context_window, Some(8192));
    }

    /// Test a provider removed from the store loses its rows on the next sync
    #[tokio::test]
    async fn test_removed_provider_is_pruned() {
        let upstream = MockUpstream::start().await;
        upstream.serve_models(ModelListFactory::openai(&["m1"])).await;

        let store = llm_orchestrator::InMemoryProviderStore::from_configs(vec![
            ProviderFactory::custom("alpha", &upstream.base_url()),
            ProviderFactory::custom("beta", &upstream.base_url()),
        ]);
        let manager = llm_orchestrator::ProviderManager::new(
            ConfigFactory::with_providers(Vec::new()),
            std::sync::Arc::new(store.clone()),
            std::sync::Arc::new(llm_orchestrator::InMemoryModelRegistry::new()),
        )
        .with_env(|_| None);
        manager.initialize().await.unwrap();
        manager.sync_models_to_registry().await.unwrap();

        let mut beta = ProviderFactory::custom("beta", &upstream.base_url());
        beta.enabled = false;
        llm_orchestrator::ProviderStore::upsert(&store, beta).await.unwrap();
        manager.initialize().await.unwrap();

        let report = manager.sync_models_to_registry().await.unwrap();
        assert_eq!(report.pruned, vec!["beta"]);
        assert_eq!(manager.registry().provider_ids().await.unwrap(), vec!["alpha"]);
    }
}
