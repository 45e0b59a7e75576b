//! Probe integration tests
//!
//! Tests liveness probes, cooldowns and recovery over real HTTP.

#[cfg(test)]
mod tests {
    use crate::common::{ConfigFactory, MockUpstream, ProviderFactory};
    use llm_orchestrator::config::ModelDeclaration;
    use llm_orchestrator::{CooldownReason, OrchestratorError, RateLimits};
    use std::sync::Arc;
    use std::time::Duration;

    /// Test probe failure cools down and a later success recovers
    #[tokio::test]
    async fn test_probe_failure_then_recovery() {
        let upstream = MockUpstream::start().await;
        upstream.fail_completions(503, None).await;

        let manager = ConfigFactory::manager(ConfigFactory::with_providers(vec![
            ProviderFactory::custom("alpha", &upstream.base_url())
                .with_model(ProviderFactory::model("m1", "fast", RateLimits::default())),
        ]));
        manager.initialize().await.unwrap();

        assert!(!manager.probe("alpha", "m1").await.unwrap());
        assert!(matches!(
            manager.require_healthy("alpha"),
            Err(OrchestratorError::ProviderUnhealthy(_))
        ));
        assert!(matches!(
            manager.select("fast", 0),
            Err(OrchestratorError::NoEligibleProvider { unhealthy: 1, .. })
        ));

        upstream.reset().await;
        upstream.serve_completions().await;

        assert!(manager.probe("alpha", "m1").await.unwrap());
        assert!(manager.is_healthy("alpha"));
        assert_eq!(manager.select("fast", 0).unwrap().provider_id, "alpha");
    }

    /// Test a rejected probe request still proves the provider reachable
    #[tokio::test]
    async fn test_probe_request_rejection_is_reachable() {
        let upstream = MockUpstream::start().await;
        upstream.fail_completions(400, None).await;

        let manager = ConfigFactory::manager(ConfigFactory::with_providers(vec![
            ProviderFactory::custom("alpha", &upstream.base_url()),
        ]));
        manager.initialize().await.unwrap();

        assert!(manager.probe("alpha", "m1").await.unwrap());
        assert!(manager.is_healthy("alpha"));
    }

    /// Test authentication failures are recorded with their reason
    #[tokio::test]
    async fn test_probe_auth_failure_reason() {
        let upstream = MockUpstream::start().await;
        upstream.fail_completions(401, None).await;

        let manager = ConfigFactory::manager(ConfigFactory::with_providers(vec![
            ProviderFactory::custom("alpha", &upstream.base_url()),
        ]));
        manager.initialize().await.unwrap();

        assert!(!manager.probe("alpha", "m1").await.unwrap());
        let entry = manager.health().entry("alpha").unwrap();
        assert_eq!(entry.reason, CooldownReason::AuthError);
        assert_eq!(manager.health().consecutive_failures("alpha"), 1);
    }

    /// Test a slow upstream fails the probe with a timeout
    #[tokio::test]
    async fn test_probe_timeout() {
        let upstream = MockUpstream::start().await;
        upstream.serve_completions_after(Duration::from_secs(5)).await;

        let mut config = ConfigFactory::with_providers(vec![
            ProviderFactory::custom("alpha", &upstream.base_url()),
        ]);
        config.probe.timeout_secs = 1;
        let manager = ConfigFactory::manager(config);
        manager.initialize().await.unwrap();

        assert!(!manager.probe("alpha", "m1").await.unwrap());
        assert_eq!(
            manager.health().entry("alpha").map(|e| e.reason),
            Some(CooldownReason::Timeout)
        );
    }

    /// Test concurrent probes of one pair share a single upstream call
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_probes_single_flight() {
        let upstream = MockUpstream::start().await;
        upstream
            .serve_completions_after(Duration::from_millis(300))
            .await;

        let manager = Arc::new(ConfigFactory::manager(ConfigFactory::with_providers(vec![
            ProviderFactory::custom("alpha", &upstream.base_url()),
        ])));
        manager.initialize().await.unwrap();

        let tasks: Vec<_> = (0..5)
            .map(|_| {
                let manager = manager.clone();
                tokio::spawn(async move { manager.probe("alpha", "m1").await.unwrap() })
            })
            .collect();
        for task in tasks {
            assert!(task.await.unwrap());
        }

        assert_eq!(upstream.completion_requests().await, 1);
    }

    /// Test probe_all uses the first declared model of each provider
    #[tokio::test]
    async fn test_probe_all() {
        let up = MockUpstream::start().await;
        up.serve_completions().await;
        let down = MockUpstream::start().await;
        down.fail_completions(502, None).await;

        let manager = ConfigFactory::manager(ConfigFactory::with_providers(vec![
            ProviderFactory::custom("alpha", &up.base_url()).with_model(ModelDeclaration::new("a1")),
            ProviderFactory::custom("beta", &down.base_url()).with_model(ModelDeclaration::new("b1")),
        ]));
        manager.initialize().await.unwrap();

        let outcomes = manager.probe_all().await;
        assert_eq!(outcomes.get("alpha"), Some(&true));
        assert_eq!(outcomes.get("beta"), Some(&false));
        assert_eq!(manager.health().entry("beta").map(|e| e.reason), Some(CooldownReason::Network));
    }
}
