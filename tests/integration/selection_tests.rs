//! Selection integration tests
//!
//! Tests failover between providers as cooldowns and budgets change.

#[cfg(test)]
mod tests {
    use crate::common::{ConfigFactory, MockUpstream, ProviderFactory};
    use llm_orchestrator::{OrchestratorError, ProviderManager, RateLimits, UpstreamError};

    async fn two_providers() -> (ProviderManager, MockUpstream, MockUpstream) {
        let primary = MockUpstream::start().await;
        let secondary = MockUpstream::start().await;
        let manager = ConfigFactory::manager(ConfigFactory::with_providers(vec![
            ProviderFactory::custom("a-primary", &primary.base_url())
                .with_model(ProviderFactory::model("llama-70b", "smart", RateLimits::rpm(2)))
                .with_model(ProviderFactory::model("llama-8b", "fast", RateLimits::rpm(3))),
            ProviderFactory::custom("b-secondary", &secondary.base_url())
                .with_model(ProviderFactory::model("llama-70b", "smart", RateLimits::rpm(1))),
        ]));
        manager.initialize().await.unwrap();
        (manager, primary, secondary)
    }

    /// Test selection spills over to the next provider when budgets run out
    #[tokio::test]
    async fn test_budget_spillover() {
        let (manager, _primary, _secondary) = two_providers().await;

        let mut picks = Vec::new();
        for _ in 0..3 {
            let selection = crate::assert_ok!(manager.select_and_reserve("smart", 100));
            picks.push(selection.provider_id);
        }
        assert_eq!(picks, vec!["a-primary", "a-primary", "b-secondary"]);

        let err = crate::assert_err!(manager.select_and_reserve("smart", 100));
        assert!(matches!(
            err,
            OrchestratorError::NoEligibleProvider {
                unhealthy: 0,
                rate_limited: 2,
                ..
            }
        ));
    }

    /// Test a cooling provider is skipped and selection falls over
    #[tokio::test]
    async fn test_cooldown_failover() {
        let (manager, _primary, _secondary) = two_providers().await;

        manager.report_failure("a-primary", &UpstreamError::Unavailable("HTTP 503".to_string()));
        let selection = manager.select("smart", 0).unwrap();
        assert_eq!(selection.provider_id, "b-secondary");
        assert_eq!(selection.rate_limit_key, "b-secondary/llama-70b");

        // Only the primary serves the fast class
        let err = manager.select("fast", 0).unwrap_err();
        assert!(matches!(
            err,
            OrchestratorError::NoEligibleProvider { unhealthy: 1, .. }
        ));
    }

    /// Test a concrete model id matches regardless of class
    #[tokio::test]
    async fn test_select_by_model_id() {
        let (manager, _primary, _secondary) = two_providers().await;

        let selection = manager.select("llama-8b", 0).unwrap();
        assert_eq!(selection.provider_id, "a-primary");
        assert_eq!(selection.model_id, "llama-8b");
        assert_eq!(selection.limits, RateLimits::rpm(3));
    }

    /// Test request rejections never cool a provider down
    #[tokio::test]
    async fn test_request_rejection_keeps_provider() {
        let (manager, _primary, _secondary) = two_providers().await;

        assert!(!manager.report_failure(
            "a-primary",
            &UpstreamError::ContentFiltered("flagged".to_string())
        ));
        assert_eq!(manager.select("smart", 0).unwrap().provider_id, "a-primary");
    }
}
