//! Rate limiter integration tests
//!
//! Tests window accounting and atomic admission through the public API.

#[cfg(test)]
mod tests {
    use llm_orchestrator::{LimitKind, OrchestratorError, RateLimiter, RateLimits};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::time::Duration;
    use tokio::time::advance;

    /// Test a full day of minute windows against a daily cap
    #[tokio::test(start_paused = true)]
    async fn test_daily_cap_across_minutes() {
        let limiter = RateLimiter::new();
        let limits = RateLimits::rpm(10).with_rpd(25);

        let mut admitted = 0;
        for _ in 0..5 {
            for _ in 0..10 {
                if limiter.check_and_increment("groq-env/llama", &limits, 0).allowed {
                    admitted += 1;
                }
            }
            advance(Duration::from_secs(60)).await;
        }
        assert_eq!(admitted, 25);

        let decision = limiter.check("groq-env/llama", &limits, 0);
        assert_eq!(decision.reason, Some(LimitKind::Rpd));

        advance(Duration::from_secs(24 * 60 * 60)).await;
        assert!(limiter.check("groq-env/llama", &limits, 0).allowed);
    }

    /// Test tokens accounted after the fact gate later requests
    #[tokio::test(start_paused = true)]
    async fn test_post_hoc_token_accounting() {
        let limiter = RateLimiter::new();
        let limits = RateLimits::default().with_tpm(10_000);

        assert!(limiter.check("m", &limits, 4_000).allowed);
        limiter.increment("m", &limits, 9_500);

        let err = limiter.check("m", &limits, 501).into_result("m").unwrap_err();
        assert!(matches!(err, OrchestratorError::AdmissionRejected { .. }));
        assert!(limiter.check("m", &limits, 500).allowed);

        advance(Duration::from_secs(60)).await;
        assert!(limiter.check("m", &limits, 10_000).allowed);
        assert_eq!(limiter.state("m").unwrap().tokens_this_minute(), 0);
    }

    /// Test atomic admission under contention admits exactly the budget
    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_contended_admission() {
        let limiter = RateLimiter::new();
        let limits = RateLimits::rpm(100).with_tpm(1_000);
        let admitted = Arc::new(AtomicU64::new(0));

        let tasks: Vec<_> = (0..400)
            .map(|_| {
                let limiter = limiter.clone();
                let admitted = admitted.clone();
                tokio::spawn(async move {
                    if limiter.check_and_increment("shared", &limits, 10).allowed {
                        admitted.fetch_add(1, Ordering::SeqCst);
                    }
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        assert_eq!(admitted.load(Ordering::SeqCst), 100);
        let state = limiter.state("shared").unwrap();
        assert_eq!(state.requests_this_minute(), 100);
        assert_eq!(state.tokens_this_minute(), 1_000);
    }

    /// Test idle state is purged after both windows pass
    #[tokio::test(start_paused = true)]
    async fn test_idle_purge() {
        let limiter = RateLimiter::new();
        limiter.increment("a", &RateLimits::rpm(5), 0);
        limiter.increment("b", &RateLimits::rpm(5).with_rpd(100), 0);

        advance(Duration::from_secs(25 * 60 * 60)).await;
        assert_eq!(limiter.purge_idle(), 2);
        assert!(limiter.is_empty());
    }
}
