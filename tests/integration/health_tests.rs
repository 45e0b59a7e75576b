//! Health tracker integration tests
//!
//! Tests cooldown expiry and concurrent marking through the public API.

#[cfg(test)]
mod tests {
    use llm_orchestrator::{CooldownReason, HealthTracker};
    use std::time::Duration;
    use tokio::time::{Instant, advance};

    /// Test a provider recovers exactly when its cooldown expires
    #[tokio::test(start_paused = true)]
    async fn test_cooldown_expiry() {
        let tracker = HealthTracker::new();
        tracker.mark_unhealthy("groq-env", Duration::from_secs(5));

        advance(Duration::from_secs(3)).await;
        assert!(!tracker.is_healthy("groq-env"));

        advance(Duration::from_secs(2)).await;
        assert!(tracker.is_healthy("groq-env"));
        assert!(tracker.entry("groq-env").is_none());
    }

    /// Test a shorter mark never shortens a longer cooldown
    #[tokio::test(start_paused = true)]
    async fn test_longest_cooldown_wins() {
        let tracker = HealthTracker::new();
        tracker.mark_unhealthy("p1", Duration::from_secs(30));
        assert!(!tracker.mark_unhealthy_with_reason(
            "p1",
            Duration::from_secs(10),
            CooldownReason::Timeout
        ));

        advance(Duration::from_secs(15)).await;
        assert!(!tracker.is_healthy("p1"));
        let entry = tracker.entry("p1").unwrap();
        assert_eq!(entry.reason, CooldownReason::Manual);
        assert_eq!(entry.remaining(Instant::now()), Duration::from_secs(15));
    }

    /// Test concurrent marks settle on the maximum expiry
    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_marks() {
        let tracker = HealthTracker::new();
        let tasks: Vec<_> = (1..=50u64)
            .map(|secs| {
                let tracker = tracker.clone();
                tokio::spawn(async move {
                    tracker.mark_unhealthy("p1", Duration::from_secs(secs * 10));
                })
            })
            .collect();
        for task in tasks {
            task.await.unwrap();
        }

        let remaining = tracker.entry("p1").unwrap().remaining(Instant::now());
        assert!(remaining > Duration::from_secs(490));
        assert!(remaining <= Duration::from_secs(500));
    }
}
