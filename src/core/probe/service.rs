//! Probe service implementation

use super::types::ProbeOutcome;
use crate::config::ProbeConfig;
use crate::core::health::CooldownReason;
use crate::core::providers::{CompletionRequest, UpstreamClient};
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;
use futures::FutureExt;
use futures::future::{BoxFuture, Shared};
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

type ProbeKey = (String, String);
type InFlight = Shared<BoxFuture<'static, ProbeOutcome>>;

/// Runs liveness probes with a bounded timeout and single-flight per pair
///
/// The service only reports outcomes. Health and rate-limit state are left
/// to the caller.
#[derive(Clone)]
pub struct ProbeService {
    config: ProbeConfig,
    in_flight: Arc<DashMap<ProbeKey, InFlight>>,
}

impl ProbeService {
    pub fn new(config: ProbeConfig) -> Self {
        Self {
            config,
            in_flight: Arc::new(DashMap::new()),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_secs)
    }

    /// Probe `model_id` through `client`
    ///
    /// A caller arriving while a probe for the same pair is running waits for
    /// that probe and receives its outcome. The upstream call runs on its own
    /// task, so dropping the caller does not abandon it.
    pub async fn probe(&self, client: Arc<dyn UpstreamClient>, model_id: &str) -> ProbeOutcome {
        self.probe_with(client, model_id, |_| {}).await
    }

    /// Probe and run `on_outcome` once per upstream call
    ///
    /// The hook of the caller that started the call runs as soon as the
    /// outcome is known, before any waiter resumes. Hooks of callers that
    /// joined an in-flight probe are dropped.
    pub async fn probe_with<F>(
        &self,
        client: Arc<dyn UpstreamClient>,
        model_id: &str,
        on_outcome: F,
    ) -> ProbeOutcome
    where
        F: FnOnce(&ProbeOutcome) + Send + 'static,
    {
        let key = (client.provider_id().to_string(), model_id.to_string());

        let probe = match self.in_flight.entry(key.clone()) {
            Entry::Occupied(occupied) => {
                debug!(provider = %key.0, model = %key.1, "Joining in-flight probe");
                occupied.get().clone()
            }
            Entry::Vacant(vacant) => {
                let request = CompletionRequest::probe(
                    model_id,
                    self.config.prompt.clone(),
                    self.config.max_tokens,
                );
                let timeout = self.timeout();
                let in_flight = self.in_flight.clone();
                let task_key = key.clone();
                // Detached so the call completes and clears its entry even
                // when every caller stops waiting
                let task = tokio::spawn(async move {
                    let outcome = run_probe(client, request, timeout).await;
                    on_outcome(&outcome);
                    in_flight.remove(&task_key);
                    outcome
                });
                let probe = async move {
                    task.await.unwrap_or_else(|e| ProbeOutcome::Failed {
                        reason: CooldownReason::ProbeFailed,
                        message: format!("Probe task failed: {}", e),
                        retry_after: None,
                    })
                }
                .boxed()
                .shared();
                vacant.insert(probe.clone());
                probe
            }
        };

        let outcome = probe.await;
        // Only reached with the entry still present if the task panicked
        self.in_flight.remove_if(&key, |_, probe| probe.peek().is_some());
        outcome
    }

    /// Number of distinct pairs with a probe in flight
    pub fn in_flight(&self) -> usize {
        self.in_flight.len()
    }
}

async fn run_probe(
    client: Arc<dyn UpstreamClient>,
    request: CompletionRequest,
    timeout: Duration,
) -> ProbeOutcome {
    let provider_id = client.provider_id().to_string();
    let model_id = request.model.clone();
    let started = Instant::now();

    let outcome = match tokio::time::timeout(timeout, client.complete(request)).await {
        Ok(Ok(_)) => ProbeOutcome::Reachable {
            latency: started.elapsed(),
        },
        Ok(Err(error)) if error.is_request_rejection() => ProbeOutcome::Reachable {
            latency: started.elapsed(),
        },
        Ok(Err(error)) => ProbeOutcome::Failed {
            reason: CooldownReason::from_upstream(&error).unwrap_or(CooldownReason::ProbeFailed),
            message: error.to_string(),
            retry_after: error.retry_after().map(Duration::from_secs),
        },
        Err(_) => ProbeOutcome::Failed {
            reason: CooldownReason::Timeout,
            message: format!("Probe timed out after {}s", timeout.as_secs()),
            retry_after: None,
        },
    };

    debug!(
        provider = %provider_id,
        model = %model_id,
        reachable = outcome.is_reachable(),
        "Probe finished"
    );
    outcome
}
