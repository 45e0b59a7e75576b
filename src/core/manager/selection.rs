//! Provider/model selection

use super::manager::ProviderManager;
use crate::core::rate_limiter::{RateLimitDecision, RateLimits};
use crate::core::types::qualified_model_id;
use crate::utils::error::{OrchestratorError, Result};
use serde::Serialize;
use tracing::debug;

/// Provider and concrete model chosen for a request
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub provider_id: String,
    pub model_id: String,
    /// Key the request is accounted under in the rate limiter
    pub rate_limit_key: String,
    pub limits: RateLimits,
}

impl ProviderManager {
    /// Pick a provider and model for `model_class` without consuming budget
    ///
    /// Providers are visited in id order; within a provider, declared models
    /// in declaration order. The first healthy pair whose budget admits one
    /// more request of `estimated_tokens` wins. The caller accounts the
    /// request afterwards with [`ProviderManager::record_usage`].
    pub fn select(&self, model_class: &str, estimated_tokens: u64) -> Result<Selection> {
        self.select_with(model_class, |key, limits| {
            self.rate_limiter.check(key, limits, estimated_tokens)
        })
    }

    /// Like [`ProviderManager::select`], but atomically reserves one request
    /// of `estimated_tokens` against the chosen model's budget
    pub fn select_and_reserve(&self, model_class: &str, estimated_tokens: u64) -> Result<Selection> {
        self.select_with(model_class, |key, limits| {
            self.rate_limiter
                .check_and_increment(key, limits, estimated_tokens)
        })
    }

    /// Account a dispatched request against its selection
    pub fn record_usage(&self, selection: &Selection, tokens: u64) {
        self.rate_limiter
            .increment(&selection.rate_limit_key, &selection.limits, tokens);
    }

    fn select_with<F>(&self, model_class: &str, admit: F) -> Result<Selection>
    where
        F: Fn(&str, &RateLimits) -> RateLimitDecision,
    {
        let mut unhealthy = 0;
        let mut rate_limited = 0;

        for handle in self.handles() {
            let provider_id = handle.id();
            let mut candidates = handle.config.models_serving(model_class).peekable();
            if candidates.peek().is_none() {
                continue;
            }
            if !self.health.is_healthy(provider_id) {
                debug!(provider = %provider_id, model = %model_class, "Skipping provider in cooldown");
                unhealthy += 1;
                continue;
            }

            for model in candidates {
                let key = qualified_model_id(provider_id, &model.id);
                let decision = admit(&key, &model.limits);
                if decision.allowed {
                    debug!(provider = %provider_id, model = %model.id, "Selected provider");
                    return Ok(Selection {
                        provider_id: provider_id.to_string(),
                        model_id: model.id.clone(),
                        rate_limit_key: key,
                        limits: model.limits,
                    });
                }
                debug!(
                    provider = %provider_id,
                    model = %model.id,
                    limit = ?decision.reason,
                    "Skipping rate limited model"
                );
                rate_limited += 1;
            }
        }

        Err(OrchestratorError::NoEligibleProvider {
            model: model_class.to_string(),
            unhealthy,
            rate_limited,
        })
    }
}
