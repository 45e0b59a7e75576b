//! Health tracking types

use crate::core::providers::UpstreamError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::time::Duration;
use tokio::time::Instant;

/// Why a provider was put into cooldown
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CooldownReason {
    /// Upstream answered 429
    RateLimit,
    /// Credential rejected (401/403)
    AuthError,
    /// Model or endpoint not found (404)
    NotFound,
    /// Call did not finish in time
    Timeout,
    /// Connection failure, 5xx or undecodable response
    Network,
    /// Liveness probe failed
    ProbeFailed,
    /// Set by an operator or a caller without a more specific reason
    Manual,
}

impl CooldownReason {
    /// Reason for a failed live call
    ///
    /// Request rejections (invalid request, content filter) say nothing about
    /// the provider's health and map to `None`.
    pub fn from_upstream(error: &UpstreamError) -> Option<Self> {
        match error {
            UpstreamError::RateLimited { .. } => Some(CooldownReason::RateLimit),
            UpstreamError::Authentication(_) => Some(CooldownReason::AuthError),
            UpstreamError::ModelNotFound(_) => Some(CooldownReason::NotFound),
            UpstreamError::Timeout(_) => Some(CooldownReason::Timeout),
            UpstreamError::Transport(_)
            | UpstreamError::Unavailable(_)
            | UpstreamError::Decode(_) => Some(CooldownReason::Network),
            UpstreamError::InvalidRequest(_) | UpstreamError::ContentFiltered(_) => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CooldownReason::RateLimit => "rate_limit",
            CooldownReason::AuthError => "auth_error",
            CooldownReason::NotFound => "not_found",
            CooldownReason::Timeout => "timeout",
            CooldownReason::Network => "network",
            CooldownReason::ProbeFailed => "probe_failed",
            CooldownReason::Manual => "manual",
        }
    }
}

impl fmt::Display for CooldownReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Cooldown record for one provider
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HealthEntry {
    /// The provider is unhealthy strictly before this instant
    pub unhealthy_until: Instant,
    /// Reason recorded with the latest extension
    pub reason: CooldownReason,
    /// Wall-clock time of the latest extension
    pub marked_at: DateTime<Utc>,
}

impl HealthEntry {
    pub fn is_active(&self, now: Instant) -> bool {
        now < self.unhealthy_until
    }

    /// Time left on the cooldown, zero once expired
    pub fn remaining(&self, now: Instant) -> Duration {
        self.unhealthy_until.saturating_duration_since(now)
    }
}
