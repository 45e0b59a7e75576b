//! Probe result types

use crate::core::health::CooldownReason;
use crate::utils::error::{OrchestratorError, Result};
use std::time::Duration;

/// Result of one probe
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// The endpoint answered with a well-formed response
    Reachable { latency: Duration },
    /// The endpoint could not serve the probe
    Failed {
        reason: CooldownReason,
        message: String,
        /// Wait requested by the upstream, if any
        retry_after: Option<Duration>,
    },
}

impl ProbeOutcome {
    pub fn is_reachable(&self) -> bool {
        matches!(self, ProbeOutcome::Reachable { .. })
    }

    /// Convert a failure into `OrchestratorError::ProbeFailure`
    pub fn into_result(self, provider_id: &str, model_id: &str) -> Result<Duration> {
        match self {
            ProbeOutcome::Reachable { latency } => Ok(latency),
            ProbeOutcome::Failed { message, .. } => Err(OrchestratorError::ProbeFailure {
                provider: provider_id.to_string(),
                model: model_id.to_string(),
                message,
            }),
        }
    }
}
