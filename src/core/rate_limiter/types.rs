//! Rate limiter types

use crate::utils::error::{OrchestratorError, Result};
use serde::Serialize;
use std::fmt;

/// Budget that rejected a request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LimitKind {
    /// Requests per minute
    Rpm,
    /// Tokens per minute
    Tpm,
    /// Requests per day
    Rpd,
}

impl LimitKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            LimitKind::Rpm => "rpm",
            LimitKind::Tpm => "tpm",
            LimitKind::Rpd => "rpd",
        }
    }
}

impl fmt::Display for LimitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of an admission check
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RateLimitDecision {
    /// Whether the request is admitted
    pub allowed: bool,
    /// First exceeded budget, in rpm, tpm, rpd order
    pub reason: Option<LimitKind>,
}

impl RateLimitDecision {
    pub fn allow() -> Self {
        Self {
            allowed: true,
            reason: None,
        }
    }

    pub fn reject(reason: LimitKind) -> Self {
        Self {
            allowed: false,
            reason: Some(reason),
        }
    }

    pub(super) fn from_exceeded(exceeded: Option<LimitKind>) -> Self {
        match exceeded {
            Some(kind) => Self::reject(kind),
            None => Self::allow(),
        }
    }

    /// Convert a rejection into `OrchestratorError::AdmissionRejected`
    pub fn into_result(self, model: &str) -> Result<()> {
        match self.reason {
            Some(kind) if !self.allowed => Err(OrchestratorError::AdmissionRejected {
                model: model.to_string(),
                limit: kind.to_string(),
            }),
            _ => Ok(()),
        }
    }
}
