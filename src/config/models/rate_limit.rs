//! Rate limiting configuration

use super::*;
use serde::{Deserialize, Serialize};

/// Per-model rate-limit budget
///
/// Each limit is independently optional; an unset limit is not enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RateLimits {
    /// Requests per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpm: Option<u64>,
    /// Tokens per minute
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tpm: Option<u64>,
    /// Requests per day
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rpd: Option<u64>,
}

impl RateLimits {
    /// No limits at all
    pub const UNLIMITED: RateLimits = RateLimits {
        rpm: None,
        tpm: None,
        rpd: None,
    };

    pub fn rpm(rpm: u64) -> Self {
        Self {
            rpm: Some(rpm),
            ..Self::UNLIMITED
        }
    }

    pub fn with_tpm(mut self, tpm: u64) -> Self {
        self.tpm = Some(tpm);
        self
    }

    pub fn with_rpd(mut self, rpd: u64) -> Self {
        self.rpd = Some(rpd);
        self
    }

    /// True when no limit is configured
    pub fn is_unlimited(&self) -> bool {
        self.rpm.is_none() && self.tpm.is_none() && self.rpd.is_none()
    }
}

/// Rate limiter housekeeping configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RateLimitConfig {
    /// Interval between sweeps of idle counters, in seconds (0 disables)
    #[serde(default = "default_sweep_interval")]
    pub sweep_interval_secs: u64,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            sweep_interval_secs: default_sweep_interval(),
        }
    }
}
