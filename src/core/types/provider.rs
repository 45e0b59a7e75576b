//! Provider status view

use crate::config::ProviderType;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Point-in-time view of a cached provider, safe to log and serialize
#[derive(Debug, Clone, Serialize)]
pub struct ProviderStatus {
    pub id: String,
    pub label: String,
    pub provider_type: ProviderType,
    pub base_url: Option<String>,
    /// Derived from the health tracker at the time of the snapshot
    pub is_healthy: bool,
    /// Reason of the active cooldown, if any
    pub cooldown_reason: Option<String>,
    /// Seconds left on the active cooldown
    pub cooldown_remaining_secs: Option<u64>,
    /// Last successful or failed probe
    pub last_checked_at: Option<DateTime<Utc>>,
    /// Declared model ids
    pub models: Vec<String>,
}
