//! Upstream error types and HTTP status mapping

use thiserror::Error;

/// Failure talking to an upstream LLM API
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UpstreamError {
    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Rate limited by upstream{}", retry_suffix(.retry_after))]
    RateLimited { retry_after: Option<u64> },

    #[error("Transport error: {0}")]
    Transport(String),

    #[error("Request timed out after {0}s")]
    Timeout(u64),

    #[error("Service unavailable: {0}")]
    Unavailable(String),

    #[error("Model not found: {0}")]
    ModelNotFound(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Content filtered: {0}")]
    ContentFiltered(String),

    #[error("Failed to decode response: {0}")]
    Decode(String),
}

impl UpstreamError {
    /// Map a non-success HTTP response
    pub fn from_status(status: u16, body: &str, retry_after: Option<u64>) -> Self {
        let message = if body.trim().is_empty() {
            format!("HTTP error {}", status)
        } else {
            body.to_string()
        };

        match status {
            401 | 403 => UpstreamError::Authentication(message),
            404 => UpstreamError::ModelNotFound(message),
            408 => UpstreamError::Timeout(0),
            429 => UpstreamError::RateLimited { retry_after },
            400 | 422 if is_content_filter(body) => UpstreamError::ContentFiltered(message),
            400..=499 => UpstreamError::InvalidRequest(message),
            _ => UpstreamError::Unavailable(message),
        }
    }

    /// Map a reqwest failure that happened before a response arrived
    pub fn from_reqwest(error: reqwest::Error, timeout_secs: u64) -> Self {
        if error.is_timeout() {
            UpstreamError::Timeout(timeout_secs)
        } else if error.is_decode() {
            UpstreamError::Decode(error.to_string())
        } else {
            UpstreamError::Transport(error.to_string())
        }
    }

    /// Transient failures worth retrying elsewhere or later
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            UpstreamError::RateLimited { .. }
                | UpstreamError::Transport(_)
                | UpstreamError::Timeout(_)
                | UpstreamError::Unavailable(_)
        )
    }

    /// Whether the upstream answered with a well-formed rejection of the
    /// request itself, which still proves the endpoint is alive
    pub fn is_request_rejection(&self) -> bool {
        matches!(
            self,
            UpstreamError::InvalidRequest(_) | UpstreamError::ContentFiltered(_)
        )
    }

    /// Seconds the upstream asked us to wait, if it said so
    pub fn retry_after(&self) -> Option<u64> {
        match self {
            UpstreamError::RateLimited { retry_after } => *retry_after,
            _ => None,
        }
    }

    /// Closest HTTP status for this error
    pub fn http_status(&self) -> u16 {
        match self {
            UpstreamError::Authentication(_) => 401,
            UpstreamError::RateLimited { .. } => 429,
            UpstreamError::Transport(_) => 502,
            UpstreamError::Timeout(_) => 408,
            UpstreamError::Unavailable(_) => 503,
            UpstreamError::ModelNotFound(_) => 404,
            UpstreamError::InvalidRequest(_) => 400,
            UpstreamError::ContentFiltered(_) => 400,
            UpstreamError::Decode(_) => 502,
        }
    }
}

fn retry_suffix(retry_after: &Option<u64>) -> String {
    retry_after
        .map(|secs| format!(", retry after {}s", secs))
        .unwrap_or_default()
}

fn is_content_filter(body: &str) -> bool {
    let body = body.to_ascii_lowercase();
    ["content_filter", "content_policy", "content policy", "safety"]
        .iter()
        .any(|marker| body.contains(marker))
}
