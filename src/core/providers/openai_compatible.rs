//! OpenAI-compatible HTTP client
//!
//! Every supported provider family exposes `GET /models` and
//! `POST /chat/completions` in the OpenAI shape, so a single reqwest-backed
//! client serves them all.

use super::client::{CompletionRequest, CompletionResponse, UpstreamClient, Usage};
use super::decode::parse_model_list;
use super::error::UpstreamError;
use crate::core::types::LLMModel;
use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, RETRY_AFTER};
use reqwest::{Client, Response};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::debug;

/// Client for one OpenAI-compatible endpoint
#[derive(Clone)]
pub struct OpenAiCompatibleClient {
    provider_id: String,
    base_url: String,
    api_key: Option<String>,
    timeout: Duration,
    http_client: Client,
}

impl OpenAiCompatibleClient {
    /// Create a client; `base_url` is the API root (e.g. `https://api.groq.com/openai/v1`)
    pub fn new(
        provider_id: impl Into<String>,
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
    ) -> Result<Self, UpstreamError> {
        let http_client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| UpstreamError::Transport(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self {
            provider_id: provider_id.into(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.filter(|key| !key.trim().is_empty()),
            timeout,
            http_client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    fn headers(&self) -> Result<HeaderMap, UpstreamError> {
        let mut headers = HeaderMap::new();
        if let Some(api_key) = &self.api_key {
            let value = HeaderValue::from_str(&format!("Bearer {}", api_key))
                .map_err(|_| UpstreamError::Authentication("API key is not a valid header".to_string()))?;
            headers.insert(reqwest::header::AUTHORIZATION, value);
        }
        Ok(headers)
    }

    /// Turn a response into its JSON body, mapping non-success statuses
    async fn json_body(&self, response: Response) -> Result<Value, UpstreamError> {
        let status = response.status();
        if !status.is_success() {
            let retry_after = response
                .headers()
                .get(RETRY_AFTER)
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.trim().parse::<u64>().ok());
            let body = response.text().await.unwrap_or_default();
            debug!(
                provider = %self.provider_id,
                status = status.as_u16(),
                "Upstream returned error status"
            );
            return Err(UpstreamError::from_status(status.as_u16(), &body, retry_after));
        }

        let text = response
            .text()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, self.timeout.as_secs()))?;
        serde_json::from_str(&text).map_err(|e| UpstreamError::Decode(e.to_string()))
    }
}

impl fmt::Debug for OpenAiCompatibleClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCompatibleClient")
            .field("provider_id", &self.provider_id)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .field("timeout", &self.timeout)
            .finish()
    }
}

#[async_trait]
impl UpstreamClient for OpenAiCompatibleClient {
    fn provider_id(&self) -> &str {
        &self.provider_id
    }

    async fn list_models(&self) -> Result<Vec<LLMModel>, UpstreamError> {
        let response = self
            .http_client
            .get(self.url("models"))
            .headers(self.headers()?)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, self.timeout.as_secs()))?;

        let body = self.json_body(response).await?;
        parse_model_list(&self.provider_id, &body)
    }

    async fn complete(
        &self,
        request: CompletionRequest,
    ) -> Result<CompletionResponse, UpstreamError> {
        let response = self
            .http_client
            .post(self.url("chat/completions"))
            .headers(self.headers()?)
            .json(&request)
            .send()
            .await
            .map_err(|e| UpstreamError::from_reqwest(e, self.timeout.as_secs()))?;

        let body = self.json_body(response).await?;
        parse_completion(&body)
    }
}

fn parse_completion(body: &Value) -> Result<CompletionResponse, UpstreamError> {
    let choices = body
        .get("choices")
        .and_then(Value::as_array)
        .ok_or_else(|| UpstreamError::Decode("missing choices".to_string()))?;

    let content = choices
        .first()
        .and_then(|choice| choice.get("message"))
        .and_then(|message| message.get("content"))
        .and_then(Value::as_str)
        .map(str::to_string);

    let usage = body
        .get("usage")
        .and_then(|usage| serde_json::from_value::<Usage>(usage.clone()).ok());

    Ok(CompletionResponse {
        id: body.get("id").and_then(Value::as_str).unwrap_or_default().to_string(),
        model: body.get("model").and_then(Value::as_str).unwrap_or_default().to_string(),
        content,
        usage,
    })
}
