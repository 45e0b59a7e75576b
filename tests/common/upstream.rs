//! Mock OpenAI-compatible upstreams
//!
//! Each [`MockUpstream`] is a real HTTP server, so the orchestrator is
//! exercised through its production client.

use super::fixtures::completion_body;
use serde_json::Value;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// A wiremock server answering `/v1/models` and `/v1/chat/completions`
pub struct MockUpstream {
    server: MockServer,
}

impl MockUpstream {
    pub async fn start() -> Self {
        Self {
            server: MockServer::start().await,
        }
    }

    /// API root to configure on a provider
    pub fn base_url(&self) -> String {
        format!("{}/v1", self.server.uri())
    }

    pub fn server(&self) -> &MockServer {
        &self.server
    }

    pub async fn serve_models(&self, body: Value) {
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }

    pub async fn fail_models(&self, status: u16) {
        Mock::given(method("GET"))
            .and(path("/v1/models"))
            .respond_with(ResponseTemplate::new(status).set_body_string("upstream failure"))
            .mount(&self.server)
            .await;
    }

    pub async fn serve_completions(&self) {
        self.serve_completions_after(Duration::ZERO).await;
    }

    pub async fn serve_completions_after(&self, delay: Duration) {
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(completion_body("test-model"))
                    .set_delay(delay),
            )
            .mount(&self.server)
            .await;
    }

    pub async fn fail_completions(&self, status: u16, retry_after: Option<u64>) {
        let mut response = ResponseTemplate::new(status)
            .set_body_json(serde_json::json!({ "error": { "message": "upstream failure" } }));
        if let Some(secs) = retry_after {
            response = response.insert_header("retry-after", secs.to_string().as_str());
        }
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(response)
            .mount(&self.server)
            .await;
    }

    /// Drop every mounted response and recorded request
    pub async fn reset(&self) {
        self.server.reset().await;
    }

    /// Number of chat completion requests received so far
    pub async fn completion_requests(&self) -> usize {
        self.server
            .received_requests()
            .await
            .unwrap_or_default()
            .iter()
            .filter(|request| request.url.path() == "/v1/chat/completions")
            .count()
    }
}
