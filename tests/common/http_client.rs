//! HTTP client helpers for tests.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::time::Duration;

const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

pub struct TestClient {
    client: reqwest::Client,
    base_url: String,
}

impl TestClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(DEFAULT_TIMEOUT)
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client,
            base_url: base_url.into(),
        }
    }

    fn url(&self, path: &str) -> String {
        let path = path.trim_start_matches('/');
        format!("{}/{}", self.base_url, path)
    }

    /// Posts a question and returns the parsed body with the cache status header.
    pub async fn query(
        &self,
        question: &str,
        user_id: &str,
    ) -> Result<(QueryReply, String), TestClientError> {
        let resp = self
            .client
            .post(self.url("/query"))
            .json(&serde_json::json!({"question": question, "userId": user_id}))
            .send()
            .await?;

        let cache_status = resp
            .headers()
            .get("x-campus-cache")
            .and_then(|h| h.to_str().ok())
            .unwrap_or("unknown")
            .to_string();

        match resp.status().as_u16() {
            200 => Ok((resp.json().await?, cache_status)),
            400 => Err(TestClientError::BadRequest(resp.text().await?)),
            status => {
                let body = resp.text().await.unwrap_or_default();
                Err(TestClientError::UnexpectedStatus(status, body))
            }
        }
    }

    pub async fn get_json(&self, path: &str) -> Result<Value, TestClientError> {
        let resp = self.client.get(self.url(path)).send().await?;

        if resp.status().is_success() {
            Ok(resp.json().await?)
        } else {
            let status = resp.status().as_u16();
            let body = resp.text().await.unwrap_or_default();
            Err(TestClientError::UnexpectedStatus(status, body))
        }
    }

    pub async fn health(&self) -> Result<HealthResponse, TestClientError> {
        let value = self.get_json("/healthz").await?;
        Ok(serde_json::from_value(value)?)
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HealthResponse {
    pub status: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QueryReply {
    pub answer: String,
    pub sources: Vec<Value>,
    pub has_visual_content: bool,
    pub cached: bool,
    pub similarity: Option<f32>,
    pub deadline: Option<Value>,
    pub confidence: Option<Value>,
}

#[derive(Debug, thiserror::Error)]
pub enum TestClientError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(#[from] reqwest::Error),

    #[error("Invalid response body: {0}")]
    InvalidBody(#[from] serde_json::Error),

    #[error("Unexpected HTTP status: {0} - Body: {1}")]
    UnexpectedStatus(u16, String),

    #[error("Bad request: {0}")]
    BadRequest(String),
}
