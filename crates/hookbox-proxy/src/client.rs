// ABOUTME: reqwest-backed InferenceBackend that calls the upstream model-run endpoint.
// ABOUTME: Sends the prompt with a bearer token, enforces a timeout, and never retries.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::json;

use crate::backend::{InferenceBackend, InferenceRequest, ProxyError};

pub const DEFAULT_BASE_URL: &str = "https://api.cloudflare.com/client/v4";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// HTTP client for `POST {base_url}/accounts/{account_id}/ai/run/{model}`.
pub struct InferenceClient {
    client: reqwest::Client,
    base_url: Url,
}

impl InferenceClient {
    /// Create a client for the given base URL with a per-request timeout.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ProxyError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProxyError::Config(e.to_string()))?;

        let raw = base_url.into();
        let base_url = Url::parse(raw.trim_end_matches('/'))
            .map_err(|e| ProxyError::Config(format!("invalid base URL {}: {}", raw, e)))?;
        if base_url.cannot_be_a_base() {
            return Err(ProxyError::Config(format!("invalid base URL {}", raw)));
        }

        Ok(Self { client, base_url })
    }

    pub fn base_url(&self) -> &str {
        self.base_url.as_str().trim_end_matches('/')
    }

    /// Full URL of the model-run endpoint for this request. The account id is
    /// one escaped path segment; the model keeps its `/`-separated segments.
    pub fn endpoint(&self, request: &InferenceRequest) -> Result<Url, ProxyError> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| ProxyError::Config(format!("invalid base URL {}", self.base_url)))?
            .pop_if_empty()
            .push("accounts")
            .push(&request.account_id)
            .push("ai")
            .push("run")
            .extend(request.model.split('/'));
        Ok(url)
    }
}

#[async_trait]
impl InferenceBackend for InferenceClient {
    async fn run(&self, request: &InferenceRequest) -> Result<Vec<u8>, ProxyError> {
        request.validate()?;

        let url = self.endpoint(request)?;
        tracing::debug!("forwarding inference request for model {}", request.model);

        let response = self
            .client
            .post(url)
            .bearer_auth(&request.api_token)
            .json(&json!({ "prompt": request.prompt }))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ProxyError::Timeout
                } else {
                    ProxyError::Transport(e.to_string())
                }
            })?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ProxyError::Upstream {
                status: status.as_u16(),
                body,
            });
        }

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                ProxyError::Timeout
            } else {
                ProxyError::Transport(e.to_string())
            }
        })?;

        Ok(bytes.to_vec())
    }

    fn backend_name(&self) -> &str {
        "http"
    }
}
