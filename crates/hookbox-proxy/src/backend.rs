// ABOUTME: Defines the InferenceBackend trait, the request it accepts, and ProxyError.
// ABOUTME: Also provides base64 encoding of upstream response bodies for text-safe transport.

use async_trait::async_trait;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

/// A single inference call. All four fields are required and must be non-blank.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InferenceRequest {
    #[serde(default)]
    pub account_id: String,
    #[serde(default)]
    pub model: String,
    #[serde(default)]
    pub api_token: String,
    #[serde(default)]
    pub prompt: String,
}

impl InferenceRequest {
    /// Check that every field is present. Reports the first missing field.
    pub fn validate(&self) -> Result<(), ProxyError> {
        let fields = [
            ("account_id", &self.account_id),
            ("model", &self.model),
            ("api_token", &self.api_token),
            ("prompt", &self.prompt),
        ];
        for (name, value) in fields {
            if value.trim().is_empty() {
                return Err(ProxyError::MissingField(name));
            }
        }
        Ok(())
    }
}

/// Errors that can occur while proxying an inference call.
#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Upstream request timed out")]
    Timeout,

    #[error("Upstream request failed: {0}")]
    Transport(String),

    #[error("Upstream error {status}: {body}")]
    Upstream { status: u16, body: String },

    #[error("Invalid client configuration: {0}")]
    Config(String),
}

impl ProxyError {
    /// Whether the failure was caused by the caller's input rather than the upstream.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Self::MissingField(_))
    }
}

/// Anything that can run an inference request and hand back the raw
/// response body. Implemented by the reqwest client and by test stubs.
#[async_trait]
pub trait InferenceBackend: Send + Sync {
    /// Forward the request upstream and return the raw response body.
    async fn run(&self, request: &InferenceRequest) -> Result<Vec<u8>, ProxyError>;

    /// Backend name for logging.
    fn backend_name(&self) -> &str;
}

/// Encode a raw response body as standard base64.
pub fn encode_body(body: &[u8]) -> String {
    STANDARD.encode(body)
}
