// ABOUTME: Test utilities for hookbox-proxy, including stub inference backends.
// ABOUTME: Used by server tests to exercise the proxy route without network calls.

use std::sync::Mutex;

use async_trait::async_trait;

use crate::backend::{InferenceBackend, InferenceRequest, ProxyError};

/// A stub backend that returns a pre-configured body and remembers the last
/// request it received.
#[derive(Debug, Default)]
pub struct StubBackend {
    body: Vec<u8>,
    last_request: Mutex<Option<InferenceRequest>>,
}

impl StubBackend {
    /// Create a stub that always answers with `body`.
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: body.into(),
            last_request: Mutex::new(None),
        }
    }

    /// The most recent request passed to `run`, if any.
    pub fn last_request(&self) -> Option<InferenceRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl InferenceBackend for StubBackend {
    async fn run(&self, request: &InferenceRequest) -> Result<Vec<u8>, ProxyError> {
        request.validate()?;
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request.clone());
        Ok(self.body.clone())
    }

    fn backend_name(&self) -> &str {
        "stub"
    }
}

/// A stub backend whose upstream always fails with the given status and text.
#[derive(Debug, Clone)]
pub struct FailingBackend {
    status: u16,
    body: String,
}

impl FailingBackend {
    pub fn new(status: u16, body: &str) -> Self {
        Self {
            status,
            body: body.to_owned(),
        }
    }
}

#[async_trait]
impl InferenceBackend for FailingBackend {
    async fn run(&self, request: &InferenceRequest) -> Result<Vec<u8>, ProxyError> {
        request.validate()?;
        Err(ProxyError::Upstream {
            status: self.status,
            body: self.body.clone(),
        })
    }

    fn backend_name(&self) -> &str {
        "failing"
    }
}
