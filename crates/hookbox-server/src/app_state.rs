// ABOUTME: Shared application state for the hookbox HTTP server.
// ABOUTME: Holds the record store, the inference backend, and request limits.

use std::sync::Arc;

use hookbox_proxy::{InferenceBackend, InferenceClient, ProxyError};
use hookbox_store::{RecordStore, StoreError};
use thiserror::Error;

use crate::config::HookboxConfig;

/// Errors that can occur while assembling the application state.
#[derive(Debug, Error)]
pub enum StateError {
    #[error("failed to open record store: {0}")]
    Store(#[from] StoreError),

    #[error("failed to build inference client: {0}")]
    Proxy(#[from] ProxyError),
}

/// Shared application state accessible by all Axum handlers.
pub struct AppState {
    pub store: Arc<RecordStore>,
    pub inference: Arc<dyn InferenceBackend>,
    pub max_body_bytes: usize,
}

/// Type alias for the Arc-wrapped state used with Axum's State extractor.
pub type SharedState = Arc<AppState>;

impl AppState {
    /// Create a new AppState from an opened store and an inference backend.
    pub fn new(store: RecordStore, inference: Arc<dyn InferenceBackend>, max_body_bytes: usize) -> Self {
        Self {
            store: Arc::new(store),
            inference,
            max_body_bytes,
        }
    }

    /// Build the production state: the store at the configured data path and
    /// the HTTP inference client.
    pub fn from_config(config: &HookboxConfig) -> Result<Self, StateError> {
        let store = RecordStore::open(config.data_path())?;
        let client = InferenceClient::new(
            config.inference_base_url.clone(),
            config.inference_timeout,
        )?;

        tracing::info!("record store at {}", store.path().display());

        Ok(Self::new(store, Arc::new(client), config.max_body_bytes))
    }
}
