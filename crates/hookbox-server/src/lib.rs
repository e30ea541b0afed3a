// ABOUTME: HTTP server for hookbox, exposing the record store and the inference proxy.
// ABOUTME: Uses Axum with shared state holding the RecordStore and an InferenceBackend.

pub mod api;
pub mod app_state;
pub mod config;
pub mod routes;
pub mod web;

pub use app_state::{AppState, SharedState, StateError};
pub use config::{ConfigError, HookboxConfig};
pub use routes::create_router;
