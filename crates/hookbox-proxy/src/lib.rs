// ABOUTME: Inference proxy for hookbox: forwards one prompt to an upstream model API.
// ABOUTME: Exposes the InferenceBackend trait, the reqwest-backed client, and test stubs.

pub mod backend;
pub mod client;
pub mod testing;

pub use backend::{InferenceBackend, InferenceRequest, ProxyError, encode_body};
pub use client::InferenceClient;
