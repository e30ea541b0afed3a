// ABOUTME: Configuration loading and validation for the hookbox server.
// ABOUTME: Reads HOOKBOX_* environment variables and resolves the data file location.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use hookbox_proxy::client::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use thiserror::Error;

const DEFAULT_BIND: &str = "0.0.0.0:5000";
const DEFAULT_DATA_FILE: &str = "webhook_data.json";
const DEFAULT_MAX_BODY_BYTES: usize = 2 * 1024 * 1024;

/// Errors that can occur during configuration loading.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("HOOKBOX_BIND is not a valid socket address: {0}")]
    InvalidBind(String),

    #[error("HOOKBOX_DATA_FILE must be a plain file name, got {0:?}")]
    InvalidDataFile(String),

    #[error("HOOKBOX_INFERENCE_TIMEOUT_SECS must be a positive integer, got {0:?}")]
    InvalidTimeout(String),

    #[error("HOOKBOX_MAX_BODY_BYTES must be a positive integer, got {0:?}")]
    InvalidBodyLimit(String),
}

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct HookboxConfig {
    pub home: PathBuf,
    pub data_file: String,
    pub bind: SocketAddr,
    pub inference_base_url: String,
    pub inference_timeout: Duration,
    pub max_body_bytes: usize,
}

impl HookboxConfig {
    /// Load configuration from environment variables with sensible defaults.
    ///
    /// Environment variables:
    /// - HOOKBOX_HOME: data directory (default: ~/.hookbox)
    /// - HOOKBOX_DATA_FILE: collection file name inside the home (default: webhook_data.json)
    /// - HOOKBOX_BIND: socket address to bind (default: 0.0.0.0:5000)
    /// - HOOKBOX_INFERENCE_BASE_URL: upstream inference API base
    /// - HOOKBOX_INFERENCE_TIMEOUT_SECS: upstream request timeout (default: 60)
    /// - HOOKBOX_MAX_BODY_BYTES: request body limit (default: 2 MiB)
    pub fn from_env() -> Result<Self, ConfigError> {
        let home = non_empty_var("HOOKBOX_HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|| {
                std::env::var("HOME")
                    .map(PathBuf::from)
                    .unwrap_or_else(|_| PathBuf::from("/tmp"))
                    .join(".hookbox")
            });

        let data_file =
            non_empty_var("HOOKBOX_DATA_FILE").unwrap_or_else(|| DEFAULT_DATA_FILE.to_string());
        if data_file.contains('/') || data_file.contains('\\') || data_file == "." || data_file == ".." {
            return Err(ConfigError::InvalidDataFile(data_file));
        }

        let bind_str = non_empty_var("HOOKBOX_BIND").unwrap_or_else(|| DEFAULT_BIND.to_string());
        let bind: SocketAddr = bind_str
            .parse()
            .map_err(|_| ConfigError::InvalidBind(bind_str))?;

        let inference_base_url = non_empty_var("HOOKBOX_INFERENCE_BASE_URL")
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let inference_timeout = match non_empty_var("HOOKBOX_INFERENCE_TIMEOUT_SECS") {
            Some(raw) => match raw.parse::<u64>() {
                Ok(secs) if secs > 0 => Duration::from_secs(secs),
                _ => return Err(ConfigError::InvalidTimeout(raw)),
            },
            None => DEFAULT_TIMEOUT,
        };

        let max_body_bytes = match non_empty_var("HOOKBOX_MAX_BODY_BYTES") {
            Some(raw) => match raw.parse::<usize>() {
                Ok(bytes) if bytes > 0 => bytes,
                _ => return Err(ConfigError::InvalidBodyLimit(raw)),
            },
            None => DEFAULT_MAX_BODY_BYTES,
        };

        Ok(Self {
            home,
            data_file,
            bind,
            inference_base_url,
            inference_timeout,
            max_body_bytes,
        })
    }

    /// Full path of the persisted collection.
    pub fn data_path(&self) -> PathBuf {
        self.home.join(&self.data_file)
    }
}

fn non_empty_var(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.is_empty())
}
