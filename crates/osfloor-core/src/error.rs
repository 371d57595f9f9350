//! Core error types for osfloor-core.
//!
//! Every fallible operation in the library returns [`CoreError`] (through the
//! [`Result`] alias). The sub-enums group failures by the stage that raised
//! them so the CLI can report them without string matching.

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for osfloor-core.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Payload validation errors
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),

    /// Management API returned a non-success status
    #[error("Management API error: {0}")]
    Api(#[from] ApiError),

    /// Transport-level HTTP failure
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Release feed errors
    #[error("Release feed error: {0}")]
    Feed(#[from] FeedError),

    /// Credential errors
    #[error("Authentication error: {0}")]
    Auth(#[from] AuthError),

    /// Configured policy id was not among the fetched records
    #[error("Compliance policy '{0}' not found")]
    PolicyNotFound(String),

    /// IO errors
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to load configuration
    #[error("Failed to load configuration from {path}: {message}")]
    LoadFailed { path: PathBuf, message: String },

    /// Failed to save configuration
    #[error("Failed to save configuration to {path}: {message}")]
    SaveFailed { path: PathBuf, message: String },

    /// Invalid configuration value
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// Missing required configuration key
    #[error("Missing required configuration key: {0}")]
    MissingKey(String),

    /// Failed to parse configuration
    #[error("Failed to parse configuration: {0}")]
    ParseFailed(String),
}

/// Validation errors.
#[derive(Error, Debug)]
pub enum ValidationError {
    /// Payload is not well-formed JSON
    #[error("Invalid JSON payload: {0}")]
    InvalidJson(String),

    /// Invalid value
    #[error("Invalid value for '{field}': {message}")]
    InvalidValue { field: String, message: String },
}

/// Error reported by the management API.
///
/// `code` and `message` come from the Graph error envelope
/// `{"error":{"code":..,"message":..}}` when the body carries one.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("HTTP {status}: {code}: {message}")]
pub struct ApiError {
    pub status: u16,
    pub code: String,
    pub message: String,
}

impl ApiError {
    /// Build from a status code and raw response body.
    pub fn from_body(status: u16, body: &str) -> Self {
        let parsed: Option<serde_json::Value> = serde_json::from_str(body).ok();
        let error = parsed.as_ref().and_then(|v| v.get("error"));

        let code = error
            .and_then(|e| e.get("code"))
            .and_then(|c| c.as_str())
            .unwrap_or("unknown")
            .to_string();

        let message = error
            .and_then(|e| e.get("message"))
            .and_then(|m| m.as_str())
            .map(str::to_string)
            .unwrap_or_else(|| body.trim().to_string());

        Self {
            status,
            code,
            message,
        }
    }
}

/// Release feed errors.
#[derive(Error, Debug)]
pub enum FeedError {
    /// Feed endpoint answered with a non-success status
    #[error("feed request failed with HTTP {status}")]
    Http { status: u16 },

    /// Document could not be parsed as XML
    #[error("failed to parse feed: {0}")]
    Parse(String),
}

/// Credential errors.
#[derive(Error, Debug)]
pub enum AuthError {
    /// No token available from any source
    #[error("No management API token available; run `osfloor auth login --token <TOKEN>`")]
    NotAuthenticated,

    /// OS keyring failure
    #[error("Keyring error: {0}")]
    Keyring(String),
}

impl From<keyring::Error> for AuthError {
    fn from(err: keyring::Error) -> Self {
        AuthError::Keyring(err.to_string())
    }
}

/// Result type alias for CoreError
pub type Result<T, E = CoreError> = std::result::Result<T, E>;
