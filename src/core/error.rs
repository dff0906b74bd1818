use std::io;
use thiserror::Error;

/// Unified error type for the duochat application
#[derive(Error, Debug)]
pub enum DuochatError {
    /// API-related errors (OpenRouter, Gemini)
    #[error("API error: {0}")]
    Api(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// User input errors
    #[error("Input error: {0}")]
    Input(String),

    /// IO-related errors
    #[error("IO error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Network-related errors
    #[error("Network error: {0}")]
    Network(String),
}

impl From<reqwest::Error> for DuochatError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            DuochatError::Network(format!("Request timed out: {}", err))
        } else if err.is_connect() {
            DuochatError::Network(format!("Connection failed: {}", err))
        } else if err.is_status() {
            DuochatError::Api(format!("API returned error status: {}", err))
        } else {
            DuochatError::Network(format!("Request failed: {}", err))
        }
    }
}

impl From<serde_json::Error> for DuochatError {
    fn from(err: serde_json::Error) -> Self {
        DuochatError::Serialization(format!("JSON error: {}", err))
    }
}

impl From<serde_yml::Error> for DuochatError {
    fn from(err: serde_yml::Error) -> Self {
        DuochatError::Serialization(format!("YAML error: {}", err))
    }
}
