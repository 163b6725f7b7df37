// src/error.rs

//! Unified error handling for the tracker application.

use std::fmt;

use thiserror::Error;

/// Result type alias for tracker operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// A data artifact could not be read
    #[error("Failed to load {path}: {message}")]
    Artifact { path: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// Required environment variable is absent or empty
    #[error("Missing environment variable: {0}")]
    MissingEnv(String),

    /// Package index returned something unusable
    #[error("Index error for {context}: {message}")]
    Index { context: String, message: String },

    /// Package classified by the diff but absent from every snapshot
    #[error("Package '{0}' not found in any current snapshot")]
    Lookup(String),

    /// Posting an announcement failed
    #[error("Publish error: {0}")]
    Publish(String),

    /// All retry attempts failed
    #[error("Gave up on {operation} after {attempts} attempts: {last}")]
    RetryExhausted {
        operation: String,
        attempts: u32,
        last: Box<AppError>,
    },
}

impl AppError {
    /// Create an artifact loading error.
    pub fn artifact(path: impl fmt::Display, message: impl fmt::Display) -> Self {
        Self::Artifact {
            path: path.to_string(),
            message: message.to_string(),
        }
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    /// Create an index error with context.
    pub fn index(context: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Index {
            context: context.into(),
            message: message.to_string(),
        }
    }

    /// Create a publish error.
    pub fn publish(message: impl fmt::Display) -> Self {
        Self::Publish(message.to_string())
    }
}
