// src/error.rs

//! Unified error handling for the vocabulary crawler.

use std::fmt;

use thiserror::Error;

/// Result type alias for crawler operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Remote endpoint answered with a non-success status
    #[error("{url} returned status {status}")]
    Remote { url: String, status: u16 },

    /// Request never produced a response (connect, timeout, body read)
    #[error("Request to {url} failed: {message}")]
    Request { url: String, message: String },

    /// Response body did not have the expected shape
    #[error("Could not decode response from {url}: {message}")]
    Decode { url: String, message: String },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Data validation error
    #[error("Validation error: {0}")]
    Validation(String),

    /// The entry point of a crawl could not be fetched
    #[error("Root fetch failed for {url}: {message}")]
    RootFetchFailed { url: String, message: String },
}

impl AppError {
    /// Create a request error for the given URL.
    pub fn request(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Request {
            url: url.into(),
            message: message.to_string(),
        }
    }

    /// Create a decode error for the given URL.
    pub fn decode(url: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Decode {
            url: url.into(),
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

    /// URL of the request this error belongs to, if it is request-scoped.
    pub fn request_url(&self) -> Option<&str> {
        match self {
            Self::Remote { url, .. }
            | Self::Request { url, .. }
            | Self::Decode { url, .. }
            | Self::RootFetchFailed { url, .. } => Some(url),
            _ => None,
        }
    }
}
