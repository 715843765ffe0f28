//! Client error types.

use crate::store::StoreError;
use serde_json::Value;
use thiserror::Error;

/// Message used when an error body carries nothing readable.
pub const FALLBACK_MESSAGE: &str = "Unexpected error";

/// Errors returned by the authenticated client.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Non-success HTTP response.
    #[error("HTTP error {status}: {message}")]
    Http {
        /// HTTP status code.
        status: u16,
        /// Human-readable message extracted from the body.
        message: String,
        /// Raw response body.
        body: String,
    },

    /// Request timed out.
    #[error("Timeout")]
    Timeout,

    /// Connection error.
    #[error("Connection error: {0}")]
    Connection(String),

    /// Any other transport failure.
    #[error("Request error: {0}")]
    Request(#[source] reqwest::Error),

    /// Request target could not be turned into a URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// Body (de)serialization failed.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Credential store failure.
    #[error("Credential store error: {0}")]
    Store(#[from] StoreError),

    /// Invalid configuration.
    #[error("Configuration error: {0}")]
    Config(String),

    /// Other error.
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            ApiError::Timeout
        } else if err.is_connect() {
            ApiError::Connection(err.to_string())
        } else {
            ApiError::Request(err)
        }
    }
}

impl ApiError {
    /// Create an HTTP error, deriving the message from the body.
    pub fn http(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        Self::Http {
            status,
            message: error_message(&body),
            body,
        }
    }

    /// Get the HTTP status if this is an HTTP error.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Http { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Whether the server rejected the request's credentials.
    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// The message a caller would show to a user.
    pub fn message(&self) -> String {
        match self {
            Self::Http { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

/// Pull a readable message out of an error body.
///
/// Tries `detail`, then the first `non_field_errors` entry, then `message`.
pub fn error_message(body: &str) -> String {
    let Ok(value) = serde_json::from_str::<Value>(body) else {
        return FALLBACK_MESSAGE.to_string();
    };

    let candidates = [
        value.get("detail"),
        value.get("non_field_errors").and_then(|v| v.get(0)),
        value.get("message"),
    ];

    let message = candidates
        .into_iter()
        .flatten()
        .find_map(|v| v.as_str().filter(|s| !s.is_empty()))
        .map(str::to_string)
        .unwrap_or_else(|| FALLBACK_MESSAGE.to_string());
    message
}
