//! Error types for weather-places

use crate::constants::messages;
use thiserror::Error;

/// Main error type for weather-places operations
#[derive(Error, Debug)]
pub enum Error {
    /// Timeout, refused connection, DNS failure
    #[error("Network error: {0}")]
    Network(String),

    /// Non-2xx response, with the message extracted from the body if any
    #[error("API error (status {status}): {}", message.as_deref().unwrap_or("no message"))]
    Api {
        status: u16,
        message: Option<String>,
    },

    /// Unexpected payload shape
    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Invalid coordinates: {0}")]
    InvalidCoordinates(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Location error: {0}")]
    Location(String),

    #[error("Favorites error: {0}")]
    Favorites(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Server error: {0}")]
    Server(String),
}

impl Error {
    /// Build an API error, dropping blank messages
    pub fn api(status: u16, message: Option<String>) -> Self {
        let message = message
            .map(|m| m.trim().to_string())
            .filter(|m| !m.is_empty());
        Error::Api { status, message }
    }

    /// Message suitable for a transient toast
    ///
    /// Server-provided messages are passed through verbatim; everything else
    /// collapses to one of two generic strings.
    pub fn user_message(&self) -> String {
        match self {
            Error::Network(_) => messages::NETWORK_ERROR.to_string(),
            Error::Api {
                message: Some(message),
                ..
            } => message.clone(),
            Error::Favorites(message) => message.clone(),
            _ => messages::OPERATION_FAILED.to_string(),
        }
    }

    /// Whether the failure happened before any response was received
    pub fn is_network(&self) -> bool {
        matches!(self, Error::Network(_))
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Error::Parse(err.to_string())
        } else if let Some(status) = err.status() {
            Error::api(status.as_u16(), None)
        } else {
            Error::Network(err.to_string())
        }
    }
}

/// Result type alias for weather-places operations
pub type Result<T> = std::result::Result<T, Error>;
