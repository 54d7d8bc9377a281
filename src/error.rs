//! Error types for the client.

use thiserror::Error;

/// Client error type.
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Invalid URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// JSON serialization/deserialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// API returned a non-JSON error response.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Body text from the API.
        message: String,
    },

    /// API answered with `success: false`.
    #[error("{0}")]
    Rejected(String),

    /// Form input failed client-side checks; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// Realtime connection failed.
    #[error("Realtime error: {0}")]
    Realtime(#[from] tokio_tungstenite::tungstenite::Error),

    /// Realtime connection is gone.
    #[error("Realtime connection closed")]
    ConnectionClosed,

    /// Local file IO failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl Error {
    /// Text shown to the user after an "Error ...: " prefix.
    ///
    /// Server-provided messages are passed through untouched; everything
    /// else uses the error's display form.
    pub fn user_message(&self) -> String {
        match self {
            Self::Rejected(message) | Self::Validation(message) => message.clone(),
            Self::Api { message, .. } => message.clone(),
            other => other.to_string(),
        }
    }
}

impl From<config::ConfigError> for Error {
    fn from(err: config::ConfigError) -> Self {
        Self::Config(err.to_string())
    }
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, Error>;
