//! Error types for K-A-T-E One.

use thiserror::Error;

/// Result type alias using kate-one's Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Core error type for K-A-T-E One operations.
///
/// Remote-call failures (`Service`, `Storage`) are never recovered locally;
/// they propagate to the rendering layer and abort the current request.
#[derive(Error, Debug)]
pub enum Error {
    /// semantha API call failed (auth, network, malformed response)
    #[error("Service error: {0}")]
    Service(String),

    /// Remote stage operation failed
    #[error("Storage error: {0}")]
    Storage(String),

    /// Resource not found
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid user input (empty question, incomplete credentials)
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// HTTP/network request failed
    #[error("Request error: {0}")]
    Request(String),

    /// File I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::Serialization(e.to_string())
    }
}

impl From<reqwest::Error> for Error {
    fn from(e: reqwest::Error) -> Self {
        Error::Request(e.to_string())
    }
}
