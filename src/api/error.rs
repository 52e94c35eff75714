//! Error types for loading the member resource.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while loading members.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The server rejected the request as unauthenticated.
    #[error("Authentication required to read the member resource")]
    Unauthorized,

    /// Permission denied - the resource is not readable.
    #[error("Permission denied: you don't have access to this resource")]
    Forbidden,

    /// Resource not found.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// Rate limited by the server.
    #[error("Rate limited: please wait before retrying")]
    RateLimited,

    /// Server-side or unexpected HTTP error.
    #[error("Server error: {0}")]
    ServerError(String),

    /// Network or HTTP error.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid endpoint URL.
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// The payload was not a JSON array of members.
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// A local member file could not be read.
    #[error("Could not read {}: {source}", .path.display())]
    ReadFile {
        /// The file that was being read.
        path: PathBuf,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },
}

/// Result type for load operations.
pub type Result<T> = std::result::Result<T, ApiError>;

impl ApiError {
    /// Create an error from an HTTP status code.
    pub fn from_status(status: reqwest::StatusCode, context: &str) -> Self {
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::Forbidden,
            404 => ApiError::NotFound(context.to_string()),
            429 => ApiError::RateLimited,
            500..=599 => ApiError::ServerError(format!("HTTP {}: {}", status, context)),
            _ => ApiError::ServerError(format!("Unexpected HTTP {}: {}", status, context)),
        }
    }
}
