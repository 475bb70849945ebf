//! Error types for the Imbo client

use std::io;
use thiserror::Error;

/// Errors that can occur when building URLs for or talking to an Imbo server
#[derive(Error, Debug)]
pub enum Error {
    /// A caller-supplied value was missing or malformed (empty key,
    /// empty image identifier, empty upload, ...)
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// A signed URL was requested but no signature could be produced
    #[error("Signing failed: {0}")]
    Signing(String),

    /// Authentication failed (invalid key pair or signature)
    #[error("Unauthorized: access denied")]
    Unauthorized,

    /// The resource does not exist on the server
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// The server rejected the request (malformed data, bad signature, etc.)
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// Server returned an error
    #[error("Server error (status {status}): {message}")]
    ServerError {
        /// HTTP status code
        status: u16,
        /// Error message from the server
        message: String,
    },

    /// Network or connection error
    #[error("Connection error: {0}")]
    Connection(String),

    /// Request timeout
    #[error("Request timeout after {0}ms")]
    Timeout(u64),

    /// TLS/SSL error
    #[error("TLS error: {0}")]
    Tls(String),

    /// URL parsing error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for convenience
pub type Result<T> = std::result::Result<T, Error>;
