//! Error types for breeze-core

use crate::StatusCode;
use thiserror::Error;

/// Result type alias for breeze operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for the breeze REST toolkit
#[derive(Debug, Error)]
pub enum Error {
    /// Request verb is not the one configured for the path
    #[error("Method not allowed: {method} {path}")]
    MethodNotAllowed { method: String, path: String },

    /// Missing or invalid credentials
    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    /// Unrecognized HTTP method token
    #[error("Invalid HTTP method: {0}")]
    InvalidMethod(String),

    /// Invalid route path
    #[error("Invalid path: {0}")]
    InvalidPath(String),

    /// Query string failed strict decoding
    #[error("Query decode error: {0}")]
    QueryDecode(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Hyper error
    #[error("HTTP error: {0}")]
    Hyper(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// HTTP status the error surfaces as. Anything without a defined
    /// mapping is a generic 500.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Error::MethodNotAllowed { .. } | Error::InvalidMethod(_) => StatusCode::METHOD_NOT_ALLOWED,
            Error::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Error::QueryDecode(_) | Error::InvalidPath(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}
