//! API Error Types

use thiserror::Error;

/// Errors from running the API server
#[derive(Error, Debug)]
pub enum ApiError {
    /// IO error (binding the listener, accepting connections)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Result type for API operations
pub type ApiResult<T> = Result<T, ApiError>;
