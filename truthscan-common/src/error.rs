//! Error types for truthscan services.

use thiserror::Error;

/// Result type alias using the truthscan error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for truthscan services.
#[derive(Error, Debug)]
pub enum Error {
    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid input or request
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Get HTTP status code for this error.
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::InvalidInput(_) => 400,
            _ => 500,
        }
    }

    /// Whether the error was caused by the caller.
    pub const fn is_client_error(&self) -> bool {
        self.status_code() < 500
    }
}
