//! Error types for the floodgate library.

use thiserror::Error;

/// Main error type for floodgate operations.
#[derive(Error, Debug)]
pub enum FloodgateError {
    /// Policy validation errors
    #[error("Invalid policy: {0}")]
    InvalidPolicy(String),

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for floodgate operations.
pub type Result<T> = std::result::Result<T, FloodgateError>;
