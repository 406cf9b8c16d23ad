//! Error types for nsdb
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using NsError
pub type Result<T> = std::result::Result<T, NsError>;

/// Unified error type for nsdb operations
///
/// A missing key is never an error: reads report it as `Ok(None)`.
#[derive(Debug, Error)]
pub enum NsError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Key Errors
    // -------------------------------------------------------------------------
    #[error("Invalid key: {0}")]
    InvalidKey(String),

    #[error("Invalid table name: {0}")]
    InvalidTable(String),

    // -------------------------------------------------------------------------
    // Encoding Errors
    // -------------------------------------------------------------------------
    #[error("Decode error: {0}")]
    Decode(String),

    #[error("Encode error: {0}")]
    Encode(String),

    #[error("Value for key '{key}' is not a number: {raw:?}")]
    InvalidNumber { key: String, raw: String },

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl NsError {
    /// True for errors caused by stored bytes that don't match the expected encoding
    pub fn is_decode(&self) -> bool {
        matches!(self, NsError::Decode(_) | NsError::InvalidNumber { .. })
    }
}
