//! Custom error types for the common library
//!
//! This module defines application-specific error types that can be used
//! throughout the application.

use std::io::Error as IoError;
use thiserror::Error;

/// Custom error type for durable storage operations
#[derive(Error, Debug)]
pub enum StorageError {
    /// Error occurred while reading or writing the backing files
    #[error("Storage I/O error: {0}")]
    Io(#[source] IoError),

    /// The requested key cannot be mapped to a storage path
    #[error("Invalid storage key: {0}")]
    InvalidKey(String),

    /// Configuration error
    #[error("Storage configuration error: {0}")]
    Configuration(String),
}

/// Type alias for Result with StorageError
pub type StorageResult<T> = Result<T, StorageError>;
