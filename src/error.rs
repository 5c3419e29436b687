//! Error types for PictDB
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using PictDbError
pub type Result<T> = std::result::Result<T, PictDbError>;

/// Unified error type for PictDB operations
///
/// Every kind is terminal for the operation that raised it; nothing is
/// retried internally.
#[derive(Debug, Error)]
pub enum PictDbError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Allocation failed")]
    OutOfMemory,

    // -------------------------------------------------------------------------
    // Argument Errors
    // -------------------------------------------------------------------------
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid filename")]
    InvalidFilename,

    #[error("Invalid picture ID")]
    InvalidPictureId,

    #[error("Invalid resolution: {0}")]
    InvalidResolution(String),

    #[error("Invalid resolution(s): {0}")]
    InvalidResolutions(String),

    // -------------------------------------------------------------------------
    // Catalog Errors
    // -------------------------------------------------------------------------
    #[error("Full database")]
    FullDatabase,

    #[error("Capacity {capacity} exceeds the limit of {limit} pictures")]
    CapacityExceeded { capacity: u32, limit: u32 },

    #[error("Picture not found")]
    NotFound,

    #[error("Existing picture ID")]
    DuplicateId,

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Codec Errors
    // -------------------------------------------------------------------------
    #[error("Codec error: {0}")]
    Codec(String),
}

impl From<image::ImageError> for PictDbError {
    fn from(err: image::ImageError) -> Self {
        PictDbError::Codec(err.to_string())
    }
}

impl From<std::collections::TryReserveError> for PictDbError {
    fn from(_: std::collections::TryReserveError) -> Self {
        PictDbError::OutOfMemory
    }
}
