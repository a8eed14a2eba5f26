//! Error types for seglog
//!
//! Provides a unified error type for all store and index operations.

use thiserror::Error;

/// Result type alias using LogError
pub type Result<T> = std::result::Result<T, LogError>;

/// Unified error type for seglog operations
#[derive(Debug, Error)]
pub enum LogError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Boundary Conditions
    // -------------------------------------------------------------------------
    /// Read past the written extent, read of an empty index, or a write
    /// into an index that is at capacity. Expected during normal operation:
    /// callers branch on it to detect "no more data" or "rotate this file".
    #[error("end of file")]
    Eof,

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl LogError {
    /// Returns `true` for the end-of-file / out-of-range condition.
    ///
    /// Distinguishes the expected boundary case from genuine I/O failure,
    /// which is potentially fatal for the owning segment.
    pub fn is_eof(&self) -> bool {
        matches!(self, LogError::Eof)
    }
}
