//! Error types for tessellation.

use thiserror::Error;

/// Errors that can occur during tessellation.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TessellateError {
    /// Subdivision parameters out of range.
    #[error("invalid settings: {0}")]
    InvalidSettings(String),

    /// Unknown subdivision method name.
    #[error("invalid subdivision method: {0:?} (expected \"uniform\" or \"adaptive\")")]
    UnknownMethod(String),
}

/// Result type for tessellation operations.
pub type Result<T> = std::result::Result<T, TessellateError>;
