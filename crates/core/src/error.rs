//! Error types for the ocrlens annotation engine.
//!
//! Malformed geometry and failed symbol matches are not errors: they are
//! recovered by omission. Only contract violations surface here.

use thiserror::Error;

/// Primary error type for overlay operations.
#[derive(Error, Debug)]
pub enum OverlayError {
    #[error("unsupported level: {0}")]
    UnsupportedLevel(String),

    #[error("invalid parameters: {0}")]
    InvalidParams(String),

    #[error("payload contains no text annotation")]
    MissingAnnotation,

    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience Result type alias for OverlayError.
pub type Result<T> = std::result::Result<T, OverlayError>;
