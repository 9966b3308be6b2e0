//! # Error Types
//!
//! This module defines error types used throughout the stencil library.

use thiserror::Error;

/// Main error type for stencil operations
#[derive(Debug, Error)]
pub enum StencilError {
    /// Background image fetch or decode failure
    #[error("Image error: {0}")]
    Image(String),

    /// Template failed validation (duplicate ids, non-finite geometry, ...)
    #[error("Invalid template: {0}")]
    InvalidTemplate(String),

    /// Server-level errors (bind, serve)
    #[error("Transport error: {0}")]
    Transport(String),

    /// JSON (de)serialization error wrapper
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// I/O error wrapper
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
