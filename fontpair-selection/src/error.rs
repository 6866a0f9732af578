//! Typed error types for selection updates.

use thiserror::Error;

/// A selection update that would produce an invalid state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SelectionError {
    #[error("Font size must be a positive number of pixels, got {0}")]
    InvalidSize(u16),

    #[error("Font weight must be between 1 and 1000, got {0}")]
    InvalidWeight(u16),

    #[error("Unknown role '{0}' (expected display, heading or body)")]
    UnknownRole(String),

    #[error("Unknown field '{0}' (expected fontId, weight or size)")]
    UnknownField(String),

    #[error("Invalid value '{value}' for field '{field}'")]
    InvalidValue { field: String, value: String },
}
