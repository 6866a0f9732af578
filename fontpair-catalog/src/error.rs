//! Typed error types for the catalog crate.

use thiserror::Error;

/// Why the catalog could not be loaded.
///
/// Every variant means the same thing to the user: the catalog is
/// unavailable for this session and font pickers show no options. The
/// variants exist so logs and tests can tell the causes apart.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CatalogError {
    /// The endpoint answered with a non-success status.
    #[error("Font catalog unavailable (HTTP {status}): {message}")]
    Unavailable {
        /// HTTP status code.
        status: u16,
        /// Error message from the response body, if it carried one.
        message: String,
    },

    /// The endpoint answered but the body is not a descriptor list.
    #[error("Font catalog response is malformed: {0}")]
    Malformed(String),

    /// The request never produced a response (DNS, TLS, timeout, body read).
    #[error("Font catalog request failed: {0}")]
    Request(String),

    /// The configured URL was rejected before any request was made.
    #[error("Invalid font catalog URL: {0}")]
    InvalidUrl(String),

    /// The background fetch task panicked or was cancelled.
    #[error("Font catalog load task failed: {0}")]
    TaskFailed(String),
}

impl CatalogError {
    /// Short notification text for the UI.
    pub fn user_message(&self) -> String {
        match self {
            CatalogError::Unavailable { message, .. } if !message.is_empty() => message.clone(),
            _ => "Error fetching fonts".to_string(),
        }
    }

    /// True when the endpoint itself reported the failure.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, CatalogError::Unavailable { .. })
    }
}
