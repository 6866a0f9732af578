//! Typed error types for favorites persistence.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum FavoritesError {
    /// Writing or reading the backing record failed.
    #[error("Failed to persist favorites: {0}")]
    Persist(#[from] std::io::Error),

    /// The stored record is not a favorites document.
    #[error("Favorites record is corrupt: {0}")]
    Corrupt(String),

    #[error("Failed to encode favorites: {0}")]
    Encode(String),
}
