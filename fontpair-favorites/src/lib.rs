//! Favorites store for the fontpair playground.
//!
//! Keeps an ordered list of saved selections, free of structural
//! duplicates, and persists it after every change through a
//! [`fontpair_config::RecordStore`].

pub mod error;
pub mod store;

pub use error::FavoritesError;
pub use store::{FAVORITES_RECORD, FavoritesStore, PersistOutcome};
