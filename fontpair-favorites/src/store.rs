//! Favorites list and its persistence.
//!
//! The list is stored in the `favorites-fonts` record as
//! `{"state":{"favorites":[...]},"version":0}`.

use crate::error::FavoritesError;
use fontpair_config::RecordStore;
use fontpair_selection::Preset;
use fontpair_selection::preset::equals;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Name of the record holding the favorites list.
pub const FAVORITES_RECORD: &str = "favorites-fonts";

const RECORD_VERSION: u32 = 0;

#[derive(Debug, Default, Serialize, Deserialize)]
struct FavoritesState {
    #[serde(default)]
    favorites: Vec<Preset>,
}

#[derive(Debug, Serialize, Deserialize)]
struct FavoritesRecord {
    state: FavoritesState,
    #[serde(default)]
    version: u32,
}

/// Result of persisting a favorites mutation.
///
/// A failed write never rolls back the in-memory change; it is reported
/// here and logged.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistOutcome {
    /// The list changed and was written.
    Saved,
    /// Nothing changed, nothing written.
    Unchanged,
    /// The list changed in memory but the write failed.
    Failed(String),
}

impl PersistOutcome {
    pub fn is_failed(&self) -> bool {
        matches!(self, PersistOutcome::Failed(_))
    }
}

/// Ordered set of favorite selections.
pub struct FavoritesStore {
    records: Arc<dyn RecordStore>,
    favorites: Vec<Preset>,
}

impl FavoritesStore {
    /// Load favorites from `records`.
    ///
    /// A missing, unreadable or corrupt record yields an empty list; the
    /// problem is logged and the next successful write replaces it.
    pub fn load(records: Arc<dyn RecordStore>) -> Self {
        let favorites = match Self::read_record(records.as_ref()) {
            Ok(favorites) => favorites,
            Err(e) => {
                log::warn!("Ignoring stored favorites: {}", e);
                Vec::new()
            }
        };
        let mut store = Self {
            records,
            favorites: Vec::new(),
        };
        // Collapse duplicates a hand-edited record might contain
        for favorite in favorites {
            if let Err(e) = favorite.validate() {
                log::warn!("Dropping stored favorite: {}", e);
                continue;
            }
            if !store.contains(&favorite) {
                store.favorites.push(favorite);
            }
        }
        log::info!("Loaded {} favorites", store.favorites.len());
        store
    }

    fn read_record(records: &dyn RecordStore) -> Result<Vec<Preset>, FavoritesError> {
        let Some(contents) = records.read(FAVORITES_RECORD)? else {
            log::debug!("No favorites record, starting empty");
            return Ok(Vec::new());
        };
        if contents.trim().is_empty() {
            return Ok(Vec::new());
        }
        let record: FavoritesRecord = serde_json::from_str(&contents)
            .map_err(|e| FavoritesError::Corrupt(e.to_string()))?;
        if record.version != RECORD_VERSION {
            log::warn!(
                "Favorites record version {} (expected {}), reading anyway",
                record.version,
                RECORD_VERSION
            );
        }
        Ok(record.state.favorites)
    }

    /// Add `preset` unless an equal one is already saved.
    pub fn add(&mut self, preset: &Preset) -> PersistOutcome {
        if self.contains(preset) {
            return PersistOutcome::Unchanged;
        }
        self.favorites.push(preset.clone());
        self.persist()
    }

    /// Remove every entry equal to `preset`.
    pub fn remove(&mut self, preset: &Preset) -> PersistOutcome {
        let before = self.favorites.len();
        self.favorites.retain(|p| !equals(p, preset));
        if self.favorites.len() == before {
            return PersistOutcome::Unchanged;
        }
        self.persist()
    }

    /// Add when absent, remove when present.
    pub fn toggle(&mut self, preset: &Preset) -> PersistOutcome {
        if self.contains(preset) {
            self.remove(preset)
        } else {
            self.add(preset)
        }
    }

    pub fn contains(&self, preset: &Preset) -> bool {
        self.favorites.iter().any(|p| equals(p, preset))
    }

    /// Saved selections in insertion order.
    pub fn list(&self) -> &[Preset] {
        &self.favorites
    }

    pub fn len(&self) -> usize {
        self.favorites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.favorites.is_empty()
    }

    fn persist(&self) -> PersistOutcome {
        match self.write_record() {
            Ok(()) => PersistOutcome::Saved,
            Err(e) => {
                log::error!("Failed to save favorites: {}", e);
                PersistOutcome::Failed(e.to_string())
            }
        }
    }

    fn write_record(&self) -> Result<(), FavoritesError> {
        let record = FavoritesRecord {
            state: FavoritesState {
                favorites: self.favorites.clone(),
            },
            version: RECORD_VERSION,
        };
        let contents =
            serde_json::to_string(&record).map_err(|e| FavoritesError::Encode(e.to_string()))?;
        self.records.write(FAVORITES_RECORD, &contents)?;
        log::debug!("Persisted {} favorites", self.favorites.len());
        Ok(())
    }
}
