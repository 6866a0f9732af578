//! Application context.
//!
//! `App` owns every long-lived piece of state: configuration, the catalog
//! loader, the selection store, favorites and the randomizer. Nothing here
//! is global; tests build an `App` from in-memory parts with
//! [`App::with_parts`].

use anyhow::{Context, Result, bail};
use fontpair_catalog::{
    CacheOnlySource, CachedSource, Catalog, CatalogCache, CatalogError, CatalogSource, DiskCache,
    HttpCatalogSource, LoadState,
};
use fontpair_config::{Config, FileRecordStore, RecordStore};
use fontpair_favorites::{FavoritesStore, PersistOutcome};
use fontpair_selection::{
    FieldUpdate, Preset, Randomizer, Role, SelectionObserver, SelectionState, SelectionStore,
    builtin_presets, preset,
};
use fontpair_style::{DerivedStyle, InstallSnippets, StyleSurface, derive_with_cdn};
use parking_lot::Mutex;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Weak};

use crate::preview::{CatalogListener, LivePreview};

/// Record holding the last selection when `persist_selection` is on.
pub const SELECTION_RECORD: &str = "selected-font";

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SelectionSnapshot {
    selected_font: SelectionState,
}

#[derive(Serialize, Deserialize)]
struct SelectionRecordFile {
    state: SelectionSnapshot,
    #[serde(default)]
    version: u32,
}

/// Writes every new selection to the `selected-font` record.
struct SelectionRecorder {
    records: Arc<dyn RecordStore>,
}

impl SelectionRecorder {
    fn restore(records: &dyn RecordStore) -> Option<SelectionState> {
        let contents = match records.read(SELECTION_RECORD) {
            Ok(Some(contents)) => contents,
            Ok(None) => return None,
            Err(e) => {
                log::warn!("Failed to read saved selection: {}", e);
                return None;
            }
        };
        let state = match serde_json::from_str::<SelectionRecordFile>(&contents) {
            Ok(file) => file.state.selected_font,
            Err(e) => {
                log::warn!("Ignoring corrupt saved selection: {}", e);
                return None;
            }
        };
        match state.validate() {
            Ok(()) => Some(state),
            Err(e) => {
                log::warn!("Ignoring saved selection: {}", e);
                None
            }
        }
    }
}

impl SelectionObserver for SelectionRecorder {
    fn on_selection_changed(&mut self, state: &SelectionState) {
        let file = SelectionRecordFile {
            state: SelectionSnapshot {
                selected_font: state.clone(),
            },
            version: 0,
        };
        let result = serde_json::to_string(&file)
            .map_err(|e| e.to_string())
            .and_then(|json| {
                self.records
                    .write(SELECTION_RECORD, &json)
                    .map_err(|e| e.to_string())
            });
        if let Err(e) = result {
            log::error!("Failed to save selection: {}", e);
        }
    }
}

pub struct App {
    config: Config,
    catalog: CatalogCache,
    selection: SelectionStore,
    favorites: FavoritesStore,
    randomizer: Randomizer,
    presets: Vec<Preset>,
    previews: Mutex<Vec<Weak<Mutex<dyn CatalogListener>>>>,
    // Kept alive here; the store only holds it weakly
    _recorder: Option<Arc<Mutex<SelectionRecorder>>>,
}

impl App {
    /// Build the production app: HTTP catalog behind the disk cache (or the
    /// cache alone when `offline`), file-backed records under the data dir.
    pub fn new(config: Config, offline: bool) -> Result<Self> {
        let disk_cache = DiskCache::new(Config::cache_dir(), config.catalog.cache_ttl_secs);
        let url = config.catalog.url.clone();

        let source: Arc<dyn CatalogSource> = if offline {
            log::info!("Offline mode, serving catalog from {:?}", disk_cache.dir());
            Arc::new(CacheOnlySource::new(disk_cache, url))
        } else if config.catalog.disk_cache {
            let http = HttpCatalogSource::from_config(&config.catalog);
            Arc::new(CachedSource::new(http, disk_cache, url))
        } else {
            Arc::new(HttpCatalogSource::from_config(&config.catalog))
        };

        let data_dir = config.data_dir();
        std::fs::create_dir_all(&data_dir)
            .with_context(|| format!("Failed to create data directory {:?}", data_dir))?;
        let records: Arc<dyn RecordStore> = Arc::new(FileRecordStore::new(data_dir));

        Ok(Self::with_parts(config, source, records))
    }

    /// Build from explicit parts.
    pub fn with_parts(
        config: Config,
        source: Arc<dyn CatalogSource>,
        records: Arc<dyn RecordStore>,
    ) -> Self {
        log::info!("Catalog source: {}", source.describe());

        let initial = if config.persist_selection {
            SelectionRecorder::restore(records.as_ref()).unwrap_or_default()
        } else {
            SelectionState::default()
        };
        let mut selection = SelectionStore::new(initial);

        let recorder = config.persist_selection.then(|| {
            let recorder = Arc::new(Mutex::new(SelectionRecorder {
                records: Arc::clone(&records),
            }));
            selection.subscribe(&recorder);
            recorder
        });

        Self {
            catalog: CatalogCache::new(source),
            favorites: FavoritesStore::load(records),
            selection,
            randomizer: Randomizer::new(),
            presets: builtin_presets(),
            previews: Mutex::new(Vec::new()),
            config,
            _recorder: recorder,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Load the catalog once. On failure an empty catalog is returned and
    /// the error stays available from [`App::catalog_error`]; later calls
    /// return the same outcome. Mounted previews are re-applied against the
    /// loaded catalog.
    pub async fn load_catalog(&self) -> Arc<Catalog> {
        match self.catalog.load().await {
            Ok(catalog) => {
                self.refresh_previews(&catalog);
                catalog
            }
            Err(_) => Arc::new(Catalog::default()),
        }
    }

    fn refresh_previews(&self, catalog: &Arc<Catalog>) {
        let state = self.selection.state();
        self.previews.lock().retain(|weak| match weak.upgrade() {
            Some(preview) => {
                preview.lock().on_catalog_loaded(Arc::clone(catalog), state);
                true
            }
            None => false,
        });
    }

    /// Catalog loaded so far (empty before a successful load).
    pub fn catalog(&self) -> Arc<Catalog> {
        self.catalog.catalog()
    }

    pub fn catalog_state(&self) -> LoadState {
        self.catalog.state()
    }

    pub fn catalog_error(&self) -> Option<&CatalogError> {
        self.catalog.error()
    }

    pub fn selection(&self) -> &SelectionState {
        self.selection.state()
    }

    pub fn presets(&self) -> &[Preset] {
        &self.presets
    }

    /// Index of the built-in preset equal to the current selection.
    pub fn active_preset(&self) -> Option<usize> {
        preset::find(&self.presets, self.selection.state())
    }

    /// Replace one field of one role. A new font id also snaps the weight
    /// against the loaded catalog.
    pub fn update(&mut self, role: Role, update: FieldUpdate) -> Result<()> {
        match update {
            FieldUpdate::FontId(font_id) => {
                let catalog = self.catalog();
                if !font_id.is_empty() && !catalog.is_empty() && !catalog.contains(&font_id) {
                    log::warn!("Font '{}' is not in the catalog", font_id);
                }
                self.selection.set_font(role, &font_id, &catalog);
            }
            other => self.selection.update(role, other)?,
        }
        Ok(())
    }

    /// Font picker selection: reselecting the current font clears the role.
    pub fn select_font(&mut self, role: Role, font_id: &str) {
        let catalog = self.catalog();
        self.selection.select_font(role, font_id, &catalog);
    }

    pub fn apply_preset(&mut self, index: usize) -> Result<&Preset> {
        let Some(preset) = self.presets.get(index) else {
            bail!(
                "No preset at index {} (there are {})",
                index,
                self.presets.len()
            );
        };
        self.selection.apply(preset)?;
        Ok(preset)
    }

    /// Apply a random preset different from the previous random pick.
    pub fn randomize<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Option<usize> {
        let (index, preset) = self.randomizer.pick(&self.presets, rng)?;
        log::debug!("Randomized to preset {}", index);
        if let Err(e) = self.selection.apply(preset) {
            log::warn!("Skipping preset {}: {}", index, e);
            return None;
        }
        Some(index)
    }

    pub fn favorites(&self) -> &FavoritesStore {
        &self.favorites
    }

    pub fn is_favorite(&self) -> bool {
        self.favorites.contains(self.selection.state())
    }

    /// Heart button: save or unsave the current selection.
    pub fn toggle_favorite(&mut self) -> PersistOutcome {
        self.favorites.toggle(self.selection.state())
    }

    pub fn add_favorite(&mut self) -> PersistOutcome {
        self.favorites.add(self.selection.state())
    }

    pub fn remove_favorite(&mut self) -> PersistOutcome {
        self.favorites.remove(self.selection.state())
    }

    /// Load a saved favorite into the selection.
    pub fn apply_favorite(&mut self, index: usize) -> Result<()> {
        let Some(favorite) = self.favorites.list().get(index).cloned() else {
            bail!(
                "No favorite at index {} (there are {})",
                index,
                self.favorites.len()
            );
        };
        self.selection
            .apply(&favorite)
            .with_context(|| format!("Favorite {} is not a valid selection", index))?;
        Ok(())
    }

    /// Style for the current selection against the loaded catalog.
    pub fn derive(&self) -> DerivedStyle {
        derive_with_cdn(
            self.selection.state(),
            &self.catalog(),
            &self.config.style.cdn_base,
        )
    }

    /// Run `f` with install snippets for the current selection.
    pub fn with_install_snippets<T>(&self, f: impl FnOnce(&InstallSnippets<'_>) -> T) -> T {
        let catalog = self.catalog();
        let snippets = InstallSnippets::new(self.selection.state(), &catalog)
            .with_cdn_base(&self.config.style.cdn_base);
        f(&snippets)
    }

    /// Mount a live preview on `surface`: applied now and after every
    /// selection change until the returned handle is dropped.
    pub fn mount_preview<S>(&mut self, surface: S) -> Arc<Mutex<LivePreview<S>>>
    where
        S: StyleSurface + Send + 'static,
    {
        let mut preview = LivePreview::new(surface, &self.config.style, self.catalog());
        preview.refresh(self.selection.state());
        let preview = Arc::new(Mutex::new(preview));
        self.selection.subscribe(&preview);
        let listener = Arc::downgrade(&preview) as Weak<Mutex<dyn CatalogListener>>;
        self.previews.lock().push(listener);
        preview
    }
}
