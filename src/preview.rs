//! Live preview: keeps a style surface in sync with the selection.
//!
//! A [`LivePreview`] is mounted by subscribing it to the
//! [`SelectionStore`](fontpair_selection::SelectionStore); every
//! transition re-derives the style and re-applies it. Dropping the preview
//! removes its rule block from the surface.

use fontpair_catalog::Catalog;
use fontpair_config::StyleConfig;
use fontpair_selection::{SelectionObserver, SelectionState};
use fontpair_style::{DerivedStyle, StyleInjector, StyleSurface, derive_with_cdn};
use std::sync::Arc;

pub struct LivePreview<S: StyleSurface> {
    injector: StyleInjector<S>,
    catalog: Arc<Catalog>,
    cdn_base: String,
    last: Option<DerivedStyle>,
}

impl<S: StyleSurface> LivePreview<S> {
    pub fn new(surface: S, config: &StyleConfig, catalog: Arc<Catalog>) -> Self {
        Self {
            injector: StyleInjector::from_config(surface, config),
            catalog,
            cdn_base: config.cdn_base.clone(),
            last: None,
        }
    }

    /// Derive from `state` and apply it to the surface.
    pub fn refresh(&mut self, state: &SelectionState) {
        let style = derive_with_cdn(state, &self.catalog, &self.cdn_base);
        self.injector.apply(&style);
        self.last = Some(style);
    }

    /// Swap in a newly loaded catalog and re-apply.
    pub fn set_catalog(&mut self, catalog: Arc<Catalog>, state: &SelectionState) {
        self.catalog = catalog;
        self.refresh(state);
    }

    /// Style most recently applied, if any.
    pub fn last_style(&self) -> Option<&DerivedStyle> {
        self.last.as_ref()
    }

    pub fn surface(&self) -> &S {
        self.injector.surface()
    }

    /// Remove the rule block now instead of at drop.
    pub fn unmount(&mut self) {
        self.injector.teardown();
        self.last = None;
    }
}

impl<S: StyleSurface + Send> SelectionObserver for LivePreview<S> {
    fn on_selection_changed(&mut self, state: &SelectionState) {
        self.refresh(state);
    }
}

/// Mounted view that needs the catalog once it finishes loading.
pub(crate) trait CatalogListener: Send {
    fn on_catalog_loaded(&mut self, catalog: Arc<Catalog>, state: &SelectionState);
}

impl<S: StyleSurface + Send> CatalogListener for LivePreview<S> {
    fn on_catalog_loaded(&mut self, catalog: Arc<Catalog>, state: &SelectionState) {
        self.set_catalog(catalog, state);
    }
}
