use fontpair::App;
use fontpair_catalog::{CatalogError, CatalogSource, FontDescriptor, LoadState};
use fontpair_config::{Config, FileRecordStore, MemoryRecordStore};
use fontpair_favorites::PersistOutcome;
use fontpair_selection::{FieldUpdate, Role};
use fontpair_style::{Document, SharedDocument, StyleSurface};
use parking_lot::Mutex;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tempfile::tempdir;

struct FixtureSource {
    calls: AtomicUsize,
    fail: bool,
}

impl FixtureSource {
    fn ok() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: false,
        })
    }

    fn failing() -> Arc<Self> {
        Arc::new(Self {
            calls: AtomicUsize::new(0),
            fail: true,
        })
    }
}

impl CatalogSource for FixtureSource {
    fn fetch(&self) -> Result<Vec<FontDescriptor>, CatalogError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            return Err(CatalogError::Unavailable {
                status: 503,
                message: "maintenance".to_string(),
            });
        }
        Ok(vec![
            FontDescriptor::new("bitter", "Bitter")
                .with_weights(&[100, 200, 300, 400, 500, 600, 700, 800, 900])
                .with_category("serif"),
            FontDescriptor::new("inter", "Inter")
                .with_weights(&[100, 200, 300, 400, 500, 600, 700, 800, 900])
                .variable(),
            FontDescriptor::new("roboto-mono", "Roboto Mono").with_weights(&[400, 500, 700]),
            FontDescriptor::new("sora", "Sora")
                .with_weights(&[100, 200, 300, 400, 500, 600, 700, 800])
                .variable(),
            FontDescriptor::new("geist", "Geist")
                .with_weights(&[100, 200, 300, 400, 500, 600, 700, 800, 900])
                .variable(),
        ])
    }

    fn describe(&self) -> String {
        "fixture".to_string()
    }
}

fn memory_app(source: Arc<FixtureSource>) -> App {
    App::with_parts(Config::default(), source, Arc::new(MemoryRecordStore::new()))
}

#[tokio::test]
async fn test_catalog_loads_once() {
    let source = FixtureSource::ok();
    let app = memory_app(source.clone());

    assert_eq!(app.catalog_state(), LoadState::Idle);
    let first = app.load_catalog().await;
    let second = app.load_catalog().await;

    assert_eq!(first.len(), 5);
    assert_eq!(second.len(), 5);
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
    assert_eq!(app.catalog_state(), LoadState::Ready(5));
}

#[tokio::test]
async fn test_catalog_failure_yields_empty_catalog_and_error() {
    let app = memory_app(FixtureSource::failing());

    let catalog = app.load_catalog().await;
    assert!(catalog.is_empty());
    let error = app.catalog_error().expect("error is reported");
    assert!(error.is_unavailable());
    assert_eq!(error.user_message(), "maintenance");

    // Derivation against the empty catalog emits nothing
    let style = app.derive();
    assert!(style.font_faces.is_empty());
    assert!(style.variables.is_empty());
}

#[tokio::test]
async fn test_font_change_snaps_weight() {
    let mut app = memory_app(FixtureSource::ok());
    app.load_catalog().await;

    app.update(Role::Display, FieldUpdate::Weight(250)).unwrap();
    app.update(Role::Display, FieldUpdate::FontId("roboto-mono".to_string()))
        .unwrap();

    assert_eq!(app.selection().display.font_id, "roboto-mono");
    assert_eq!(app.selection().display.weight, 400);
    assert_eq!(app.active_preset(), None);
}

#[tokio::test]
async fn test_invalid_update_is_rejected() {
    let mut app = memory_app(FixtureSource::ok());
    assert!(app.update(Role::Body, FieldUpdate::Size(0)).is_err());
    assert_eq!(app.selection().body.size, 16);
}

#[tokio::test]
async fn test_live_preview_follows_selection() {
    let mut app = memory_app(FixtureSource::ok());
    app.load_catalog().await;

    let doc: SharedDocument = Arc::new(Mutex::new(Document::new()));
    let marker = app.config().style.marker.clone();
    let preview = app.mount_preview(Arc::clone(&doc));
    assert_eq!(doc.lock().block_count(&marker), 1);
    assert_eq!(doc.lock().property("--font-display"), Some("'Bitter', sans-serif"));

    app.apply_preset(1).unwrap();
    assert_eq!(doc.lock().block_count(&marker), 1);
    assert_eq!(doc.lock().property("--font-display"), Some("'Sora', sans-serif"));
    assert_eq!(doc.lock().property("--font-display-weight"), Some("700"));
    assert_eq!(doc.lock().property("--font-display-size"), Some("48px"));

    // Unmount: dropping the handle removes the block and stops updates
    drop(preview);
    assert_eq!(doc.lock().block_count(&marker), 0);
    app.apply_preset(0).unwrap();
    assert_eq!(doc.lock().block_count(&marker), 0);
    assert_eq!(doc.lock().property("--font-display"), Some("'Sora', sans-serif"));
}

#[tokio::test]
async fn test_preview_mounted_before_load_picks_up_catalog() {
    let mut app = memory_app(FixtureSource::ok());
    let doc: SharedDocument = Arc::new(Mutex::new(Document::new()));
    let _preview = app.mount_preview(Arc::clone(&doc));
    assert_eq!(doc.lock().property("--font-display"), None);

    app.load_catalog().await;
    assert_eq!(doc.lock().property("--font-display"), Some("'Bitter', sans-serif"));

    app.apply_preset(1).unwrap();
    assert_eq!(doc.lock().property("--font-display"), Some("'Sora', sans-serif"));
    let marker = app.config().style.marker.clone();
    let css: String = doc
        .lock()
        .marked_blocks(&marker)
        .map(|b| b.css.clone())
        .collect();
    assert!(css.contains("font-family: 'Sora';"));
}

#[tokio::test]
async fn test_out_of_range_favorite_never_reaches_selection() {
    let raw = r#"{"state":{"favorites":[{"display":{"fontId":"lora","weight":0,"size":0},"heading":{"fontId":"lato","weight":700,"size":28},"body":{"fontId":"lato","weight":400,"size":18}}]},"version":0}"#;
    let records = Arc::new(MemoryRecordStore::new().with_record("favorites-fonts", raw));
    let mut app = App::with_parts(Config::default(), FixtureSource::ok(), records);

    assert!(app.favorites().is_empty());
    assert!(app.apply_favorite(0).is_err());
    assert_eq!(app.selection().display.size, 48);
    assert_eq!(app.selection().display.weight, 700);
}

#[tokio::test]
async fn test_randomize_never_repeats_consecutively() {
    let mut app = memory_app(FixtureSource::ok());
    let mut rng = StdRng::seed_from_u64(2024);

    let mut previous = None;
    for _ in 0..50 {
        let index = app.randomize(&mut rng).unwrap();
        assert_ne!(Some(index), previous);
        assert_eq!(app.active_preset(), Some(index));
        previous = Some(index);
    }
}

#[tokio::test]
async fn test_favorites_persist_across_app_instances() {
    let temp = tempdir().unwrap();
    let records = Arc::new(FileRecordStore::new(temp.path()));

    let mut app = App::with_parts(Config::default(), FixtureSource::ok(), records.clone());
    app.apply_preset(2).unwrap();
    assert_eq!(app.toggle_favorite(), PersistOutcome::Saved);
    assert_eq!(app.add_favorite(), PersistOutcome::Unchanged);
    assert!(app.is_favorite());
    drop(app);

    let mut app = App::with_parts(Config::default(), FixtureSource::ok(), records);
    assert_eq!(app.favorites().len(), 1);
    assert!(!app.is_favorite());
    app.apply_favorite(0).unwrap();
    assert_eq!(app.active_preset(), Some(2));
    assert!(app.is_favorite());
}

#[tokio::test]
async fn test_install_snippets_for_loaded_catalog() {
    let mut app = memory_app(FixtureSource::ok());
    app.load_catalog().await;
    app.apply_preset(1).unwrap();

    let npm = app.with_install_snippets(|s| s.npm_install_lines());
    assert_eq!(
        npm,
        "npm install @fontsource-variable/sora\nnpm install @fontsource-variable/geist"
    );
}
