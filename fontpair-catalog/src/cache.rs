//! Fetch-once catalog loader.
//!
//! [`CatalogCache`] issues at most one request per session. Callers that
//! arrive while the request is in flight await the same result, and the
//! outcome (success or failure) is memoized: a failed load leaves the
//! catalog empty until a new cache is constructed.

use crate::descriptor::Catalog;
use crate::error::CatalogError;
use crate::source::CatalogSource;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use tokio::sync::OnceCell;

/// Observable load state for the UI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// `load` has not been called yet
    Idle,
    /// A request is in flight
    Loading,
    /// The catalog is populated with this many fonts
    Ready(usize),
    /// The load failed; the message is suitable for a notification
    Failed(String),
}

/// Counts a load attempt as in flight until it finishes or is dropped.
struct InFlight<'a>(&'a AtomicUsize);

impl<'a> InFlight<'a> {
    fn enter(count: &'a AtomicUsize) -> Self {
        count.fetch_add(1, Ordering::SeqCst);
        Self(count)
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

/// Session-lifetime owner of the font catalog.
pub struct CatalogCache {
    source: Arc<dyn CatalogSource>,
    result: OnceCell<Result<Arc<Catalog>, CatalogError>>,
    in_flight: AtomicUsize,
}

impl CatalogCache {
    pub fn new(source: Arc<dyn CatalogSource>) -> Self {
        Self {
            source,
            result: OnceCell::new(),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Load the catalog, or await/return the existing result.
    ///
    /// Must be called from within a tokio runtime; the blocking fetch runs
    /// on the blocking pool.
    pub async fn load(&self) -> Result<Arc<Catalog>, CatalogError> {
        self.result
            .get_or_init(|| async {
                // Released on completion or cancellation
                let _in_flight = InFlight::enter(&self.in_flight);
                log::info!("Loading font catalog from {}", self.source.describe());

                let source = Arc::clone(&self.source);
                let result = match tokio::task::spawn_blocking(move || source.fetch()).await {
                    Ok(Ok(fonts)) => Ok(Arc::new(Catalog::new(fonts))),
                    Ok(Err(e)) => Err(e),
                    Err(e) => Err(CatalogError::TaskFailed(e.to_string())),
                };

                match &result {
                    Ok(catalog) => log::info!("Font catalog ready: {} fonts", catalog.len()),
                    Err(e) => log::error!("Font catalog unavailable: {}", e),
                }

                result
            })
            .await
            .clone()
    }

    /// The loaded catalog, or an empty one before a successful load.
    pub fn catalog(&self) -> Arc<Catalog> {
        match self.result.get() {
            Some(Ok(catalog)) => Arc::clone(catalog),
            _ => Arc::new(Catalog::default()),
        }
    }

    /// Whether a load has completed, successfully or not.
    pub fn has_fetched(&self) -> bool {
        self.result.initialized()
    }

    pub fn state(&self) -> LoadState {
        match self.result.get() {
            Some(Ok(catalog)) => LoadState::Ready(catalog.len()),
            Some(Err(e)) => LoadState::Failed(e.user_message()),
            None if self.in_flight.load(Ordering::SeqCst) > 0 => LoadState::Loading,
            None => LoadState::Idle,
        }
    }

    /// The memoized failure, if the load failed.
    pub fn error(&self) -> Option<&CatalogError> {
        self.result.get().and_then(|r| r.as_ref().err())
    }
}
