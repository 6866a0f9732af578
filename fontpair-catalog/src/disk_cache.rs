//! On-disk copy of the last successful catalog fetch.
//!
//! Entries are keyed by a SHA-256 hash of the source URL and consist of a
//! `{hash}.json` payload plus a `{hash}.meta` file recording when it was
//! fetched. An entry younger than the freshness window (24 hours by
//! default) satisfies a load without touching the network.

use crate::descriptor::FontDescriptor;
use crate::error::CatalogError;
use crate::source::CatalogSource;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::path::{Path, PathBuf};

/// Metadata stored alongside a cached payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheMeta {
    /// The source URL this entry corresponds to.
    pub url: String,
    /// RFC 3339 timestamp of the fetch.
    pub fetched_at: String,
    /// Number of descriptors in the payload.
    pub font_count: usize,
}

impl CacheMeta {
    /// Whether this entry is still inside the freshness window at `now`.
    ///
    /// Unparsable timestamps and timestamps in the future count as stale.
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        let Ok(fetched_at) = DateTime::parse_from_rfc3339(&self.fetched_at) else {
            return false;
        };
        let elapsed = now.signed_duration_since(fetched_at.with_timezone(&Utc));
        elapsed >= Duration::zero() && elapsed < ttl
    }
}

/// Generate a deterministic filename stem from a URL.
pub fn url_to_cache_filename(url: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(url.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Directory of cached catalog payloads.
#[derive(Debug, Clone)]
pub struct DiskCache {
    dir: PathBuf,
    ttl: Duration,
}

impl DiskCache {
    pub fn new(dir: impl Into<PathBuf>, ttl_secs: u64) -> Self {
        Self {
            dir: dir.into(),
            ttl: i64::try_from(ttl_secs)
                .ok()
                .and_then(Duration::try_seconds)
                .unwrap_or(Duration::MAX),
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn paths(&self, url: &str) -> (PathBuf, PathBuf) {
        let hash = url_to_cache_filename(url);
        (
            self.dir.join(format!("{hash}.json")),
            self.dir.join(format!("{hash}.meta")),
        )
    }

    /// Read a cached payload regardless of its age.
    pub fn read(&self, url: &str) -> Result<(Vec<FontDescriptor>, CacheMeta), String> {
        let (data_path, meta_path) = self.paths(url);

        let meta_str = fs::read_to_string(&meta_path)
            .map_err(|e| format!("Failed to read cache meta from {:?}: {}", meta_path, e))?;
        let meta: CacheMeta = serde_json::from_str(&meta_str)
            .map_err(|e| format!("Failed to parse cache metadata: {}", e))?;
        if meta.url != url {
            return Err(format!(
                "Cache entry belongs to '{}', not '{}'",
                meta.url, url
            ));
        }

        let data = fs::read_to_string(&data_path)
            .map_err(|e| format!("Failed to read cache data from {:?}: {}", data_path, e))?;
        let fonts: Vec<FontDescriptor> = serde_json::from_str(&data)
            .map_err(|e| format!("Failed to parse cached catalog: {}", e))?;

        Ok((fonts, meta))
    }

    /// Read a cached payload only if it is inside the freshness window.
    pub fn read_fresh(&self, url: &str, now: DateTime<Utc>) -> Option<Vec<FontDescriptor>> {
        match self.read(url) {
            Ok((fonts, meta)) if meta.is_fresh(self.ttl, now) => {
                log::debug!(
                    "Using cached catalog for {} ({} fonts, fetched {})",
                    url,
                    meta.font_count,
                    meta.fetched_at
                );
                Some(fonts)
            }
            Ok((_, meta)) => {
                log::debug!("Cached catalog for {} is stale (fetched {})", url, meta.fetched_at);
                None
            }
            Err(e) => {
                log::debug!("No usable cached catalog for {}: {}", url, e);
                None
            }
        }
    }

    /// Store a payload fetched at `fetched_at`.
    ///
    /// Payload and metadata are each written to a temp file and renamed, and
    /// the metadata goes last so a crash never pairs new metadata with an
    /// old payload.
    pub fn write(
        &self,
        url: &str,
        fonts: &[FontDescriptor],
        fetched_at: DateTime<Utc>,
    ) -> Result<(), String> {
        fs::create_dir_all(&self.dir)
            .map_err(|e| format!("Failed to create cache directory {:?}: {}", self.dir, e))?;

        let (data_path, meta_path) = self.paths(url);
        let meta = CacheMeta {
            url: url.to_string(),
            fetched_at: fetched_at.to_rfc3339(),
            font_count: fonts.len(),
        };

        let data = serde_json::to_string(fonts)
            .map_err(|e| format!("Failed to serialize catalog for cache: {}", e))?;
        let meta_str = serde_json::to_string_pretty(&meta)
            .map_err(|e| format!("Failed to serialize cache metadata: {}", e))?;

        write_atomic(&data_path, &data)?;
        write_atomic(&meta_path, &meta_str)?;
        Ok(())
    }
}

/// `{name}.tmp` next to `path`, unique per target file.
fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_atomic(path: &Path, contents: &str) -> Result<(), String> {
    let temp_path = temp_path_for(path);
    fs::write(&temp_path, contents)
        .map_err(|e| format!("Failed to write cache temp file {:?}: {}", temp_path, e))?;
    fs::rename(&temp_path, path)
        .map_err(|e| format!("Failed to rename cache temp file {:?}: {}", temp_path, e))
}

/// Wraps a source with the disk cache: fresh entries short-circuit the
/// fetch, successful fetches refresh the entry.
pub struct CachedSource<S> {
    inner: S,
    cache: DiskCache,
    url: String,
}

impl<S: CatalogSource> CachedSource<S> {
    /// `url` keys the cache entry; pass the same URL the inner source fetches.
    pub fn new(inner: S, cache: DiskCache, url: impl Into<String>) -> Self {
        Self {
            inner,
            cache,
            url: url.into(),
        }
    }
}

impl<S: CatalogSource> CatalogSource for CachedSource<S> {
    fn fetch(&self) -> Result<Vec<FontDescriptor>, CatalogError> {
        if let Some(fonts) = self.cache.read_fresh(&self.url, Utc::now()) {
            return Ok(fonts);
        }

        let fonts = self.inner.fetch()?;
        if let Err(e) = self.cache.write(&self.url, &fonts, Utc::now()) {
            log::error!("Failed to cache catalog from {}: {}", self.url, e);
        }
        Ok(fonts)
    }

    fn describe(&self) -> String {
        format!("{} (cached in {:?})", self.inner.describe(), self.cache.dir())
    }
}

/// Serves whatever the disk cache holds, however old, and never touches
/// the network. Used for offline sessions.
pub struct CacheOnlySource {
    cache: DiskCache,
    url: String,
}

impl CacheOnlySource {
    pub fn new(cache: DiskCache, url: impl Into<String>) -> Self {
        Self {
            cache,
            url: url.into(),
        }
    }
}

impl CatalogSource for CacheOnlySource {
    fn fetch(&self) -> Result<Vec<FontDescriptor>, CatalogError> {
        self.cache
            .read(&self.url)
            .map(|(fonts, _)| fonts)
            .map_err(|e| CatalogError::Request(format!("Offline and no cached catalog: {}", e)))
    }

    fn describe(&self) -> String {
        format!("offline cache {:?}", self.cache.dir())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    const URL: &str = "https://api.fontsource.org/v1/fonts";

    fn fonts() -> Vec<FontDescriptor> {
        vec![
            FontDescriptor::new("inter", "Inter").variable(),
            FontDescriptor::new("lato", "Lato").with_weights(&[400, 700]),
        ]
    }

    #[test]
    fn test_cache_filename_is_deterministic() {
        assert_eq!(url_to_cache_filename(URL), url_to_cache_filename(URL));
        assert_ne!(
            url_to_cache_filename(URL),
            url_to_cache_filename("https://example.com/fonts")
        );
        assert_eq!(url_to_cache_filename(URL).len(), 64);
    }

    #[test]
    fn test_payload_and_meta_use_distinct_temp_files() {
        let dir = Path::new("/cache");
        assert_eq!(temp_path_for(&dir.join("abc.json")), dir.join("abc.json.tmp"));
        assert_eq!(temp_path_for(&dir.join("abc.meta")), dir.join("abc.meta.tmp"));
    }

    #[test]
    fn test_write_leaves_no_temp_files() {
        let temp = tempdir().unwrap();
        let cache = DiskCache::new(temp.path(), 86400);
        cache.write(URL, &fonts(), Utc::now()).unwrap();

        let mut names: Vec<String> = std::fs::read_dir(temp.path())
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        let hash = url_to_cache_filename(URL);
        assert_eq!(names, vec![format!("{hash}.json"), format!("{hash}.meta")]);
    }

    #[test]
    fn test_write_then_read_fresh() {
        let temp = tempdir().unwrap();
        let cache = DiskCache::new(temp.path(), 86400);
        let now = Utc::now();

        cache.write(URL, &fonts(), now).unwrap();
        let cached = cache.read_fresh(URL, now + Duration::hours(23)).unwrap();
        assert_eq!(cached, fonts());
    }

    #[test]
    fn test_stale_entry_is_ignored() {
        let temp = tempdir().unwrap();
        let cache = DiskCache::new(temp.path(), 86400);
        let now = Utc::now();

        cache.write(URL, &fonts(), now - Duration::hours(25)).unwrap();
        assert!(cache.read_fresh(URL, now).is_none());
        // Still readable for offline use
        assert_eq!(cache.read(URL).unwrap().0.len(), 2);
    }

    #[test]
    fn test_corrupt_entry_is_ignored() {
        let temp = tempdir().unwrap();
        let cache = DiskCache::new(temp.path(), 86400);
        cache.write(URL, &fonts(), Utc::now()).unwrap();

        let hash = url_to_cache_filename(URL);
        std::fs::write(temp.path().join(format!("{hash}.json")), "{ torn").unwrap();
        assert!(cache.read_fresh(URL, Utc::now()).is_none());
    }

    #[test]
    fn test_future_timestamp_is_stale() {
        let meta = CacheMeta {
            url: URL.to_string(),
            fetched_at: (Utc::now() + Duration::hours(1)).to_rfc3339(),
            font_count: 0,
        };
        assert!(!meta.is_fresh(Duration::hours(24), Utc::now()));
    }

    #[test]
    fn test_invalid_timestamp_is_stale() {
        let meta = CacheMeta {
            url: URL.to_string(),
            fetched_at: "yesterday".to_string(),
            font_count: 0,
        };
        assert!(!meta.is_fresh(Duration::hours(24), Utc::now()));
    }

    #[test]
    fn test_cache_only_source_without_entry_fails() {
        let temp = tempdir().unwrap();
        let source = CacheOnlySource::new(DiskCache::new(temp.path(), 86400), URL);
        assert!(matches!(source.fetch(), Err(CatalogError::Request(_))));
    }
}
