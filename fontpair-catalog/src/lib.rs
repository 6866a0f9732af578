//! Remote font catalog for the fontpair playground.
//!
//! Provides:
//! - `descriptor`: `FontDescriptor` records and the immutable `Catalog` lookup
//! - `source`: the `CatalogSource` seam and the HTTP implementation
//! - `disk_cache`: last-good payload on disk with a freshness window
//! - `cache`: `CatalogCache`, the fetch-once, single-flight loader
//! - `http`: agent construction and URL validation

pub mod cache;
pub mod descriptor;
pub mod disk_cache;
pub mod error;
pub mod http;
pub mod source;

pub use cache::{CatalogCache, LoadState};
pub use descriptor::{Catalog, FontDescriptor};
pub use disk_cache::{CacheMeta, CacheOnlySource, CachedSource, DiskCache};
pub use error::CatalogError;
pub use source::{CatalogSource, HttpCatalogSource, classify_response, parse_catalog};
