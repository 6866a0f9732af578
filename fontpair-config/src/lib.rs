//! Configuration system for the fontpair playground.
//!
//! This crate provides configuration loading, saving, and default values,
//! plus the durable key-value boundary used by the favorites store and the
//! optional selection persistence. It includes:
//!
//! - The `Config` struct and its YAML persistence
//! - Default value functions used by serde
//! - Typed `ConfigError` variants
//! - Named-record storage (`RecordStore`) with file and in-memory backends

pub mod config;
pub mod defaults;
pub mod error;
pub mod records;
mod types;

// Re-export main types for convenience
pub use config::{CatalogConfig, Config, StyleConfig};
pub use error::ConfigError;
pub use records::{FileRecordStore, MemoryRecordStore, RecordStore};
pub use types::LogLevel;
