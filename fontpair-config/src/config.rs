//! The `Config` struct and its persistence.
//!
//! Covers:
//! - `load` / `save` (YAML file I/O with atomic write)
//! - XDG-style path helpers (`config_path`, `config_dir`, `data_dir`, `cache_dir`)
//! - Semantic validation run after every load

use crate::error::ConfigError;
use crate::types::LogLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Application directory name under the platform config/cache roots.
const APP_DIR: &str = "fontpair";

/// Remote catalog settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Endpoint returning the JSON array of font descriptors
    #[serde(default = "crate::defaults::catalog_url")]
    pub url: String,

    /// How long a cached catalog stays fresh, in seconds
    #[serde(default = "crate::defaults::cache_ttl_secs")]
    pub cache_ttl_secs: u64,

    /// Global request timeout, in seconds
    #[serde(default = "crate::defaults::fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Maximum accepted response body size, in bytes
    #[serde(default = "crate::defaults::max_response_bytes")]
    pub max_response_bytes: u64,

    /// Whether to keep a copy of the last successful fetch on disk
    #[serde(default = "crate::defaults::bool_true")]
    pub disk_cache: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            url: crate::defaults::catalog_url(),
            cache_ttl_secs: crate::defaults::cache_ttl_secs(),
            fetch_timeout_secs: crate::defaults::fetch_timeout_secs(),
            max_response_bytes: crate::defaults::max_response_bytes(),
            disk_cache: true,
        }
    }
}

/// Generated stylesheet settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleConfig {
    /// Base URL of the font file CDN
    #[serde(default = "crate::defaults::cdn_base")]
    pub cdn_base: String,

    /// Marker identifying the injected style block
    #[serde(default = "crate::defaults::style_marker")]
    pub marker: String,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            cdn_base: crate::defaults::cdn_base(),
            marker: crate::defaults::style_marker(),
        }
    }
}

/// Top-level configuration, stored at `~/.config/fontpair/config.yaml`.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,

    #[serde(default)]
    pub style: StyleConfig,

    /// Keep the current selection across sessions (off by default)
    #[serde(default)]
    pub persist_selection: bool,

    /// Level written to the debug log file
    #[serde(default)]
    pub log_level: LogLevel,

    /// Overrides the directory holding favorites and selection records
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,
}

impl Config {
    /// Create a new configuration with default settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Load configuration from the default path, creating it when absent.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            log::info!(
                "Config file not found, creating default at {:?}",
                config_path
            );
            let config = Self::default();
            if let Err(e) = config.save_to(&config_path) {
                // A read-only home directory must not prevent startup.
                log::error!("Failed to save default config: {}", e);
            }
            Ok(config)
        }
    }

    /// Load and validate configuration from a specific file.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        let contents = fs::read_to_string(path)?;
        if contents.trim().is_empty() {
            log::info!("Config file {:?} is empty, using defaults", path);
            return Ok(Self::default());
        }
        let config: Config = serde_yaml_ng::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a specific file.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(self)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Check field values that serde cannot express.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.catalog.url.trim().is_empty() {
            return Err(ConfigError::Validation(
                "catalog.url must not be empty".to_string(),
            ));
        }
        if self.catalog.fetch_timeout_secs == 0 {
            return Err(ConfigError::Validation(
                "catalog.fetch_timeout_secs must be greater than zero".to_string(),
            ));
        }
        if self.catalog.max_response_bytes == 0 {
            return Err(ConfigError::Validation(
                "catalog.max_response_bytes must be greater than zero".to_string(),
            ));
        }
        if self.style.marker.trim().is_empty() {
            return Err(ConfigError::Validation(
                "style.marker must not be empty".to_string(),
            ));
        }
        Ok(())
    }

    /// Get the configuration directory path (using XDG convention)
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join(APP_DIR)
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            // ~/.config/fontpair on every unix, including macOS
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join(APP_DIR)
            } else {
                PathBuf::from(".")
            }
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }

    /// Directory holding durable records (favorites, selection).
    pub fn data_dir(&self) -> PathBuf {
        self.data_dir
            .clone()
            .unwrap_or_else(|| Self::config_dir().join("state"))
    }

    /// Directory holding the catalog cache.
    pub fn cache_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(APP_DIR)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_defaults() {
        let config = Config::default();
        assert_eq!(config.catalog.url, "https://api.fontsource.org/v1/fonts");
        assert_eq!(config.catalog.cache_ttl_secs, 86400);
        assert!(config.catalog.disk_cache);
        assert_eq!(config.style.marker, "data-fontsource");
        assert!(!config.persist_selection);
        assert_eq!(config.log_level, LogLevel::Warn);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_deserialize_minimal_yaml() {
        let yaml = "persist_selection: true\n";
        let config: Config = serde_yaml_ng::from_str(yaml).expect("deserialize minimal");
        assert!(config.persist_selection);
        assert_eq!(config.catalog, CatalogConfig::default());
        assert_eq!(config.style, StyleConfig::default());
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("nested").join("config.yaml");

        let mut config = Config::new();
        config.catalog.cache_ttl_secs = 60;
        config.log_level = LogLevel::Debug;
        config.data_dir = Some(temp.path().join("data"));
        config.save_to(&path).unwrap();

        let loaded = Config::load_from(&path).unwrap();
        assert_eq!(loaded, config);
        assert!(!path.with_extension("yaml.tmp").exists());
    }

    #[test]
    fn test_load_empty_file_uses_defaults() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "   \n").unwrap();

        assert_eq!(Config::load_from(&path).unwrap(), Config::default());
    }

    #[test]
    fn test_invalid_yaml_is_parse_error() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "catalog: [not, a, map").unwrap();

        assert!(matches!(
            Config::load_from(&path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_validation_rejects_zero_timeout() {
        let temp = tempdir().unwrap();
        let path = temp.path().join("config.yaml");
        std::fs::write(&path, "catalog:\n  fetch_timeout_secs: 0\n").unwrap();

        let err = Config::load_from(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Validation(_)));
        assert!(err.to_string().contains("fetch_timeout_secs"));
    }

    #[test]
    fn test_data_dir_override() {
        let mut config = Config::default();
        config.data_dir = Some(PathBuf::from("/tmp/fontpair-data"));
        assert_eq!(config.data_dir(), PathBuf::from("/tmp/fontpair-data"));
    }
}
