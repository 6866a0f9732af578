//! Default value functions for configuration.
//!
//! Used as `#[serde(default = "crate::defaults::...")]` attributes on
//! `Config` fields so that partial YAML files still load.

/// Remote font catalog endpoint.
pub fn catalog_url() -> String {
    "https://api.fontsource.org/v1/fonts".to_string()
}

/// Freshness window of the on-disk catalog cache (24 hours).
pub fn cache_ttl_secs() -> u64 {
    24 * 60 * 60
}

/// Timeout for the catalog request.
pub fn fetch_timeout_secs() -> u64 {
    30
}

/// Upper bound on the catalog response body (16 MB).
pub fn max_response_bytes() -> u64 {
    16 * 1024 * 1024
}

/// CDN base used in generated font-face sources.
pub fn cdn_base() -> String {
    "https://cdn.jsdelivr.net/fontsource/fonts".to_string()
}

/// Attribute marking the injected style block.
pub fn style_marker() -> String {
    "data-fontsource".to_string()
}

pub fn bool_true() -> bool {
    true
}
