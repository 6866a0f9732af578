//! Where catalog payloads come from.
//!
//! [`CatalogSource`] is the seam between the loader and the network. The
//! loader only ever calls `fetch` once per session; sources are free to
//! block.

use crate::descriptor::FontDescriptor;
use crate::error::CatalogError;
use fontpair_config::CatalogConfig;
use std::time::Duration;

/// A provider of the full descriptor list.
pub trait CatalogSource: Send + Sync {
    /// Fetch every descriptor. May block.
    fn fetch(&self) -> Result<Vec<FontDescriptor>, CatalogError>;

    /// Short description for log lines.
    fn describe(&self) -> String;
}

/// Parse a catalog body into descriptors.
///
/// The body must be a JSON array. Records without an id or family are
/// dropped with a warning rather than failing the whole catalog.
pub fn parse_catalog(body: &str) -> Result<Vec<FontDescriptor>, CatalogError> {
    let fonts: Vec<FontDescriptor> =
        serde_json::from_str(body).map_err(|e| CatalogError::Malformed(e.to_string()))?;

    let total = fonts.len();
    let fonts: Vec<FontDescriptor> = fonts
        .into_iter()
        .filter(|f| !f.id.trim().is_empty() && !f.family.trim().is_empty())
        .collect();
    if fonts.len() != total {
        log::warn!(
            "Dropped {} catalog records without id or family",
            total - fonts.len()
        );
    }
    Ok(fonts)
}

/// Extract the `error` field the catalog proxy puts in failure bodies.
fn error_message(body: &str) -> String {
    serde_json::from_str::<serde_json::Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|v| v.as_str())
                .map(|s| s.to_string())
        })
        .unwrap_or_else(|| "Unknown error".to_string())
}

/// Turn an HTTP status and body into descriptors or a classified error.
///
/// Non-2xx statuses become [`CatalogError::Unavailable`] carrying the
/// proxy's `error` message when the body has one; a 2xx body that is not a
/// descriptor array is [`CatalogError::Malformed`].
pub fn classify_response(status: u16, body: &str) -> Result<Vec<FontDescriptor>, CatalogError> {
    if !(200..300).contains(&status) {
        return Err(CatalogError::Unavailable {
            status,
            message: error_message(body),
        });
    }
    parse_catalog(body)
}

/// Fetches the catalog from an HTTPS endpoint.
#[derive(Debug, Clone)]
pub struct HttpCatalogSource {
    url: String,
    timeout: Duration,
    max_response_bytes: u64,
}

impl HttpCatalogSource {
    pub fn new(url: impl Into<String>, timeout: Duration, max_response_bytes: u64) -> Self {
        Self {
            url: url.into(),
            timeout,
            max_response_bytes,
        }
    }

    pub fn from_config(config: &CatalogConfig) -> Self {
        Self::new(
            config.url.clone(),
            Duration::from_secs(config.fetch_timeout_secs),
            config.max_response_bytes,
        )
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl CatalogSource for HttpCatalogSource {
    fn fetch(&self) -> Result<Vec<FontDescriptor>, CatalogError> {
        // Validate at call time so a bad config value never reaches the network.
        crate::http::validate_catalog_url(&self.url).map_err(CatalogError::InvalidUrl)?;

        log::info!("Fetching font catalog from {}", self.url);

        let mut response = crate::http::agent(self.timeout)
            .get(&self.url)
            .header("User-Agent", crate::http::USER_AGENT)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| CatalogError::Request(format!("{}: {}", self.url, e)))?;

        let status = response.status().as_u16();
        let body = response
            .body_mut()
            .with_config()
            .limit(self.max_response_bytes)
            .read_to_string()
            .map_err(|e| {
                CatalogError::Request(format!(
                    "Failed to read response body from {}: {}",
                    self.url, e
                ))
            })?;

        let fonts = classify_response(status, &body)?;
        log::info!("Fetched {} font descriptors from {}", fonts.len(), self.url);
        Ok(fonts)
    }

    fn describe(&self) -> String {
        self.url.clone()
    }
}
