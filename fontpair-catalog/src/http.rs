//! HTTP client helper with native-tls support.

use std::time::Duration;
use ureq::Agent;
use ureq::tls::{RootCerts, TlsConfig, TlsProvider};

/// User-Agent sent with every catalog request.
pub const USER_AGENT: &str = concat!("fontpair/", env!("CARGO_PKG_VERSION"));

/// Hosts allowed to serve the catalog.
pub const ALLOWED_HOSTS: &[&str] = &["api.fontsource.org"];

/// Validate that a URL is acceptable as a catalog endpoint.
///
/// Only HTTPS URLs on an [`ALLOWED_HOSTS`] host are accepted. Font
/// descriptors end up as stylesheet text.
pub fn validate_catalog_url(url: &str) -> Result<(), String> {
    let parsed = url::Url::parse(url).map_err(|e| format!("Invalid URL '{}': {}", url, e))?;

    match parsed.scheme() {
        "https" => {}
        scheme => {
            return Err(format!(
                "Insecure URL scheme '{}' rejected; only HTTPS is allowed. URL: {}",
                scheme, url
            ));
        }
    }

    let host = parsed.host_str().unwrap_or("");
    if !ALLOWED_HOSTS.contains(&host) {
        return Err(format!(
            "URL host '{}' is not an allowed catalog host. Allowed hosts: {}. URL: {}",
            host,
            ALLOWED_HOSTS.join(", "),
            url
        ));
    }

    Ok(())
}

/// Create an HTTP agent configured with native-tls and a global timeout.
///
/// Non-2xx responses are returned as responses rather than errors so the
/// caller can read the `{ "error": ... }` body the catalog proxy sends.
pub fn agent(timeout: Duration) -> Agent {
    let tls_config = TlsConfig::builder()
        .provider(TlsProvider::NativeTls)
        .root_certs(RootCerts::PlatformVerifier)
        .build();

    Agent::config_builder()
        .tls_config(tls_config)
        .timeout_global(Some(timeout))
        .http_status_as_error(false)
        .build()
        .into()
}
