//! Upstream address normalization.

use crate::config::UpstreamConfig;

/// Base URL used when no upstream address is configured.
pub const DEFAULT_UPSTREAM: &str = "http://localhost:3000";

/// Normalize a raw upstream address into a fully-qualified base URL.
///
/// - empty input yields [`DEFAULT_UPSTREAM`]
/// - input already starting with `http://` or `https://` is returned unchanged
/// - anything else gets `https://` prepended, since hosting platforms
///   often hand out a bare `host:port` that expects encrypted egress
pub fn resolve(raw: &str) -> String {
    if raw.is_empty() {
        return DEFAULT_UPSTREAM.to_string();
    }

    if raw.starts_with("http://") || raw.starts_with("https://") {
        return raw.to_string();
    }

    format!("https://{}", raw)
}

/// The resolved upstream origin. Immutable for the process lifetime.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upstream {
    base_url: String,
}

impl Upstream {
    /// Resolve the configured upstream and log the result once.
    pub fn from_config(config: &UpstreamConfig) -> Self {
        let raw = config.url.as_deref().unwrap_or_default();
        let upstream = Self::new(raw);

        tracing::info!(
            raw = %raw,
            resolved = %upstream.base_url,
            "Upstream resolved"
        );

        upstream
    }

    /// Build from a raw address without logging.
    pub fn new(raw: &str) -> Self {
        Self {
            base_url: resolve(raw),
        }
    }

    /// The normalized base URL, including the scheme.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}
