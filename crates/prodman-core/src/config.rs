// ── Runtime backend configuration ──
//
// Describes *where* the catalog backend lives and how to trust it. Never
// touches disk: the CLI builds a `BackendConfig` from its profile and hands
// it in.

use url::Url;

use prodman_api::{TlsMode, TransportConfig};

/// Backend assumed when nothing else is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:8000";

/// TLS verification strategy.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TlsVerification {
    /// System CA store (strict).
    #[default]
    SystemDefaults,
    /// Custom CA certificate file.
    CustomCa(std::path::PathBuf),
    /// Skip verification (self-signed development backends).
    DangerAcceptInvalid,
}

/// Connection settings for a single backend.
#[derive(Debug, Clone)]
pub struct BackendConfig {
    /// REST API root (e.g., `http://localhost:8000`).
    pub api_url: Url,
    /// Origin that storage-relative document paths are resolved against.
    /// `None` uses the API URL's origin.
    pub media_origin: Option<Url>,
    pub tls: TlsVerification,
}

impl BackendConfig {
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            media_origin: None,
            tls: TlsVerification::default(),
        }
    }

    /// Origin string used by `DocumentSource::resolve`, without a trailing slash.
    pub fn media_origin(&self) -> String {
        match &self.media_origin {
            // An explicit origin may carry a path prefix (e.g. a CDN mount).
            Some(url) => url.as_str().trim_end_matches('/').to_owned(),
            None => self.api_url.origin().ascii_serialization(),
        }
    }

    pub fn transport(&self) -> TransportConfig {
        TransportConfig {
            tls: match &self.tls {
                TlsVerification::SystemDefaults => TlsMode::System,
                TlsVerification::CustomCa(path) => TlsMode::CustomCa(path.clone()),
                TlsVerification::DangerAcceptInvalid => TlsMode::DangerAcceptInvalid,
            },
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn media_origin_defaults_to_api_origin() {
        let cfg = BackendConfig::new(Url::parse("http://localhost:8000/api/").unwrap());
        assert_eq!(cfg.media_origin(), "http://localhost:8000");
    }

    #[test]
    fn explicit_media_origin_keeps_path() {
        let mut cfg = BackendConfig::new(Url::parse("http://localhost:8000").unwrap());
        cfg.media_origin = Some(Url::parse("https://cdn.example.com/assets/").unwrap());
        assert_eq!(cfg.media_origin(), "https://cdn.example.com/assets");
    }
}
