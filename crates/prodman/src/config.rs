//! CLI configuration: a thin wrapper around `prodman_config`.
//!
//! Re-exports the shared types and resolves the backend settings with the
//! global flags (--profile, --api-url, --insecure) layered on top.

use prodman_core::{BackendConfig, DEFAULT_API_URL, TlsVerification};

use crate::cli::GlobalOpts;
use crate::error::CliError;

pub use prodman_config::{Config, Profile, config_path, load_config_or_default, save_config};

/// Resolve the active profile name from CLI flags and config.
pub fn active_profile_name(global: &GlobalOpts, config: &Config) -> String {
    global
        .profile
        .clone()
        .or_else(|| config.default_profile.clone())
        .unwrap_or_else(|| "default".into())
}

fn parse_api_url(raw: &str) -> Result<url::Url, CliError> {
    raw.parse().map_err(|_| CliError::Validation {
        field: "api-url".into(),
        reason: format!("invalid URL: {raw}"),
    })
}

/// Build the `BackendConfig` for this invocation.
///
/// Precedence: --api-url / `PRODMAN_API_URL`, then the active profile,
/// then the built-in default. An explicitly named profile must exist.
pub fn resolve_backend(global: &GlobalOpts) -> Result<BackendConfig, CliError> {
    let cfg = load_config_or_default();
    let profile_name = active_profile_name(global, &cfg);

    let mut backend = if let Some(profile) = cfg.profiles.get(&profile_name) {
        prodman_config::profile_to_backend_config(profile, &cfg.defaults)?
    } else if global.profile.is_some() {
        let mut names: Vec<_> = cfg.profiles.keys().cloned().collect();
        names.sort();
        return Err(CliError::ProfileNotFound {
            name: profile_name,
            available: if names.is_empty() {
                "(none)".into()
            } else {
                names.join(", ")
            },
        });
    } else {
        let mut backend = BackendConfig::new(parse_api_url(DEFAULT_API_URL)?);
        if cfg.defaults.insecure {
            backend.tls = TlsVerification::DangerAcceptInvalid;
        }
        backend
    };

    if let Some(raw) = global.api_url.as_deref() {
        backend.api_url = parse_api_url(raw)?;
    }
    if global.insecure {
        backend.tls = TlsVerification::DangerAcceptInvalid;
    }
    tracing::debug!(profile = %profile_name, api_url = %backend.api_url, "backend resolved");
    Ok(backend)
}
