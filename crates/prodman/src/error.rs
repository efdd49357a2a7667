//! CLI error types with miette diagnostics.
//!
//! Maps `CoreError` and `ConfigError` into user-facing errors with
//! actionable help text and a stable exit code.

use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

use prodman_config::ConfigError;
use prodman_core::CoreError;

/// Process exit codes.
pub mod exit_code {
    pub const GENERAL: i32 = 1;
    pub const USAGE: i32 = 2;
    pub const NOT_FOUND: i32 = 4;
    pub const CONNECTION: i32 = 7;
}

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    // ── Backend ──────────────────────────────────────────────────────
    #[error("{message}")]
    #[diagnostic(
        code(prodman::connection_failed),
        help(
            "Check that the backend is running and reachable.\n\
             Point the CLI at it with --api-url or `prodman config init`."
        )
    )]
    ConnectionFailed { message: String },

    #[error("{message}")]
    #[diagnostic(code(prodman::request_failed))]
    RequestFailed { message: String, status: Option<u16> },

    #[error("{resource_type} '{identifier}' not found")]
    #[diagnostic(
        code(prodman::not_found),
        help("Run: prodman {list_command} to see what exists")
    )]
    NotFound {
        resource_type: String,
        identifier: String,
        list_command: String,
    },

    // ── Input ────────────────────────────────────────────────────────
    #[error("Invalid value for {field}: {reason}")]
    #[diagnostic(code(prodman::validation))]
    Validation { field: String, reason: String },

    #[error("Cannot read {}", path.display())]
    #[diagnostic(code(prodman::file), help("Check the file path and permissions."))]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Configuration ────────────────────────────────────────────────
    #[error("Profile '{name}' not found in configuration")]
    #[diagnostic(
        code(prodman::profile_not_found),
        help(
            "Available profiles: {available}\n\
             Create one with: prodman config init --api-url <URL> --profile {name}"
        )
    )]
    ProfileNotFound { name: String, available: String },

    #[error("Configuration error: {message}")]
    #[diagnostic(code(prodman::config))]
    Config { message: String },

    // ── Interactive ──────────────────────────────────────────────────
    #[error("Destructive operation '{action}' requires confirmation")]
    #[diagnostic(
        code(prodman::confirmation_required),
        help("Use --yes (-y) to skip confirmation in non-interactive contexts.")
    )]
    NonInteractiveRequiresYes { action: String },

    // ── IO ───────────────────────────────────────────────────────────
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Map this error to an exit code for process termination.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConnectionFailed { .. } => exit_code::CONNECTION,
            Self::NotFound { .. }
            | Self::RequestFailed {
                status: Some(404), ..
            } => exit_code::NOT_FOUND,
            Self::Validation { .. } | Self::NonInteractiveRequiresYes { .. } => exit_code::USAGE,
            _ => exit_code::GENERAL,
        }
    }
}

// ── CoreError → CliError mapping ─────────────────────────────────────

impl From<CoreError> for CliError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::RequestFailed {
                message,
                unreachable: true,
                ..
            } => CliError::ConnectionFailed {
                message: format!("{message} The backend did not answer."),
            },

            CoreError::RequestFailed {
                message, status, ..
            } => CliError::RequestFailed { message, status },

            CoreError::NotFound { entity, id } => {
                let resource_type = entity.to_lowercase();
                let list_command = if resource_type == "document" {
                    "documents list <PRODUCT_ID>".into()
                } else {
                    format!("{resource_type}s list")
                };
                CliError::NotFound {
                    resource_type,
                    identifier: id,
                    list_command,
                }
            }

            CoreError::ValidationRejected(errors) => CliError::Validation {
                field: errors
                    .iter()
                    .map(|e| e.field.to_string())
                    .collect::<Vec<_>>()
                    .join(", "),
                reason: errors
                    .iter()
                    .map(|e| e.message.clone())
                    .collect::<Vec<_>>()
                    .join("; "),
            },

            CoreError::MissingInput(reason) => CliError::Validation {
                field: "input".into(),
                reason,
            },

            CoreError::InFlight => CliError::Validation {
                field: "request".into(),
                reason: "a request is already in flight".into(),
            },

            CoreError::Io { path, source } => CliError::FileRead { path, source },

            CoreError::Config { message } => CliError::Config { message },
        }
    }
}

impl From<ConfigError> for CliError {
    fn from(err: ConfigError) -> Self {
        match err {
            ConfigError::Validation { field, reason } => CliError::Validation { field, reason },
            ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: "(none)".into(),
            },
            ConfigError::Io(e) => CliError::Io(e),
            other => CliError::Config {
                message: other.to_string(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unreachable_backend_exits_with_connection_code() {
        let err = CliError::from(CoreError::RequestFailed {
            message: "Failed to load products.".into(),
            status: None,
            unreachable: true,
            server_detail: false,
        });
        assert_eq!(err.exit_code(), exit_code::CONNECTION);
    }

    #[test]
    fn server_404_exits_with_not_found_code() {
        let err = CliError::from(CoreError::RequestFailed {
            message: "Product 42 not found".into(),
            status: Some(404),
            unreachable: false,
            server_detail: true,
        });
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
        assert_eq!(err.to_string(), "Product 42 not found");
    }

    #[test]
    fn input_errors_are_usage_errors() {
        let err = CliError::from(CoreError::MissingInput(
            "Please select a file to upload.".into(),
        ));
        assert_eq!(err.exit_code(), exit_code::USAGE);
        assert_eq!(CliError::from(CoreError::InFlight).exit_code(), exit_code::USAGE);
    }

    #[test]
    fn empty_document_lookup_points_at_documents_list() {
        let err = CliError::from(CoreError::NotFound {
            entity: "Document",
            id: "7".into(),
        });
        let CliError::NotFound { list_command, .. } = &err else {
            panic!("expected NotFound, got {err:?}");
        };
        assert!(list_command.starts_with("documents list"));
        assert_eq!(err.exit_code(), exit_code::NOT_FOUND);
    }
}
