// ── Core error types ──
//
// User-facing errors from prodman-core. Consumers never see reqwest types
// or raw response bodies; `From<prodman_api::Error>` folds every backend
// failure into `RequestFailed` with the message worth showing.

use std::path::PathBuf;

use thiserror::Error;

use crate::validate::ValidationErrors;

/// Unified error type for the core crate.
#[derive(Debug, Error)]
pub enum CoreError {
    // ── Backend errors ───────────────────────────────────────────────
    /// Any non-2xx outcome or transport failure. `message` is the server's
    /// `detail` or the per-operation fallback.
    #[error("{message}")]
    RequestFailed {
        message: String,
        status: Option<u16>,
        /// No response was received at all (connection refused, DNS).
        unreachable: bool,
        /// `message` came from the server rather than the fallback.
        server_detail: bool,
    },

    /// The backend answered successfully but with an empty payload.
    #[error("{entity} not found: {id}")]
    NotFound { entity: &'static str, id: String },

    // ── Input errors ─────────────────────────────────────────────────
    #[error("Validation failed: {0}")]
    ValidationRejected(ValidationErrors),

    #[error("{0}")]
    MissingInput(String),

    #[error("A request is already in flight")]
    InFlight,

    #[error("Cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Configuration errors ─────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

impl CoreError {
    /// Notice text for a failed action described by `context`
    /// (e.g. "Failed to delete product"). Server detail is appended when
    /// there is one.
    pub fn notice_text(&self, context: &str) -> String {
        match self {
            Self::RequestFailed {
                message,
                server_detail: true,
                ..
            } => format!("{context}: {message}"),
            Self::RequestFailed {
                unreachable: true, ..
            } => format!("{context}: backend unreachable."),
            Self::RequestFailed { .. } => format!("{context}."),
            other => format!("{context}: {other}"),
        }
    }

    /// Returns `true` for failures the operator can fix by editing input.
    pub fn is_input_error(&self) -> bool {
        matches!(
            self,
            Self::ValidationRejected(_) | Self::MissingInput(_) | Self::InFlight
        )
    }
}

impl From<ValidationErrors> for CoreError {
    fn from(errors: ValidationErrors) -> Self {
        Self::ValidationRejected(errors)
    }
}

// ── Conversion from transport-layer errors ───────────────────────────

impl From<prodman_api::Error> for CoreError {
    fn from(err: prodman_api::Error) -> Self {
        let unreachable = err.is_unreachable();
        match err {
            prodman_api::Error::RequestFailed {
                operation,
                status,
                message,
                ..
            } => CoreError::RequestFailed {
                server_detail: status.is_some() && message != operation.fallback_message(),
                message,
                status,
                unreachable,
            },
            prodman_api::Error::InvalidUrl(e) => CoreError::Config {
                message: format!("Invalid URL: {e}"),
            },
            prodman_api::Error::Tls(msg) => CoreError::Config {
                message: format!("TLS error: {msg}"),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use prodman_api::Operation;

    #[test]
    fn request_failed_keeps_server_message() {
        let api = prodman_api::Error::RequestFailed {
            operation: Operation::DeleteProduct,
            status: Some(404),
            message: "Product 9 not found".into(),
            source: None,
        };
        let core = CoreError::from(api);
        assert_eq!(core.to_string(), "Product 9 not found");
        assert!(matches!(
            core,
            CoreError::RequestFailed {
                status: Some(404),
                unreachable: false,
                ..
            }
        ));
    }

    #[test]
    fn notice_text_appends_server_detail_only() {
        let with_detail = CoreError::from(prodman_api::Error::RequestFailed {
            operation: Operation::DeleteProduct,
            status: Some(500),
            message: "database is locked".into(),
            source: None,
        });
        let fallback = CoreError::from(prodman_api::Error::RequestFailed {
            operation: Operation::DeleteProduct,
            status: Some(500),
            message: Operation::DeleteProduct.fallback_message().into(),
            source: None,
        });
        assert_eq!(
            with_detail.notice_text("Failed to delete product"),
            "Failed to delete product: database is locked"
        );
        assert_eq!(
            fallback.notice_text("Failed to delete product"),
            "Failed to delete product."
        );
    }

    #[test]
    fn tls_error_becomes_config() {
        let core = CoreError::from(prodman_api::Error::Tls("bad pem".into()));
        assert!(matches!(core, CoreError::Config { .. }));
        assert!(!core.is_input_error());
    }
}
