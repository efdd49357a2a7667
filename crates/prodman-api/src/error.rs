use strum::{Display, IntoStaticStr};
use thiserror::Error;

/// Backend resource action a request was issued for.
///
/// Every failure carries the operation so the fallback message can be
/// chosen when the server does not supply a usable `detail`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Operation {
    ListProducts,
    GetProduct,
    CreateProduct,
    UpdateProduct,
    DeleteProduct,
    UploadDocument,
    AddDocumentUrl,
    DeleteDocument,
    ListDocuments,
    GetDocument,
    ImportProducts,
    Welcome,
}

impl Operation {
    /// Generic per-operation message used when the error body is absent or
    /// unparsable.
    pub fn fallback_message(self) -> &'static str {
        match self {
            Self::ListProducts => "Failed to load products.",
            Self::GetProduct => "Failed to load product details.",
            Self::CreateProduct => "Failed to create product.",
            Self::UpdateProduct => "Failed to update product.",
            Self::DeleteProduct => "Failed to delete product.",
            Self::UploadDocument => "Failed to upload document.",
            Self::AddDocumentUrl => "Failed to add document URL.",
            Self::DeleteDocument => "Failed to delete document.",
            Self::ListDocuments => "Failed to load documents.",
            Self::GetDocument => "Failed to load document.",
            Self::ImportProducts => "Failed to import products file.",
            Self::Welcome => "Backend is not reachable.",
        }
    }
}

/// Top-level error type for the `prodman-api` crate.
///
/// Every backend call fails with [`Error::RequestFailed`]; the remaining
/// variants can only occur while constructing a client.
#[derive(Debug, Error)]
pub enum Error {
    /// Non-2xx response, transport failure, or undecodable success body.
    ///
    /// `message` is the server's `detail` when present, otherwise the
    /// operation's fallback message. `status` is `None` when no HTTP
    /// response was received.
    #[error("{message}")]
    RequestFailed {
        operation: Operation,
        status: Option<u16>,
        message: String,
        #[source]
        source: Option<reqwest::Error>,
    },

    /// URL parsing error.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// TLS setup or HTTP client construction error.
    #[error("TLS error: {0}")]
    Tls(String),
}

impl Error {
    /// Build a `RequestFailed` for a request that never produced a response.
    pub(crate) fn transport(operation: Operation, err: reqwest::Error) -> Self {
        Self::RequestFailed {
            operation,
            status: err.status().map(|s| s.as_u16()),
            message: operation.fallback_message().to_owned(),
            source: Some(err),
        }
    }

    /// The operation a `RequestFailed` belongs to.
    pub fn operation(&self) -> Option<Operation> {
        match self {
            Self::RequestFailed { operation, .. } => Some(*operation),
            _ => None,
        }
    }

    /// HTTP status, when the server answered.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::RequestFailed { status, .. } => *status,
            _ => None,
        }
    }

    /// Returns `true` if the server answered 404.
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(404)
    }

    /// Returns `true` if no response was received at all.
    pub fn is_unreachable(&self) -> bool {
        matches!(
            self,
            Self::RequestFailed {
                status: None,
                source: Some(e),
                ..
            } if e.is_connect() || e.is_request()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fallback_messages_are_operation_specific() {
        assert_eq!(
            Operation::CreateProduct.fallback_message(),
            "Failed to create product."
        );
        assert_ne!(
            Operation::DeleteProduct.fallback_message(),
            Operation::DeleteDocument.fallback_message()
        );
    }

    #[test]
    fn request_failed_displays_message_only() {
        let err = Error::RequestFailed {
            operation: Operation::GetProduct,
            status: Some(404),
            message: "Product 7 not found".into(),
            source: None,
        };
        assert_eq!(err.to_string(), "Product 7 not found");
        assert!(err.is_not_found());
        assert_eq!(err.operation(), Some(Operation::GetProduct));
    }

    #[test]
    fn operation_displays_snake_case() {
        assert_eq!(Operation::AddDocumentUrl.to_string(), "add_document_url");
    }
}
