// prodman-core: Catalog, detail, and attachment state kept in sync with the backend.

pub mod config;
pub mod controller;
pub mod convert;
pub mod error;
pub mod model;
pub mod notice;
pub mod signal;
pub mod validate;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::{BackendConfig, DEFAULT_API_URL, TlsVerification};
pub use controller::{
    AttachmentManager, CatalogController, DetailController, FetchOutcome, FormMode, IngestMode,
    IngestRequest, IngestionDraft, PendingRemoval, ProductFormState, RequestTicket, SelectedFile,
};
pub use error::CoreError;
pub use notice::{Notice, NoticeLevel, Notifier};
pub use signal::CompletionSignal;
pub use validate::{Field, FieldError, ProductForm, ValidationErrors};

pub use model::{Document, DocumentSource, DocumentType, EntityId, Preview, Product, ProductFields};
