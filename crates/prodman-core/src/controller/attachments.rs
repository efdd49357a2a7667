// ── Document ingestion ──
//
// One manager per target product. The operator picks a mode (file upload
// or URL registration), a document type, and an optional label, then
// starts the request. Success resets transient inputs but keeps the type;
// failure keeps everything so the operator can retry.

use std::path::Path;

use bytes::Bytes;
use tracing::{debug, info};

use prodman_api::{ApiClient, DocumentResponse, FileUpload, ResourceId};

use crate::error::CoreError;
use crate::model::{Document, DocumentType, EntityId};
use crate::notice::Notifier;
use crate::signal::{CompletionSignal, SignalSender};
use crate::validate::validate_document_url;

// ── Inputs ──────────────────────────────────────────────────────────

/// A file chosen for upload. Selecting another replaces it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectedFile {
    pub name: String,
    pub bytes: Bytes,
    pub mime: Option<String>,
}

impl SelectedFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
            mime: None,
        }
    }

    /// Read a file from disk, keeping only its final path component as the
    /// upload name.
    pub async fn from_path(path: &Path) -> Result<Self, CoreError> {
        let bytes = tokio::fs::read(path).await.map_err(|source| CoreError::Io {
            path: path.to_owned(),
            source,
        })?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| CoreError::MissingInput(format!("{} is not a file", path.display())))?;
        Ok(Self::new(name, bytes))
    }

    pub(crate) fn to_upload(&self) -> FileUpload {
        FileUpload {
            file_name: self.name.clone(),
            bytes: self.bytes.clone(),
            mime: self.mime.clone(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IngestMode {
    File,
    Url,
}

/// Operator input for the active ingestion mode.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestionDraft {
    File {
        file: Option<SelectedFile>,
        doc_type: DocumentType,
        label: String,
    },
    Url {
        url: String,
        doc_type: DocumentType,
        label: String,
    },
}

impl Default for IngestionDraft {
    fn default() -> Self {
        Self::File {
            file: None,
            doc_type: DocumentType::default(),
            label: String::new(),
        }
    }
}

impl IngestionDraft {
    pub fn mode(&self) -> IngestMode {
        match self {
            Self::File { .. } => IngestMode::File,
            Self::Url { .. } => IngestMode::Url,
        }
    }

    pub fn doc_type(&self) -> DocumentType {
        match self {
            Self::File { doc_type, .. } | Self::Url { doc_type, .. } => *doc_type,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Self::File { label, .. } | Self::Url { label, .. } => label,
        }
    }

    fn has_required_input(&self) -> bool {
        match self {
            Self::File { file, .. } => file.is_some(),
            Self::Url { url, .. } => !url.trim().is_empty(),
        }
    }

    /// Switch mode, carrying type and label across. The other mode's
    /// transient input is dropped.
    fn switch_to(&mut self, mode: IngestMode) {
        if self.mode() == mode {
            return;
        }
        let doc_type = self.doc_type();
        let label = std::mem::take(self.label_mut());
        *self = match mode {
            IngestMode::File => Self::File {
                file: None,
                doc_type,
                label,
            },
            IngestMode::Url => Self::Url {
                url: String::new(),
                doc_type,
                label,
            },
        };
    }

    fn label_mut(&mut self) -> &mut String {
        match self {
            Self::File { label, .. } | Self::Url { label, .. } => label,
        }
    }

    fn set_doc_type(&mut self, value: DocumentType) {
        match self {
            Self::File { doc_type, .. } | Self::Url { doc_type, .. } => *doc_type = value,
        }
    }

    /// Clear file/url and label; the type survives.
    fn reset_transient(&mut self) {
        match self {
            Self::File { file, label, .. } => {
                *file = None;
                label.clear();
            }
            Self::Url { url, label, .. } => {
                url.clear();
                label.clear();
            }
        }
    }
}

/// A validated request captured from the draft at start time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IngestRequest {
    File {
        file: SelectedFile,
        doc_type: DocumentType,
        label: Option<String>,
    },
    Url {
        url: String,
        doc_type: DocumentType,
        label: Option<String>,
    },
}

impl IngestRequest {
    fn success_message(&self) -> String {
        match self {
            Self::File { file, doc_type, .. } if doc_type.is_processed_async() => format!(
                "{} file uploaded. Spreadsheet content is processed in the background \
                 and will appear after a later refresh.",
                file.name
            ),
            Self::File { file, .. } => format!("{} file uploaded successfully.", file.name),
            Self::Url { .. } => "URL added successfully.".to_owned(),
        }
    }

    fn failure_message(&self, err: &CoreError) -> String {
        match self {
            Self::File { file, .. } => err.notice_text(&format!("{} file upload failed", file.name)),
            Self::Url { .. } => err.notice_text("Failed to add URL"),
        }
    }
}

/// Blank labels are sent as absent so the backend derives its default.
fn normalize_label(label: &str) -> Option<String> {
    let trimmed = label.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

// ── Manager ─────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct AttachmentManager {
    api: ApiClient,
    notifier: Notifier,
    signals: SignalSender,
    product_id: EntityId,
    draft: IngestionDraft,
    in_flight: bool,
}

impl AttachmentManager {
    pub fn new(
        api: ApiClient,
        notifier: Notifier,
        signals: SignalSender,
        product_id: EntityId,
    ) -> Self {
        Self {
            api,
            notifier,
            signals,
            product_id,
            draft: IngestionDraft::default(),
            in_flight: false,
        }
    }

    pub fn product_id(&self) -> &EntityId {
        &self.product_id
    }

    pub fn draft(&self) -> &IngestionDraft {
        &self.draft
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight
    }

    /// "Start" is enabled only with the active mode's required input and no
    /// request in flight.
    pub fn can_start(&self) -> bool {
        !self.in_flight && self.draft.has_required_input()
    }

    // ── Draft editing ────────────────────────────────────────────────

    pub fn set_mode(&mut self, mode: IngestMode) {
        self.draft.switch_to(mode);
    }

    pub fn set_doc_type(&mut self, doc_type: DocumentType) {
        self.draft.set_doc_type(doc_type);
    }

    pub fn set_label(&mut self, label: impl Into<String>) {
        *self.draft.label_mut() = label.into();
    }

    /// Select the file to upload, replacing any previous selection.
    pub fn select_file(&mut self, selected: SelectedFile) {
        self.draft.switch_to(IngestMode::File);
        if let IngestionDraft::File { file, .. } = &mut self.draft {
            *file = Some(selected);
        }
    }

    pub fn clear_file(&mut self) {
        if let IngestionDraft::File { file, .. } = &mut self.draft {
            *file = None;
        }
    }

    pub fn set_url(&mut self, value: impl Into<String>) {
        self.draft.switch_to(IngestMode::Url);
        if let IngestionDraft::Url { url, .. } = &mut self.draft {
            *url = value.into();
        }
    }

    // ── Ingestion ────────────────────────────────────────────────────

    /// Upload the selected file or register the URL, whichever mode is
    /// active.
    pub async fn start(&mut self) -> Result<Option<Document>, CoreError> {
        let request = self.begin_start()?;
        let product_id = ResourceId::from(&self.product_id);
        let result = match &request {
            IngestRequest::File {
                file,
                doc_type,
                label,
            } => {
                self.api
                    .upload_document(
                        &product_id,
                        file.to_upload(),
                        doc_type.as_ref(),
                        label.as_deref(),
                    )
                    .await
            }
            IngestRequest::Url {
                url,
                doc_type,
                label,
            } => {
                self.api
                    .add_document_url(&product_id, url, doc_type.as_ref(), label.as_deref())
                    .await
            }
        };
        self.finish_start(&request, result)
    }

    /// Check the draft and mark the manager busy.
    pub fn begin_start(&mut self) -> Result<IngestRequest, CoreError> {
        if self.in_flight {
            return Err(CoreError::InFlight);
        }

        let request = match &self.draft {
            IngestionDraft::File {
                file,
                doc_type,
                label,
            } => {
                let Some(file) = file else {
                    self.notifier.error("Please select a file to upload.");
                    return Err(CoreError::MissingInput(
                        "Please select a file to upload.".into(),
                    ));
                };
                IngestRequest::File {
                    file: file.clone(),
                    doc_type: *doc_type,
                    label: normalize_label(label),
                }
            }
            IngestionDraft::Url {
                url,
                doc_type,
                label,
            } => {
                if url.trim().is_empty() {
                    self.notifier.error("URL and Document Type are required.");
                    return Err(CoreError::MissingInput(
                        "URL and Document Type are required.".into(),
                    ));
                }
                validate_document_url(url).inspect_err(|e| {
                    self.notifier.error(e.to_string());
                })?;
                IngestRequest::Url {
                    url: url.trim().to_owned(),
                    doc_type: *doc_type,
                    label: normalize_label(label),
                }
            }
        };

        self.in_flight = true;
        Ok(request)
    }

    pub fn finish_start(
        &mut self,
        request: &IngestRequest,
        result: Result<Option<DocumentResponse>, prodman_api::Error>,
    ) -> Result<Option<Document>, CoreError> {
        self.in_flight = false;
        match result {
            Ok(created) => {
                let created = created.map(Document::from);
                info!(product = %self.product_id, doc = ?created.as_ref().map(|d| &d.id), "document ingested");
                self.notifier.success(request.success_message());
                self.draft.reset_transient();
                self.signal_complete();
                Ok(created)
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.notifier.error(request.failure_message(&err));
                Err(err)
            }
        }
    }

    // ── Deletion ─────────────────────────────────────────────────────

    /// Delete one document. The local list is never spliced; the completion
    /// signal drives a fresh detail fetch instead.
    pub async fn remove_document(&mut self, doc_id: &EntityId) -> Result<(), CoreError> {
        match self.api.delete_document(&ResourceId::from(doc_id)).await {
            Ok(resp) => {
                let message = resp
                    .and_then(|r| r.message)
                    .unwrap_or_else(|| format!("Document {doc_id} deleted successfully"));
                self.notifier.success(message);
                self.signal_complete();
                Ok(())
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.notifier
                    .error(err.notice_text(&format!("Failed to delete document {doc_id}")));
                Err(err)
            }
        }
    }

    fn signal_complete(&self) {
        let signal = CompletionSignal::DocumentsChanged {
            product_id: self.product_id.clone(),
        };
        if self.signals.send(signal).is_err() {
            debug!(product = %self.product_id, "completion signal receiver dropped");
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn switching_mode_keeps_type_and_label() {
        let mut draft = IngestionDraft::File {
            file: Some(SelectedFile::new("a.pdf", &b"%PDF"[..])),
            doc_type: DocumentType::Pdf,
            label: "Spec".into(),
        };
        draft.switch_to(IngestMode::Url);
        assert_eq!(
            draft,
            IngestionDraft::Url {
                url: String::new(),
                doc_type: DocumentType::Pdf,
                label: "Spec".into(),
            }
        );
        draft.switch_to(IngestMode::File);
        assert!(!draft.has_required_input());
        assert_eq!(draft.label(), "Spec");
    }

    #[test]
    fn reset_keeps_type() {
        let mut draft = IngestionDraft::Url {
            url: "https://x/doc.pdf".into(),
            doc_type: DocumentType::Excel,
            label: "L".into(),
        };
        draft.reset_transient();
        assert_eq!(draft.doc_type(), DocumentType::Excel);
        assert_eq!(draft.label(), "");
        assert!(!draft.has_required_input());
    }

    #[test]
    fn default_draft_is_file_mode_image() {
        let draft = IngestionDraft::default();
        assert_eq!(draft.mode(), IngestMode::File);
        assert_eq!(draft.doc_type(), DocumentType::Image);
    }

    #[test]
    fn blank_label_is_absent() {
        assert_eq!(normalize_label("   "), None);
        assert_eq!(normalize_label(" Spec "), Some("Spec".into()));
    }

    #[test]
    fn excel_success_mentions_background_processing() {
        let excel = IngestRequest::File {
            file: SelectedFile::new("compat_list.xlsx", Bytes::new()),
            doc_type: DocumentType::Excel,
            label: None,
        };
        let pdf = IngestRequest::File {
            file: SelectedFile::new("spec.pdf", Bytes::new()),
            doc_type: DocumentType::Pdf,
            label: None,
        };
        assert!(excel.success_message().contains("background"));
        assert_eq!(pdf.success_message(), "spec.pdf file uploaded successfully.");
    }

    #[tokio::test]
    async fn from_path_reads_name_and_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("specsheet.pdf");
        std::fs::write(&path, b"%PDF-1.7").unwrap();

        let file = SelectedFile::from_path(&path).await.unwrap();
        assert_eq!(file.name, "specsheet.pdf");
        assert_eq!(&file.bytes[..], b"%PDF-1.7");
    }
}
