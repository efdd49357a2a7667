// ── Product catalog ──
//
// Root controller. Owns the product list and search term, the create/edit
// form, the detail view, and the attachment manager for the open product.
// Every mutation re-fetches authoritative state instead of patching the
// local list.

use tracing::{debug, info, warn};

use prodman_api::{ApiClient, ProductResponse, ResourceId};

use super::attachments::{AttachmentManager, SelectedFile};
use super::detail::DetailController;
use super::{FetchOutcome, RequestTicket, Sequencer};
use crate::config::BackendConfig;
use crate::error::CoreError;
use crate::model::{Document, EntityId, Product};
use crate::notice::Notifier;
use crate::signal::{self, CompletionSignal, SignalReceiver, SignalSender};
use crate::validate::{ProductForm, ValidationErrors, validate_import_file_name};

// ── Form state ──────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit(EntityId),
}

/// The open create/edit form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFormState {
    pub mode: FormMode,
    pub values: ProductForm,
    /// Inline errors from the last rejected submission.
    pub errors: ValidationErrors,
}

/// Proof that a delete was requested. Pass it to
/// [`CatalogController::confirm_remove`] to proceed; drop it to cancel.
#[derive(Debug)]
#[must_use = "dropping a PendingRemoval cancels the delete"]
pub struct PendingRemoval {
    id: EntityId,
}

impl PendingRemoval {
    pub fn id(&self) -> &EntityId {
        &self.id
    }

    pub fn prompt(&self) -> String {
        format!(
            "Are you sure you want to delete product {}? This action cannot be undone.",
            self.id
        )
    }
}

// ── Controller ──────────────────────────────────────────────────────

#[derive(Debug)]
pub struct CatalogController {
    api: ApiClient,
    notifier: Notifier,
    media_origin: String,
    products: Vec<Product>,
    loading: bool,
    search_term: String,
    seq: Sequencer,
    form: Option<ProductFormState>,
    detail: DetailController,
    attachments: Option<AttachmentManager>,
    signals_tx: SignalSender,
    signals_rx: SignalReceiver,
}

impl CatalogController {
    /// Build a controller (and its HTTP client) from backend settings.
    pub fn new(config: &BackendConfig, notifier: Notifier) -> Result<Self, CoreError> {
        let api = ApiClient::new(&config.api_url, &config.transport())?;
        Ok(Self::with_client(api, notifier, config.media_origin()))
    }

    pub fn with_client(api: ApiClient, notifier: Notifier, media_origin: String) -> Self {
        let (signals_tx, signals_rx) = signal::channel();
        Self {
            detail: DetailController::new(api.clone(), notifier.clone()),
            api,
            notifier,
            media_origin,
            products: Vec::new(),
            loading: false,
            search_term: String::new(),
            seq: Sequencer::default(),
            form: None,
            attachments: None,
            signals_tx,
            signals_rx,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn api(&self) -> &ApiClient {
        &self.api
    }

    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn search_term(&self) -> &str {
        &self.search_term
    }

    pub fn media_origin(&self) -> &str {
        &self.media_origin
    }

    pub fn detail(&self) -> &DetailController {
        &self.detail
    }

    pub fn detail_mut(&mut self) -> &mut DetailController {
        &mut self.detail
    }

    pub fn form(&self) -> Option<&ProductFormState> {
        self.form.as_ref()
    }

    pub fn form_mut(&mut self) -> Option<&mut ProductFormState> {
        self.form.as_mut()
    }

    pub fn attachments(&self) -> Option<&AttachmentManager> {
        self.attachments.as_ref()
    }

    pub fn attachments_mut(&mut self) -> Option<&mut AttachmentManager> {
        self.attachments.as_mut()
    }

    // ── Listing ──────────────────────────────────────────────────────

    /// Initial load: the full catalog with an empty search term.
    pub async fn start(&mut self) -> Result<FetchOutcome, CoreError> {
        self.search(String::new()).await
    }

    /// Reload with the current search term.
    pub async fn refresh(&mut self) -> Result<FetchOutcome, CoreError> {
        let term = self.search_term.clone();
        self.search(term).await
    }

    /// Reload with a new search term. Filtering is server-side; an empty
    /// term resets to the full catalog.
    pub async fn search(&mut self, term: impl Into<String>) -> Result<FetchOutcome, CoreError> {
        let ticket = self.begin_refresh(term);
        let result = self.api.list_products(&self.search_term).await;
        self.finish_refresh(ticket, result)
    }

    pub fn begin_refresh(&mut self, term: impl Into<String>) -> RequestTicket {
        self.loading = true;
        self.search_term = term.into();
        self.seq.issue()
    }

    /// Replace the list on success. On failure the previous list stays.
    pub fn finish_refresh(
        &mut self,
        ticket: RequestTicket,
        result: Result<Vec<ProductResponse>, prodman_api::Error>,
    ) -> Result<FetchOutcome, CoreError> {
        if !self.seq.is_latest(ticket, "product list") {
            return Ok(FetchOutcome::Stale);
        }
        self.loading = false;
        match result {
            Ok(products) => {
                self.products = products.into_iter().map(Product::from).collect();
                debug!(
                    count = self.products.len(),
                    term = %self.search_term,
                    "catalog refreshed"
                );
                Ok(FetchOutcome::Applied)
            }
            Err(e) => {
                let err = CoreError::from(e);
                self.notifier.error(err.notice_text("Failed to load products"));
                Err(err)
            }
        }
    }

    // ── Selection ────────────────────────────────────────────────────

    pub async fn select(&mut self, id: &EntityId) -> Result<FetchOutcome, CoreError> {
        self.detail.select(id).await
    }

    // ── Create / edit form ───────────────────────────────────────────

    /// Open the form in create mode with no seed data.
    pub fn add(&mut self) {
        self.form = Some(ProductFormState {
            mode: FormMode::Create,
            values: ProductForm::default(),
            errors: ValidationErrors::default(),
        });
    }

    /// Open the form in edit mode, seeded with `product`.
    pub fn edit(&mut self, product: &Product) {
        self.form = Some(ProductFormState {
            mode: product.id.clone().map_or(FormMode::Create, FormMode::Edit),
            values: ProductForm::from(product.fields()),
            errors: ValidationErrors::default(),
        });
    }

    pub fn cancel_form(&mut self) {
        self.form = None;
    }

    /// Persist the form: update when editing an existing product, create
    /// otherwise.
    ///
    /// On success the form closes, the catalog reloads with the term active
    /// before submission, and the detail view is re-fetched if it shows the
    /// edited product. On failure the form stays open with `values`.
    pub async fn submit_form(&mut self, values: ProductForm) -> Result<Option<Product>, CoreError> {
        let mode = self
            .form
            .as_ref()
            .map_or(FormMode::Create, |f| f.mode.clone());

        let fields = match values.validate() {
            Ok(fields) => fields,
            Err(errors) => {
                debug!(%errors, "product form rejected");
                self.form = Some(ProductFormState {
                    mode,
                    values,
                    errors: errors.clone(),
                });
                return Err(CoreError::ValidationRejected(errors));
            }
        };

        let body = fields.into();
        let result = match &mode {
            FormMode::Edit(id) => self.api.update_product(&ResourceId::from(id), &body).await,
            FormMode::Create => self.api.create_product(&body).await,
        };

        let saved = match result {
            Ok(saved) => saved.map(Product::from),
            Err(e) => {
                let err = CoreError::from(e);
                self.notifier.error(err.notice_text("Failed to save product"));
                self.form = Some(ProductFormState {
                    mode,
                    values,
                    errors: ValidationErrors::default(),
                });
                return Err(err);
            }
        };

        match &mode {
            FormMode::Edit(id) => {
                info!(%id, "product updated");
                self.notifier.success("Product updated successfully!");
            }
            FormMode::Create => {
                info!(id = ?saved.as_ref().and_then(|p| p.id.as_ref()), "product created");
                self.notifier.success("Product created successfully!");
            }
        }
        self.form = None;

        self.refresh_after_mutation().await;
        if let FormMode::Edit(id) = &mode {
            if self.detail.open_id() == Some(id) {
                if let Err(e) = self.detail.select(id).await {
                    debug!(error = %e, "detail refresh after edit failed");
                }
            }
        }
        Ok(saved)
    }

    // ── Deletion ─────────────────────────────────────────────────────

    /// First step of a delete: nothing is sent until the returned value is
    /// confirmed.
    pub fn request_remove(&self, id: EntityId) -> PendingRemoval {
        debug!(%id, listed = self.row(&id).is_some(), "delete requested");
        PendingRemoval { id }
    }

    /// Delete a confirmed product. On failure nothing local changes.
    pub async fn confirm_remove(&mut self, pending: PendingRemoval) -> Result<(), CoreError> {
        let id = pending.id;
        if let Err(e) = self.api.delete_product(&ResourceId::from(&id)).await {
            let err = CoreError::from(e);
            self.notifier.error(err.notice_text("Failed to delete product"));
            return Err(err);
        }

        info!(%id, "product deleted");
        self.notifier.success(format!("Product {id} deleted."));
        self.refresh_after_mutation().await;

        if self.detail.open_id() == Some(&id) {
            self.detail.close();
        }
        if self.attachments.as_ref().is_some_and(|m| m.product_id() == &id) {
            self.attachments = None;
        }
        Ok(())
    }

    // ── Attachments ──────────────────────────────────────────────────

    /// Open the attachment manager for the product in the detail view.
    pub fn open_attachments(&mut self) -> Result<&mut AttachmentManager, CoreError> {
        let Some(id) = self.detail.open_id().cloned() else {
            return Err(CoreError::MissingInput(
                "Select a product before managing its documents.".into(),
            ));
        };
        let manager = AttachmentManager::new(
            self.api.clone(),
            self.notifier.clone(),
            self.signals_tx.clone(),
            id,
        );
        Ok(self.attachments.insert(manager))
    }

    pub fn close_attachments(&mut self) {
        self.attachments = None;
    }

    /// Drain completion signals: re-fetch the affected product's detail and
    /// re-sync the catalog when a list-visible field changed. Returns how
    /// many signals were handled.
    pub async fn process_signals(&mut self) -> usize {
        let mut handled = 0;
        while let Ok(signal) = self.signals_rx.try_recv() {
            handled += 1;
            match signal {
                CompletionSignal::DocumentsChanged { product_id } => {
                    self.on_documents_changed(&product_id).await;
                }
            }
        }
        handled
    }

    async fn on_documents_changed(&mut self, product_id: &EntityId) {
        self.notifier
            .success("Document operation successful. Refreshing details...");
        if self.detail.select(product_id).await.is_err() {
            return;
        }

        let stale_row = match (self.detail.product(), self.row(product_id)) {
            (Some(fresh), Some(row)) => row.list_view_differs(fresh),
            _ => false,
        };
        if stale_row {
            debug!(%product_id, "list-visible fields changed, re-syncing catalog");
            self.refresh_after_mutation().await;
        }
    }

    fn row(&self, id: &EntityId) -> Option<&Product> {
        self.products.iter().find(|p| p.id.as_ref() == Some(id))
    }

    // ── Read-only lookups ────────────────────────────────────────────

    /// A product's documents straight from the backend. No state changes.
    pub async fn documents(&self, product_id: &EntityId) -> Result<Vec<Document>, CoreError> {
        match self.api.list_documents(&ResourceId::from(product_id)).await {
            Ok(docs) => Ok(docs.into_iter().map(Document::from).collect()),
            Err(e) => {
                let err = CoreError::from(e);
                self.notifier.error(
                    err.notice_text(&format!("Failed to load documents for product {product_id}")),
                );
                Err(err)
            }
        }
    }

    pub async fn document(&self, doc_id: &EntityId) -> Result<Document, CoreError> {
        let err = match self.api.get_document(&ResourceId::from(doc_id)).await {
            Ok(Some(doc)) => return Ok(Document::from(doc)),
            Ok(None) => CoreError::NotFound {
                entity: "Document",
                id: doc_id.to_string(),
            },
            Err(e) => CoreError::from(e),
        };
        self.notifier
            .error(err.notice_text(&format!("Could not load document {doc_id}")));
        Err(err)
    }

    /// Probe the backend root. Returns its welcome message, if any.
    pub async fn ping(&self) -> Result<Option<String>, CoreError> {
        Ok(self.api.welcome().await?.and_then(|m| m.message))
    }

    // ── Import ───────────────────────────────────────────────────────

    /// Hand a spreadsheet to the backend importer. The import finishes in
    /// the background, so the reload that follows may not show it yet.
    pub async fn import_products(&mut self, file: &SelectedFile) -> Result<String, CoreError> {
        validate_import_file_name(&file.name).inspect_err(|e| {
            self.notifier.error(e.to_string());
        })?;

        let message = match self.api.import_products_file(file.to_upload()).await {
            Ok(resp) => resp.and_then(|r| r.message).unwrap_or_else(|| {
                format!(
                    "File '{}' received. Products import is processing in the background.",
                    file.name
                )
            }),
            Err(e) => {
                let err = CoreError::from(e);
                self.notifier
                    .error(err.notice_text(&format!("Failed to import {}", file.name)));
                return Err(err);
            }
        };

        self.notifier.info(message.clone());
        self.refresh_after_mutation().await;
        Ok(message)
    }

    /// Reload with the current term. Failures were already surfaced.
    async fn refresh_after_mutation(&mut self) {
        if let Err(e) = self.refresh().await {
            warn!(error = %e, "catalog refresh after mutation failed");
        }
    }
}
