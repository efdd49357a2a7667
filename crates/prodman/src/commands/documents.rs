//! Document command handlers.
//!
//! Uploads, URL additions and deletions go through the attachment manager of
//! the product opened in the detail view; the completion signal it raises is
//! processed before output so the printed list is the refreshed one.

use tabled::{Table, Tabled, settings::Style};

use prodman_core::{AttachmentManager, Document, DocumentType, EntityId, Preview, SelectedFile};

use super::Session;
use super::util;
use crate::cli::{DocTypeArg, DocumentsArgs, DocumentsCommand};
use crate::error::CliError;
use crate::output;

impl From<DocTypeArg> for DocumentType {
    fn from(arg: DocTypeArg) -> Self {
        match arg {
            DocTypeArg::Image => DocumentType::Image,
            DocTypeArg::Pdf => DocumentType::Pdf,
            DocTypeArg::Excel => DocumentType::Excel,
            DocTypeArg::Other => DocumentType::Other,
        }
    }
}

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct DocumentRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Type")]
    doc_type: String,
    #[tabled(rename = "Label")]
    label: String,
    #[tabled(rename = "Preview")]
    preview: &'static str,
    #[tabled(rename = "URL")]
    url: String,
}

fn document_row(doc: &Document, media_origin: &str) -> DocumentRow {
    DocumentRow {
        id: doc.id.to_string(),
        doc_type: doc.doc_type.to_string(),
        label: output::truncate(doc.display_label(), 40),
        preview: match doc.doc_type.preview() {
            Preview::Thumbnail => "thumbnail",
            Preview::Tag => "tag",
        },
        url: doc.resolved_url(media_origin),
    }
}

/// Rounded table of documents, shared with the product detail view.
pub(super) fn document_table(docs: &[Document], media_origin: &str) -> String {
    let rows: Vec<DocumentRow> = docs.iter().map(|d| document_row(d, media_origin)).collect();
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_documents(session: &Session<'_>, docs: &[Document]) -> String {
    let origin = session.catalog.media_origin();
    output::render_list(
        &session.global.output,
        docs,
        |d| document_row(d, origin),
        |d| d.resolved_url(origin),
    )
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &mut Session<'_>, args: DocumentsArgs) -> Result<String, CliError> {
    match args.command {
        DocumentsCommand::List { product_id } => {
            let docs = session
                .catalog
                .documents(&EntityId::from(product_id))
                .await?;
            Ok(render_documents(session, &docs))
        }

        DocumentsCommand::Upload {
            product_id,
            file,
            doc_type,
            label,
        } => {
            let selected = SelectedFile::from_path(&file).await?;
            let manager = open_manager(session, &EntityId::from(product_id)).await?;
            manager.select_file(selected);
            manager.set_doc_type(doc_type.into());
            if let Some(label) = label {
                manager.set_label(label);
            }
            manager.start().await?;
            finish(session).await
        }

        DocumentsCommand::AddUrl {
            product_id,
            url,
            doc_type,
            label,
        } => {
            let manager = open_manager(session, &EntityId::from(product_id)).await?;
            manager.set_url(url);
            manager.set_doc_type(doc_type.into());
            if let Some(label) = label {
                manager.set_label(label);
            }
            manager.start().await?;
            finish(session).await
        }

        DocumentsCommand::Delete { doc_id, product } => {
            let doc_id = EntityId::from(doc_id);
            let product_id = match product {
                Some(p) => EntityId::from(p),
                None => owning_product(session, &doc_id).await?,
            };

            let prompt = format!("Delete document {doc_id}? This action cannot be undone.");
            if !util::confirm(&prompt, session.global.yes, "documents delete")? {
                if !session.global.quiet {
                    eprintln!("Aborted.");
                }
                return Ok(String::new());
            }

            let manager = open_manager(session, &product_id).await?;
            manager.remove_document(&doc_id).await?;
            finish(session).await
        }
    }
}

/// Load `product_id` into the detail view and open its attachment manager.
async fn open_manager<'s>(
    session: &'s mut Session<'_>,
    product_id: &EntityId,
) -> Result<&'s mut AttachmentManager, CliError> {
    session.catalog.select(product_id).await?;
    if !session.catalog.detail().is_open() {
        return Err(util::product_not_found(product_id));
    }
    Ok(session.catalog.open_attachments()?)
}

/// Apply the completion signal, then print the product's fresh document list.
async fn finish(session: &mut Session<'_>) -> Result<String, CliError> {
    session.catalog.process_signals().await;
    let docs = session
        .catalog
        .detail()
        .product()
        .map(|p| p.documents.clone())
        .unwrap_or_default();
    Ok(render_documents(session, &docs))
}

async fn owning_product(session: &Session<'_>, doc_id: &EntityId) -> Result<EntityId, CliError> {
    let doc = session.catalog.document(doc_id).await?;
    doc.product_id.ok_or_else(|| CliError::Validation {
        field: "product".into(),
        reason: format!("document {doc_id} does not name its product; pass --product <ID>"),
    })
}
