//! Product command handlers.

use tabled::Tabled;

use prodman_core::{EntityId, Product, ProductForm, SelectedFile};

use super::Session;
use super::documents::document_table;
use super::util;
use crate::cli::{ProductsArgs, ProductsCommand};
use crate::error::CliError;
use crate::output;

// ── Table row ───────────────────────────────────────────────────────

#[derive(Tabled)]
struct ProductRow {
    #[tabled(rename = "ID")]
    id: String,
    #[tabled(rename = "Name")]
    name: String,
    #[tabled(rename = "Ref")]
    reference: String,
    #[tabled(rename = "Description")]
    description: String,
}

fn product_row(p: &Product) -> ProductRow {
    ProductRow {
        id: util::product_id(p),
        name: p.name.clone(),
        reference: p.reference.clone(),
        description: output::truncate(p.description.as_deref().unwrap_or(""), 48),
    }
}

fn detail(p: &Product, media_origin: &str) -> String {
    let mut lines = vec![
        format!("ID:          {}", util::product_id(p)),
        format!("Name:        {}", p.name),
        format!("Reference:   {}", p.reference),
        format!("Description: {}", p.description.as_deref().unwrap_or("-")),
    ];
    if let Some(created) = p.created_at {
        lines.push(format!("Created:     {}", created.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    if let Some(updated) = p.updated_at {
        lines.push(format!("Updated:     {}", updated.format("%Y-%m-%d %H:%M:%S UTC")));
    }
    lines.push(format!("Documents:   {}", p.document_count()));
    if !p.documents.is_empty() {
        lines.push(document_table(&p.documents, media_origin));
    }
    lines.join("\n")
}

// ── Handler ─────────────────────────────────────────────────────────

pub async fn handle(session: &mut Session<'_>, args: ProductsArgs) -> Result<String, CliError> {
    let global = session.global;

    match args.command {
        ProductsCommand::List { search } => {
            session.catalog.search(search.unwrap_or_default()).await?;
            Ok(output::render_list(
                &global.output,
                session.catalog.products(),
                product_row,
                util::product_id,
            ))
        }

        ProductsCommand::Get { id } => {
            let product = fetch_detail(session, &EntityId::from(id)).await?;
            Ok(render_product(session, &product))
        }

        ProductsCommand::Create {
            name,
            reference,
            description,
        } => {
            session.catalog.add();
            let saved = session
                .catalog
                .submit_form(ProductForm {
                    name,
                    reference,
                    description: description.unwrap_or_default(),
                })
                .await?;
            Ok(saved.map_or_else(String::new, |p| render_product(session, &p)))
        }

        ProductsCommand::Update {
            id,
            name,
            reference,
            description,
        } => {
            if name.is_none() && reference.is_none() && description.is_none() {
                return Err(CliError::Validation {
                    field: "update".into(),
                    reason: "nothing to change; pass --name, --ref or --description".into(),
                });
            }
            let id = EntityId::from(id);

            // Seed the form from the authoritative record, then overlay flags.
            let current = fetch_detail(session, &id).await?;
            session.catalog.edit(&current);
            let mut values = ProductForm::from(current.fields());
            if let Some(name) = name {
                values.name = name;
            }
            if let Some(reference) = reference {
                values.reference = reference;
            }
            if let Some(description) = description {
                values.description = description;
            }

            let saved = session.catalog.submit_form(values).await?;
            let refreshed = session
                .catalog
                .detail()
                .product()
                .filter(|p| p.id.as_ref() == Some(&id))
                .cloned()
                .or(saved);
            Ok(refreshed.map_or_else(String::new, |p| render_product(session, &p)))
        }

        ProductsCommand::Delete { id } => {
            let pending = session.catalog.request_remove(EntityId::from(id));
            if !util::confirm(&pending.prompt(), global.yes, "products delete")? {
                // Dropping the pending removal cancels it.
                if !global.quiet {
                    eprintln!("Aborted.");
                }
                return Ok(String::new());
            }
            session.catalog.confirm_remove(pending).await?;
            Ok(String::new())
        }

        ProductsCommand::Import { file } => {
            let selected = SelectedFile::from_path(&file).await?;
            session.catalog.import_products(&selected).await?;
            Ok(String::new())
        }
    }
}

/// Select `id` in the detail view and return the loaded product.
async fn fetch_detail(session: &mut Session<'_>, id: &EntityId) -> Result<Product, CliError> {
    session.catalog.select(id).await?;
    session
        .catalog
        .detail()
        .product()
        .cloned()
        .ok_or_else(|| util::product_not_found(id))
}

fn render_product(session: &Session<'_>, product: &Product) -> String {
    let origin = session.catalog.media_origin();
    output::render_single(
        &session.global.output,
        product,
        |p| detail(p, origin),
        util::product_id,
    )
}
