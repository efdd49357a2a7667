// ── API-to-domain type conversions ──
//
// Bridges loose `prodman_api` wire types into the canonical model: string
// document types become the closed `DocumentType`, ISO timestamps become
// `DateTime<Utc>`, and `path_or_url` is classified into a `DocumentSource`.

use std::str::FromStr;

use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::warn;

use prodman_api::{DocumentResponse, ProductResponse, ResourceId};

use crate::model::{Document, DocumentSource, DocumentType, EntityId, Product};

// ── Helpers ────────────────────────────────────────────────────────

/// Parse an ISO-8601 timestamp. Offset-less values are taken as UTC.
fn parse_datetime(raw: Option<&str>) -> Option<DateTime<Utc>> {
    let raw = raw?;
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .or_else(|_| NaiveDateTime::from_str(raw).map(|naive| naive.and_utc()))
        .ok()
}

fn parse_doc_type(raw: &str) -> DocumentType {
    DocumentType::from_str(raw).unwrap_or_else(|_| {
        warn!(doc_type = raw, "unknown document type, treating as other");
        DocumentType::Other
    })
}

// ── Identifiers ────────────────────────────────────────────────────

impl From<ResourceId> for EntityId {
    fn from(id: ResourceId) -> Self {
        match id {
            ResourceId::Int(n) => Self::Int(n),
            ResourceId::Str(s) => Self::Str(s),
        }
    }
}

impl From<&EntityId> for ResourceId {
    fn from(id: &EntityId) -> Self {
        match id {
            EntityId::Int(n) => Self::Int(*n),
            EntityId::Str(s) => Self::Str(s.clone()),
        }
    }
}

// ── Documents ──────────────────────────────────────────────────────

impl From<DocumentResponse> for Document {
    fn from(d: DocumentResponse) -> Self {
        Self {
            id: d.id.into(),
            product_id: d.product_id.map(Into::into),
            doc_type: parse_doc_type(&d.doc_type),
            source: DocumentSource::classify(d.path_or_url),
            label: d.label,
            uploaded_at: parse_datetime(d.uploaded_at.as_deref()),
        }
    }
}

// ── Products ───────────────────────────────────────────────────────

impl From<ProductResponse> for Product {
    fn from(p: ProductResponse) -> Self {
        Self {
            id: Some(p.id.into()),
            name: p.name,
            reference: p.reference.unwrap_or_default(),
            description: p.description,
            documents: p.documents.into_iter().map(Document::from).collect(),
            created_at: parse_datetime(p.created_at.as_deref()),
            updated_at: parse_datetime(p.updated_at.as_deref()),
        }
    }
}
