// ── Product domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::document::Document;
use super::entity_id::EntityId;

/// A catalog product.
///
/// `documents` is only authoritative on a record returned by a detail fetch;
/// list records may carry a stale or empty placeholder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    /// `None` until the backend has persisted it.
    pub id: Option<EntityId>,
    pub name: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub description: Option<String>,
    #[serde(default)]
    pub documents: Vec<Document>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn document_count(&self) -> usize {
        self.documents.len()
    }

    /// Writable subset, used to seed an edit form.
    pub fn fields(&self) -> ProductFields {
        ProductFields {
            name: self.name.clone(),
            reference: self.reference.clone(),
            description: self.description.clone(),
        }
    }

    /// Whether a catalog row built from `self` would render differently
    /// from one built from `other` (name, ref, description, document count).
    pub fn list_view_differs(&self, other: &Product) -> bool {
        self.name != other.name
            || self.reference != other.reference
            || self.description != other.description
            || self.document_count() != other.document_count()
    }
}

/// Validated writable fields sent on create and update. Never carries an id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductFields {
    pub name: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub description: Option<String>,
}

impl From<ProductFields> for prodman_api::ProductWrite {
    fn from(f: ProductFields) -> Self {
        Self {
            name: f.name,
            reference: f.reference,
            description: f.description,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DocumentSource, DocumentType};

    fn product(docs: usize) -> Product {
        Product {
            id: Some(EntityId::Int(1)),
            name: "Laptop Pro X".into(),
            reference: "LPX-001".into(),
            description: Some("High performance laptop for professionals.".into()),
            documents: (0..docs)
                .map(|i| Document {
                    id: EntityId::Int(100 + i64::try_from(i).unwrap_or_default()),
                    product_id: None,
                    doc_type: DocumentType::Pdf,
                    source: DocumentSource::classify("media/x.pdf"),
                    label: None,
                    uploaded_at: None,
                })
                .collect(),
            created_at: None,
            updated_at: None,
        }
    }

    #[test]
    fn document_count_change_is_list_visible() {
        assert!(product(1).list_view_differs(&product(2)));
        assert!(!product(2).list_view_differs(&product(2)));
    }

    #[test]
    fn timestamps_are_not_list_visible() {
        let mut newer = product(0);
        newer.updated_at = Some(Utc::now());
        assert!(!product(0).list_view_differs(&newer));
    }
}
