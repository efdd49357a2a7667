// Wire types for the catalog backend.
//
// These mirror the JSON shapes the backend produces and accepts. They stay
// deliberately loose (string document types, string timestamps) so a
// surprising payload never fails a whole response; `prodman-core` converts
// them into the canonical domain model.

use std::fmt;

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Identifier as the backend emits it: an integer primary key or a string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Int(i64),
    Str(String),
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Str(s) => write!(f, "{s}"),
        }
    }
}

impl From<i64> for ResourceId {
    fn from(n: i64) -> Self {
        Self::Int(n)
    }
}

impl From<&str> for ResourceId {
    fn from(s: &str) -> Self {
        s.parse::<i64>()
            .map_or_else(|_| Self::Str(s.to_owned()), Self::Int)
    }
}

/// A product record. `documents` is only authoritative on detail fetches.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductResponse {
    pub id: ResourceId,
    pub name: String,
    #[serde(rename = "ref", default)]
    pub reference: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub documents: Vec<DocumentResponse>,
    #[serde(default)]
    pub created_at: Option<String>,
    #[serde(default)]
    pub updated_at: Option<String>,
}

/// A document attached to a product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DocumentResponse {
    pub id: ResourceId,
    #[serde(default)]
    pub product_id: Option<ResourceId>,
    #[serde(rename = "type")]
    pub doc_type: String,
    pub path_or_url: String,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default)]
    pub uploaded_at: Option<String>,
}

/// Writable product fields for create (POST) and update (PUT).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProductWrite {
    pub name: String,
    #[serde(rename = "ref")]
    pub reference: String,
    pub description: Option<String>,
}

/// JSON body for registering a remote document URL.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AddUrlBody<'a> {
    pub url: &'a str,
    pub doc_type: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'a str>,
}

/// Informational response (`{"message": "..."}`) from delete and import calls.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// File content for a multipart upload.
#[derive(Debug, Clone)]
pub struct FileUpload {
    pub file_name: String,
    pub bytes: Bytes,
    pub mime: Option<String>,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn product_decodes_ref_and_missing_documents() {
        let p: ProductResponse = serde_json::from_value(serde_json::json!({
            "id": 2,
            "name": "Eco Smartphone Y",
            "ref": "ESY-002",
            "description": null
        }))
        .unwrap();
        assert_eq!(p.id, ResourceId::Int(2));
        assert_eq!(p.reference.as_deref(), Some("ESY-002"));
        assert!(p.documents.is_empty());
    }

    #[test]
    fn add_url_body_omits_absent_label() {
        let body = AddUrlBody {
            url: "https://x/doc.pdf",
            doc_type: "pdf",
            label: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(
            json,
            serde_json::json!({ "url": "https://x/doc.pdf", "doc_type": "pdf" })
        );
    }

    #[test]
    fn resource_id_from_str_prefers_integer() {
        assert_eq!(ResourceId::from("501"), ResourceId::Int(501));
        assert_eq!(ResourceId::from("abc"), ResourceId::Str("abc".into()));
    }
}
