// ── Document domain types ──

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use super::entity_id::EntityId;

/// Operator-declared document kind. Never inferred from content.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum DocumentType {
    #[default]
    Image,
    Pdf,
    Excel,
    #[serde(other)]
    Other,
}

/// How a document is presented in a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preview {
    /// Render the resolved source inline as an image.
    Thumbnail,
    /// Show a type tag only.
    Tag,
}

impl DocumentType {
    /// Presentation decision for this type. Adding a variant forces a
    /// decision here.
    pub fn preview(self) -> Preview {
        match self {
            Self::Image => Preview::Thumbnail,
            Self::Pdf | Self::Excel | Self::Other => Preview::Tag,
        }
    }

    /// Spreadsheets are post-processed by the backend after upload.
    pub fn is_processed_async(self) -> bool {
        matches!(self, Self::Excel)
    }
}

// ── DocumentSource ──────────────────────────────────────────────────

/// Where a document's content lives, classified from the wire `path_or_url`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum DocumentSource {
    /// Relative to the media origin (e.g. `media/product_1/pdf/spec.pdf`).
    StoragePath(String),
    /// Absolute `http://` or `https://` URL.
    ExternalUrl(String),
    /// Embedded `data:image...` URI.
    DataUri(String),
}

impl DocumentSource {
    pub fn classify(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        if raw.starts_with("http://") || raw.starts_with("https://") {
            Self::ExternalUrl(raw)
        } else if raw.starts_with("data:image") {
            Self::DataUri(raw)
        } else {
            Self::StoragePath(raw)
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::StoragePath(s) | Self::ExternalUrl(s) | Self::DataUri(s) => s,
        }
    }

    /// Fetchable URL for this source. Pure string transform: external URLs
    /// and data URIs pass through, storage paths are joined onto `origin`
    /// after stripping one leading slash.
    pub fn resolve(&self, origin: &str) -> String {
        match self {
            Self::ExternalUrl(s) | Self::DataUri(s) => s.clone(),
            Self::StoragePath(path) => {
                let path = path.strip_prefix('/').unwrap_or(path);
                if origin.ends_with('/') {
                    format!("{origin}{path}")
                } else {
                    format!("{origin}/{path}")
                }
            }
        }
    }

    /// Last path segment, used as a fallback label. `None` for data URIs and
    /// sources ending in `/`.
    pub fn file_name(&self) -> Option<&str> {
        match self {
            Self::DataUri(_) => None,
            Self::StoragePath(s) | Self::ExternalUrl(s) => {
                s.rsplit('/').next().filter(|tail| !tail.is_empty())
            }
        }
    }
}

impl From<String> for DocumentSource {
    fn from(raw: String) -> Self {
        Self::classify(raw)
    }
}

impl From<DocumentSource> for String {
    fn from(source: DocumentSource) -> Self {
        match source {
            DocumentSource::StoragePath(s)
            | DocumentSource::ExternalUrl(s)
            | DocumentSource::DataUri(s) => s,
        }
    }
}

// ── Document ────────────────────────────────────────────────────────

/// A document attached to exactly one product. Never mutated locally.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Document {
    pub id: EntityId,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub product_id: Option<EntityId>,
    #[serde(rename = "type")]
    pub doc_type: DocumentType,
    #[serde(rename = "path_or_url")]
    pub source: DocumentSource,
    #[serde(default)]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uploaded_at: Option<DateTime<Utc>>,
}

impl Document {
    /// Label when non-blank, else the source's tail, else `"N/A"`.
    pub fn display_label(&self) -> &str {
        self.label
            .as_deref()
            .filter(|l| !l.trim().is_empty())
            .or_else(|| self.source.file_name())
            .unwrap_or("N/A")
    }

    pub fn resolved_url(&self, origin: &str) -> String {
        self.source.resolve(origin)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use std::str::FromStr;

    const ORIGIN: &str = "http://localhost:8000";

    fn doc(source: &str, label: Option<&str>) -> Document {
        Document {
            id: EntityId::Int(101),
            product_id: None,
            doc_type: DocumentType::Pdf,
            source: DocumentSource::classify(source),
            label: label.map(str::to_owned),
            uploaded_at: None,
        }
    }

    #[test]
    fn absolute_sources_pass_through() {
        for raw in [
            "http://example.com/a.pdf",
            "https://via.placeholder.com/150?Text=X",
            "data:image/png;base64,iVBORw0KGgo=",
        ] {
            assert_eq!(DocumentSource::classify(raw).resolve(ORIGIN), raw);
        }
    }

    #[test]
    fn storage_paths_join_origin() {
        let src = DocumentSource::classify("media/product_1/pdf/specsheet.pdf");
        assert!(matches!(src, DocumentSource::StoragePath(_)));
        assert_eq!(
            src.resolve(ORIGIN),
            "http://localhost:8000/media/product_1/pdf/specsheet.pdf"
        );
    }

    #[test]
    fn only_one_leading_slash_is_stripped() {
        assert_eq!(
            DocumentSource::classify("/media/x.png").resolve("http://h/"),
            "http://h/media/x.png"
        );
        assert_eq!(
            DocumentSource::classify("//media/x.png").resolve("http://h/"),
            "http://h//media/x.png"
        );
    }

    #[test]
    fn non_image_data_uri_is_a_storage_path() {
        let src = DocumentSource::classify("data:text/plain,hello");
        assert!(matches!(src, DocumentSource::StoragePath(_)));
    }

    #[test]
    fn display_label_falls_back_to_tail_then_na() {
        assert_eq!(doc("media/a/b/spec.pdf", Some("Spec")).display_label(), "Spec");
        assert_eq!(doc("media/a/b/spec.pdf", Some("  ")).display_label(), "spec.pdf");
        assert_eq!(doc("", None).display_label(), "N/A");
        assert_eq!(doc("data:image/png;base64,AAAA", None).display_label(), "N/A");
    }

    #[test]
    fn only_images_get_thumbnails() {
        assert_eq!(DocumentType::Image.preview(), Preview::Thumbnail);
        assert_eq!(DocumentType::Excel.preview(), Preview::Tag);
        assert_eq!(DocumentType::Other.preview(), Preview::Tag);
    }

    #[test]
    fn document_type_parses_case_insensitively() {
        assert_eq!(DocumentType::from_str("EXCEL").unwrap(), DocumentType::Excel);
        assert_eq!(DocumentType::Pdf.to_string(), "pdf");
        assert!(DocumentType::from_str("video").is_err());
    }

    #[test]
    fn document_serializes_wire_names() {
        let json = serde_json::to_value(doc("media/x.pdf", None)).unwrap();
        assert_eq!(json["type"], "pdf");
        assert_eq!(json["path_or_url"], "media/x.pdf");
    }
}
