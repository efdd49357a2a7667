// ── Client-side validation ──
//
// Field constraints checked before any request is issued. Every failing
// field is reported, each tagged with the field it belongs to, so a
// presentation can show the messages inline.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{Display, IntoStaticStr};
use url::Url;

use crate::model::ProductFields;

pub const NAME_MAX: usize = 100;
pub const REF_MAX: usize = 50;
pub const DESCRIPTION_MAX: usize = 500;

/// Input field a validation message belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "lowercase")]
pub enum Field {
    Name,
    #[strum(serialize = "ref")]
    Reference,
    Description,
    Url,
    File,
    DocType,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldError {
    pub field: Field,
    pub message: String,
}

/// One or more field errors. Never empty when returned as an `Err`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    pub fn single(field: Field, message: impl Into<String>) -> Self {
        Self(vec![FieldError {
            field,
            message: message.into(),
        }])
    }

    fn push(&mut self, field: Field, message: impl Into<String>) {
        self.0.push(FieldError {
            field,
            message: message.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.0.iter()
    }

    /// Messages for one field, in the order they were found.
    pub fn for_field(&self, field: Field) -> impl Iterator<Item = &str> {
        self.0
            .iter()
            .filter(move |e| e.field == field)
            .map(|e| e.message.as_str())
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, e) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{}: {}", e.field, e.message)?;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

// ── Product form ────────────────────────────────────────────────────

/// Raw operator input for creating or editing a product.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductForm {
    pub name: String,
    #[serde(rename = "ref")]
    pub reference: String,
    #[serde(default)]
    pub description: String,
}

impl ProductForm {
    /// Trim, check lengths, and produce the fields to send.
    ///
    /// Lengths count Unicode scalar values. A blank description is sent as
    /// absent.
    pub fn validate(&self) -> Result<ProductFields, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let name = self.name.trim();
        let reference = self.reference.trim();
        let description = self.description.trim();

        if name.is_empty() {
            errors.push(Field::Name, "Please enter product name");
        } else if name.chars().count() > NAME_MAX {
            errors.push(
                Field::Name,
                format!("Product name cannot exceed {NAME_MAX} characters"),
            );
        }

        if reference.is_empty() {
            errors.push(Field::Reference, "Please enter product reference");
        } else if reference.chars().count() > REF_MAX {
            errors.push(
                Field::Reference,
                format!("Reference cannot exceed {REF_MAX} characters"),
            );
        }

        if description.chars().count() > DESCRIPTION_MAX {
            errors.push(
                Field::Description,
                format!("Description cannot exceed {DESCRIPTION_MAX} characters"),
            );
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ProductFields {
            name: name.to_owned(),
            reference: reference.to_owned(),
            description: (!description.is_empty()).then(|| description.to_owned()),
        })
    }
}

impl From<ProductFields> for ProductForm {
    fn from(f: ProductFields) -> Self {
        Self {
            name: f.name,
            reference: f.reference,
            description: f.description.unwrap_or_default(),
        }
    }
}

// ── URLs ────────────────────────────────────────────────────────────

/// A document URL must be absolute `http` or `https`.
pub fn validate_document_url(raw: &str) -> Result<Url, ValidationErrors> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(ValidationErrors::single(
            Field::Url,
            "Please enter the document URL",
        ));
    }
    match Url::parse(raw) {
        Ok(url) if matches!(url.scheme(), "http" | "https") && url.has_host() => Ok(url),
        _ => Err(ValidationErrors::single(
            Field::Url,
            "Please enter a valid URL",
        )),
    }
}

/// Product import accepts spreadsheets only.
pub fn validate_import_file_name(name: &str) -> Result<(), ValidationErrors> {
    let lower = name.to_ascii_lowercase();
    if lower.ends_with(".xlsx") || lower.ends_with(".csv") {
        Ok(())
    } else {
        Err(ValidationErrors::single(
            Field::File,
            "Invalid file type. Only .xlsx or .csv allowed.",
        ))
    }
}
