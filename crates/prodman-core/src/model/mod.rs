// ── Domain model ──

pub mod document;
pub mod entity_id;
pub mod product;

pub use document::{Document, DocumentSource, DocumentType, Preview};
pub use entity_id::EntityId;
pub use product::{Product, ProductFields};
