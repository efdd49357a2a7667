// prodman-api: Async Rust client for the product catalog REST backend

pub mod client;
pub mod error;
pub mod transport;
pub mod types;

pub use client::ApiClient;
pub use error::{Error, Operation};
pub use transport::{TlsMode, TransportConfig};
pub use types::{
    AddUrlBody, DocumentResponse, FileUpload, MessageResponse, ProductResponse, ProductWrite,
    ResourceId,
};
