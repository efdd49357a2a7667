// Async HTTP client for the product catalog backend.
//
// One method per backend resource action. Each call is a single attempt:
// no retries, no timeouts. Failures of any kind collapse into
// `Error::RequestFailed` with the server's `detail` when it sent one.

use reqwest::StatusCode;
use reqwest::multipart::{Form, Part};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::{Error, Operation};
use crate::transport::TransportConfig;
use crate::types::{
    AddUrlBody, DocumentResponse, FileUpload, MessageResponse, ProductResponse, ProductWrite,
    ResourceId,
};

// ── Error response shape ─────────────────────────────────────────────

/// Error bodies are `{"detail": "..."}`. Validation failures carry a list
/// instead of a string, which falls back to the generic message.
#[derive(serde::Deserialize)]
struct ErrorResponse {
    #[serde(default)]
    detail: Option<serde_json::Value>,
}

// ── Client ───────────────────────────────────────────────────────────

/// Async client for the catalog REST contract.
///
/// Cheap to clone: the underlying `reqwest::Client` is reference-counted.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
}

impl ApiClient {
    // ── Constructors ─────────────────────────────────────────────────

    /// Build a client for `base_url` (e.g. `http://localhost:8000`).
    pub fn new(base_url: &Url, transport: &TransportConfig) -> Result<Self, Error> {
        let http = transport.build_client()?;
        Ok(Self::with_client(http, base_url))
    }

    /// Wrap an existing `reqwest::Client`.
    pub fn with_client(http: reqwest::Client, base_url: &Url) -> Self {
        Self {
            http,
            base_url: normalize_base_url(base_url),
        }
    }

    /// The backend base URL, always ending in `/`.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    // ── URL builder ──────────────────────────────────────────────────

    /// Join a relative path (e.g. `"products/"`) onto the base URL.
    fn url(&self, path: &str) -> Result<Url, Error> {
        Ok(self.base_url.join(path)?)
    }

    // ── HTTP verbs ───────────────────────────────────────────────────

    async fn get<T: DeserializeOwned>(
        &self,
        op: Operation,
        path: &str,
        params: &[(&str, &str)],
    ) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!(%op, "GET {url} params={params:?}");

        let resp = self
            .http
            .get(url)
            .query(params)
            .send()
            .await
            .map_err(|e| Error::transport(op, e))?;
        handle_response(op, resp).await
    }

    async fn post_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        op: Operation,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!(%op, "POST {url}");

        let resp = self
            .http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::transport(op, e))?;
        handle_response(op, resp).await
    }

    async fn post_multipart<T: DeserializeOwned>(
        &self,
        op: Operation,
        path: &str,
        form: Form,
    ) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!(%op, "POST {url} (multipart)");

        let resp = self
            .http
            .post(url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| Error::transport(op, e))?;
        handle_response(op, resp).await
    }

    async fn put_json<T: DeserializeOwned, B: Serialize + Sync>(
        &self,
        op: Operation,
        path: &str,
        body: &B,
    ) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!(%op, "PUT {url}");

        let resp = self
            .http
            .put(url)
            .json(body)
            .send()
            .await
            .map_err(|e| Error::transport(op, e))?;
        handle_response(op, resp).await
    }

    async fn delete<T: DeserializeOwned>(
        &self,
        op: Operation,
        path: &str,
    ) -> Result<Option<T>, Error> {
        let url = self.url(path)?;
        debug!(%op, "DELETE {url}");

        let resp = self
            .http
            .delete(url)
            .send()
            .await
            .map_err(|e| Error::transport(op, e))?;
        handle_response(op, resp).await
    }

    // ━━ Public API ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

    // ── Products ─────────────────────────────────────────────────────

    /// List products, passing `search` through to the server untouched.
    /// An empty term lists the full catalog.
    pub async fn list_products(&self, search: &str) -> Result<Vec<ProductResponse>, Error> {
        let params: &[(&str, &str)] = if search.is_empty() {
            &[]
        } else {
            &[("search", search)]
        };
        Ok(self
            .get(Operation::ListProducts, "products/", params)
            .await?
            .unwrap_or_default())
    }

    /// Fetch the authoritative detail record, including documents.
    /// `Ok(None)` means the server answered successfully with no payload.
    pub async fn get_product(&self, id: &ResourceId) -> Result<Option<ProductResponse>, Error> {
        self.get(Operation::GetProduct, &format!("products/{id}/"), &[])
            .await
    }

    pub async fn create_product(
        &self,
        body: &ProductWrite,
    ) -> Result<Option<ProductResponse>, Error> {
        self.post_json(Operation::CreateProduct, "products/", body)
            .await
    }

    pub async fn update_product(
        &self,
        id: &ResourceId,
        body: &ProductWrite,
    ) -> Result<Option<ProductResponse>, Error> {
        self.put_json(Operation::UpdateProduct, &format!("products/{id}/"), body)
            .await
    }

    pub async fn delete_product(&self, id: &ResourceId) -> Result<Option<MessageResponse>, Error> {
        self.delete(Operation::DeleteProduct, &format!("products/{id}/"))
            .await
    }

    // ── Documents ────────────────────────────────────────────────────

    /// Upload a file as a new document. `label` is omitted from the form
    /// when `None` so the backend derives its own default.
    pub async fn upload_document(
        &self,
        product_id: &ResourceId,
        file: FileUpload,
        doc_type: &str,
        label: Option<&str>,
    ) -> Result<Option<DocumentResponse>, Error> {
        let op = Operation::UploadDocument;
        let form = Form::new()
            .part("file", file_part(op, file)?)
            .text("doc_type", doc_type.to_owned());
        let form = match label {
            Some(l) => form.text("label", l.to_owned()),
            None => form,
        };

        self.post_multipart(op, &format!("products/{product_id}/documents/upload/"), form)
            .await
    }

    /// Register an external URL as a new document.
    pub async fn add_document_url(
        &self,
        product_id: &ResourceId,
        url: &str,
        doc_type: &str,
        label: Option<&str>,
    ) -> Result<Option<DocumentResponse>, Error> {
        self.post_json(
            Operation::AddDocumentUrl,
            &format!("products/{product_id}/documents/add_url/"),
            &AddUrlBody {
                url,
                doc_type,
                label,
            },
        )
        .await
    }

    pub async fn delete_document(
        &self,
        doc_id: &ResourceId,
    ) -> Result<Option<MessageResponse>, Error> {
        self.delete(Operation::DeleteDocument, &format!("documents/{doc_id}/"))
            .await
    }

    pub async fn list_documents(
        &self,
        product_id: &ResourceId,
    ) -> Result<Vec<DocumentResponse>, Error> {
        Ok(self
            .get(
                Operation::ListDocuments,
                &format!("products/{product_id}/documents/"),
                &[],
            )
            .await?
            .unwrap_or_default())
    }

    pub async fn get_document(
        &self,
        doc_id: &ResourceId,
    ) -> Result<Option<DocumentResponse>, Error> {
        self.get(Operation::GetDocument, &format!("documents/{doc_id}/"), &[])
            .await
    }

    // ── Import / misc ────────────────────────────────────────────────

    /// Hand a spreadsheet of products to the backend's background importer.
    pub async fn import_products_file(
        &self,
        file: FileUpload,
    ) -> Result<Option<MessageResponse>, Error> {
        let op = Operation::ImportProducts;
        let form = Form::new().part("file", file_part(op, file)?);
        self.post_multipart(op, "import/products-file/", form).await
    }

    /// Backend welcome endpoint, useful as a reachability probe.
    pub async fn welcome(&self) -> Result<Option<MessageResponse>, Error> {
        self.get(Operation::Welcome, "", &[]).await
    }
}

// ── Response handling ────────────────────────────────────────────────

/// Decode a success payload; `204` and empty or `null` bodies are `None`.
async fn handle_response<T: DeserializeOwned>(
    op: Operation,
    resp: reqwest::Response,
) -> Result<Option<T>, Error> {
    let status = resp.status();
    if !status.is_success() {
        return Err(parse_error(op, status, resp).await);
    }
    if status == StatusCode::NO_CONTENT {
        return Ok(None);
    }

    let body = resp.text().await.map_err(|e| Error::transport(op, e))?;
    let trimmed = body.trim();
    if trimmed.is_empty() || trimmed == "null" {
        trace!(%op, "empty success body");
        return Ok(None);
    }

    serde_json::from_str(trimmed).map(Some).map_err(|e| {
        let preview: String = body.chars().take(200).collect();
        warn!(%op, error = %e, "undecodable response body: {preview:?}");
        Error::RequestFailed {
            operation: op,
            status: Some(status.as_u16()),
            message: op.fallback_message().to_owned(),
            source: None,
        }
    })
}

async fn parse_error(op: Operation, status: StatusCode, resp: reqwest::Response) -> Error {
    let raw = resp.text().await.unwrap_or_default();

    let detail = serde_json::from_str::<ErrorResponse>(&raw)
        .ok()
        .and_then(|e| e.detail)
        .and_then(|d| match d {
            serde_json::Value::String(s) if !s.trim().is_empty() => Some(s),
            _ => None,
        });

    warn!(%op, status = status.as_u16(), detail = ?detail, "request failed");

    Error::RequestFailed {
        operation: op,
        status: Some(status.as_u16()),
        message: detail.unwrap_or_else(|| op.fallback_message().to_owned()),
        source: None,
    }
}

fn file_part(op: Operation, file: FileUpload) -> Result<Part, Error> {
    let part = Part::bytes(Vec::from(file.bytes)).file_name(file.file_name);
    match file.mime {
        Some(mime) => part.mime_str(&mime).map_err(|e| Error::transport(op, e)),
        None => Ok(part),
    }
}

/// Make sure the base path ends in `/` so relative joins append.
fn normalize_base_url(raw: &Url) -> Url {
    let mut url = raw.clone();
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn normalize_appends_trailing_slash() {
        let url = normalize_base_url(&Url::parse("http://localhost:8000/api").unwrap());
        assert_eq!(url.as_str(), "http://localhost:8000/api/");
        assert_eq!(
            url.join("products/").unwrap().as_str(),
            "http://localhost:8000/api/products/"
        );
    }

    #[test]
    fn normalize_keeps_root() {
        let url = normalize_base_url(&Url::parse("http://localhost:8000").unwrap());
        assert_eq!(url.as_str(), "http://localhost:8000/");
    }
}
