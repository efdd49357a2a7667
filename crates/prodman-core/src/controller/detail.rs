// ── Product detail ──
//
// Owns the single "currently inspected" product. Every selection is an
// authoritative fetch; selecting the open product again is a refresh, not
// a no-op.

use tracing::{debug, warn};

use prodman_api::{ApiClient, ProductResponse, ResourceId};

use super::{FetchOutcome, RequestTicket, Sequencer};
use crate::error::CoreError;
use crate::model::{EntityId, Product};
use crate::notice::Notifier;

#[derive(Debug)]
pub struct DetailController {
    api: ApiClient,
    notifier: Notifier,
    product: Option<Product>,
    open: bool,
    loading: bool,
    seq: Sequencer,
}

impl DetailController {
    pub fn new(api: ApiClient, notifier: Notifier) -> Self {
        Self {
            api,
            notifier,
            product: None,
            open: false,
            loading: false,
            seq: Sequencer::default(),
        }
    }

    pub fn product(&self) -> Option<&Product> {
        self.product.as_ref()
    }

    pub fn is_open(&self) -> bool {
        self.open
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Id of the product shown in the open detail view.
    pub fn open_id(&self) -> Option<&EntityId> {
        if self.open {
            self.product.as_ref().and_then(|p| p.id.as_ref())
        } else {
            None
        }
    }

    /// Close the view and forget the product.
    pub fn close(&mut self) {
        self.open = false;
        self.product = None;
    }

    // ── Selection ────────────────────────────────────────────────────

    /// Fetch `id` and show it. Errors have already been surfaced as a
    /// notice when this returns `Err`.
    pub async fn select(&mut self, id: &EntityId) -> Result<FetchOutcome, CoreError> {
        let ticket = self.begin_select();
        let result = self.api.get_product(&ResourceId::from(id)).await;
        self.finish_select(ticket, id, result)
    }

    /// Start a selection. A closed view drops stale data up front so the
    /// previous product never flashes; an open view keeps it while
    /// refreshing in place.
    pub fn begin_select(&mut self) -> RequestTicket {
        self.loading = true;
        if !self.open {
            self.product = None;
        }
        self.seq.issue()
    }

    pub fn finish_select(
        &mut self,
        ticket: RequestTicket,
        id: &EntityId,
        result: Result<Option<ProductResponse>, prodman_api::Error>,
    ) -> Result<FetchOutcome, CoreError> {
        if !self.seq.is_latest(ticket, "product detail") {
            return Ok(FetchOutcome::Stale);
        }
        self.loading = false;

        let err = match result {
            Ok(Some(found)) => {
                debug!(%id, "product detail loaded");
                self.product = Some(Product::from(found));
                self.open = true;
                return Ok(FetchOutcome::Applied);
            }
            Ok(None) => CoreError::NotFound {
                entity: "Product",
                id: id.to_string(),
            },
            Err(e) => CoreError::from(e),
        };

        warn!(%id, error = %err, "product detail fetch failed");
        self.close();
        self.notifier
            .error(format!("Could not load product details for ID: {id}"));
        Err(err)
    }
}
