// ── Controllers ──
//
// Three state owners, composed by `CatalogController`:
//
// - `CatalogController`: product list, search term, create/edit/delete.
// - `DetailController`: the currently inspected product.
// - `AttachmentManager`: document ingestion for one product.
//
// Each fetch that writes controller state is split into `begin_*` and
// `finish_*`. `begin_*` issues a `RequestTicket`; `finish_*` applies the
// response only when that ticket is still the latest one for the
// controller, so a slow stale response can never overwrite newer state.

pub mod attachments;
pub mod catalog;
pub mod detail;

pub use attachments::{AttachmentManager, IngestMode, IngestRequest, IngestionDraft, SelectedFile};
pub use catalog::{CatalogController, FormMode, PendingRemoval, ProductFormState};
pub use detail::DetailController;

use tracing::debug;

/// Sequence number of one issued request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct RequestTicket(u64);

impl RequestTicket {
    pub fn seq(self) -> u64 {
        self.0
    }
}

/// Whether a finished request was applied or discarded as stale.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchOutcome {
    Applied,
    Stale,
}

/// Per-controller monotonically increasing ticket source.
#[derive(Debug, Default)]
pub(crate) struct Sequencer {
    latest: u64,
}

impl Sequencer {
    pub(crate) fn issue(&mut self) -> RequestTicket {
        self.latest += 1;
        RequestTicket(self.latest)
    }

    pub(crate) fn is_latest(&self, ticket: RequestTicket, what: &str) -> bool {
        let latest = ticket.0 == self.latest;
        if !latest {
            debug!(
                ticket = ticket.0,
                latest = self.latest,
                "discarding stale {what} response"
            );
        }
        latest
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_the_newest_ticket_is_latest() {
        let mut seq = Sequencer::default();
        let first = seq.issue();
        let second = seq.issue();
        assert!(first < second);
        assert!(!seq.is_latest(first, "test"));
        assert!(seq.is_latest(second, "test"));
    }
}
