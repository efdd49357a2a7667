// ── Cross-controller completion signals ──
//
// The attachment manager never calls back into the catalog directly. It
// sends a `CompletionSignal` and the catalog controller drains the channel
// in `process_signals`.

use tokio::sync::mpsc;

use crate::model::EntityId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompletionSignal {
    /// A document was added to or removed from the product.
    DocumentsChanged { product_id: EntityId },
}

pub type SignalSender = mpsc::UnboundedSender<CompletionSignal>;
pub type SignalReceiver = mpsc::UnboundedReceiver<CompletionSignal>;

pub fn channel() -> (SignalSender, SignalReceiver) {
    mpsc::unbounded_channel()
}
