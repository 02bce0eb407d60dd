//! Outbound command queue
//!
//! Bounded, non-blocking hand-off from the emitter to the transport worker.
//! When the link cannot keep up, new commands are dropped rather than
//! delaying the next tick.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DispatchOutcome {
    Queued,
    /// Queue full; the message was discarded
    Dropped,
    /// The worker has shut down
    Closed,
}

#[derive(Debug, Clone)]
pub struct OutboundSender {
    tx: mpsc::Sender<String>,
    dropped: Arc<AtomicU64>,
}

pub fn outbound_channel(capacity: usize) -> (OutboundSender, mpsc::Receiver<String>) {
    let (tx, rx) = mpsc::channel(capacity.max(1));
    (
        OutboundSender {
            tx,
            dropped: Arc::new(AtomicU64::new(0)),
        },
        rx,
    )
}

impl OutboundSender {
    /// Queue a message without waiting for the transport
    pub fn dispatch(&self, message: String) -> DispatchOutcome {
        match self.tx.try_send(message) {
            Ok(()) => DispatchOutcome::Queued,
            Err(mpsc::error::TrySendError::Full(message)) => {
                let total = self.dropped.fetch_add(1, Ordering::Relaxed) + 1;
                trace!("Outbound queue full, dropped {:?} ({} total)", message, total);
                DispatchOutcome::Dropped
            }
            Err(mpsc::error::TrySendError::Closed(_)) => DispatchOutcome::Closed,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }

    pub fn dropped_count(&self) -> u64 {
        self.dropped.load(Ordering::Relaxed)
    }
}
