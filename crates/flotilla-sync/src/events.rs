//! One-shot event delivery from controllers to the UI.

use tokio::sync::mpsc;

/// Receiving end of a controller's transient notifications.
///
/// Events arrive in emission order and each is delivered exactly once, to
/// this single consumer. There is no replay: a consumer that was not
/// listening when an event was emitted misses it permanently. The
/// controller's snapshot is the durable source of truth; events only carry
/// outcomes that must be shown once.
pub struct EventQueue<E> {
    receiver: mpsc::UnboundedReceiver<E>,
}

impl<E> EventQueue<E> {
    pub(crate) fn new(receiver: mpsc::UnboundedReceiver<E>) -> Self {
        Self { receiver }
    }

    /// Receive the next event, waiting for one if none is pending.
    ///
    /// Returns `None` once the controller is gone and every pending event
    /// has been consumed.
    pub async fn next(&mut self) -> Option<E> {
        self.receiver.recv().await
    }

    /// Take the next pending event without waiting.
    pub fn try_next(&mut self) -> Option<E> {
        self.receiver.try_recv().ok()
    }
}
