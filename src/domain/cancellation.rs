//! Cooperative cancellation flag shared between the scheduler and a worker.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Advisory cancel signal.
///
/// Setting it never stops a worker by force; workers poll it at their
/// suspension points and wind down on their own.
#[derive(Debug, Clone, Default)]
pub struct CancelFlag {
    cancelled: Arc<AtomicBool>,
}

impl CancelFlag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Requests cancellation. Returns immediately.
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::SeqCst);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::SeqCst)
    }
}
