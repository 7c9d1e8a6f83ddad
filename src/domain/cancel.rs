use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cooperative cancellation signal for the recording worker.
///
/// Single writer (the orchestrator calls `cancel` once), single reader (the
/// worker checks `is_cancelled` once per drain iteration). The worker may
/// complete one in-flight chunk after cancellation; callers must not rely on
/// an immediate stop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation. Idempotent.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }
}
