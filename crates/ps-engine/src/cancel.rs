//! Cooperative cancellation shared between the caller and the engine.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Cloneable cancellation flag.
///
/// Cancelling stops the engine from dispatching further units and makes
/// queued-but-unstarted units return immediately.  Units already running
/// are not interrupted; the current phase still drains before
/// [`step`](crate::PhaseEngine::step) returns `EngineError::Cancelled`.
#[derive(Clone, Debug, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Acquire)
    }

    /// Clear the flag so the engine can step again.
    pub fn reset(&self) {
        self.0.store(false, Ordering::Release);
    }
}
