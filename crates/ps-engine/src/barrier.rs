//! Counting wait-group used as the phase barrier.
//!
//! The driver takes one [`WaitGuard`] per dispatched unit and moves it into
//! the unit's closure.  Dropping the guard (normal return or unwinding)
//! counts the unit as finished.  [`WaitGroup::wait`] blocks on a condvar
//! until the count reaches zero.

use std::sync::{Arc, Condvar, Mutex, MutexGuard};
use std::time::{Duration, Instant};

#[derive(Default)]
struct Inner {
    pending: Mutex<usize>,
    drained: Condvar,
}

impl Inner {
    fn lock(&self) -> MutexGuard<'_, usize> {
        // The counter stays consistent even if a holder panicked.
        self.pending.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Blocks a waiter until every outstanding [`WaitGuard`] is dropped.
#[derive(Clone, Default)]
pub struct WaitGroup {
    inner: Arc<Inner>,
}

impl WaitGroup {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one unit of outstanding work.
    pub fn enter(&self) -> WaitGuard {
        *self.inner.lock() += 1;
        WaitGuard { inner: Arc::clone(&self.inner) }
    }

    /// Units entered but not yet finished.
    pub fn pending(&self) -> usize {
        *self.inner.lock()
    }

    /// Block until no units are outstanding.
    pub fn wait(&self) {
        let mut pending = self.inner.lock();
        while *pending > 0 {
            pending = self
                .inner
                .drained
                .wait(pending)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Block until no units are outstanding or `timeout` elapses.
    ///
    /// Returns `true` if the group drained in time.
    pub fn wait_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut pending = self.inner.lock();
        while *pending > 0 {
            let now = Instant::now();
            if now >= deadline {
                return false;
            }
            let (guard, _) = self
                .inner
                .drained
                .wait_timeout(pending, deadline - now)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            pending = guard;
        }
        true
    }
}

/// One outstanding unit of a [`WaitGroup`].  Finishes on drop.
pub struct WaitGuard {
    inner: Arc<Inner>,
}

impl Drop for WaitGuard {
    fn drop(&mut self) {
        let mut pending = self.inner.lock();
        *pending -= 1;
        if *pending == 0 {
            self.inner.drained.notify_all();
        }
    }
}
