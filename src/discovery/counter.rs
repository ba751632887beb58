//! In-flight probe accounting
//!
//! The counter is incremented before a probe is spawned and decremented when
//! the probe's guard drops, so a panicking probe still retires its slot.
//! It is only read for drain progress and completion, never for admission.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    in_flight: AtomicUsize,
    idle: Notify,
}

/// Shared count of probes that have been launched but not finished
#[derive(Debug, Clone, Default)]
pub struct WorkCounter {
    inner: Arc<Inner>,
}

impl WorkCounter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one unit of work; the slot is released when the guard drops
    pub fn enter(&self) -> WorkGuard {
        self.inner.in_flight.fetch_add(1, Ordering::AcqRel);
        WorkGuard {
            inner: Arc::clone(&self.inner),
        }
    }

    /// Current number of in-flight probes
    pub fn in_flight(&self) -> usize {
        self.inner.in_flight.load(Ordering::Acquire)
    }

    /// Waits until no work is in flight
    pub async fn wait_idle(&self) {
        loop {
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            // Register before checking so a release in between is not missed
            notified.as_mut().enable();
            if self.in_flight() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// Releases one in-flight slot on drop
#[derive(Debug)]
pub struct WorkGuard {
    inner: Arc<Inner>,
}

impl Drop for WorkGuard {
    fn drop(&mut self) {
        if self.inner.in_flight.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}
