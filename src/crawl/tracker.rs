// src/crawl/tracker.rs
// =============================================================================
// The completion tracker: a process-wide count of pending work.
//
// Every candidate, raw URL and probe task that enters the pipeline is
// registered here first and becomes a `WorkUnit`. The unit travels with the
// message that carries it, so whichever component takes final responsibility
// for the work also ends up owning (and dropping) the unit.
//
// Contract:
// - register BEFORE sending, so the count can never dip to zero while a
//   message is in flight
// - a unit is resolved exactly once, by dropping it (or calling `resolve`)
//
// When the count returns to zero nothing holds work and nothing will send
// again, which is how the caller knows the crawl has finished.
// =============================================================================

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct Inner {
    pending: AtomicUsize,
    idle: Notify,
}

/// Shared handle to the pending-work counter. Cheap to clone.
#[derive(Debug, Clone, Default)]
pub struct Tracker {
    inner: Arc<Inner>,
}

impl Tracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers one unit of work. The returned unit must be handed to
    /// whoever will finish the work.
    pub fn register(&self) -> WorkUnit {
        self.inner.pending.fetch_add(1, Ordering::AcqRel);
        WorkUnit {
            inner: self.inner.clone(),
        }
    }

    /// Number of units registered but not yet resolved.
    pub fn pending(&self) -> usize {
        self.inner.pending.load(Ordering::Acquire)
    }

    /// Waits until every registered unit has been resolved.
    pub async fn wait_idle(&self) {
        loop {
            // Arm the notification before checking the count, otherwise a
            // wake-up between the check and the await would be lost.
            let notified = self.inner.idle.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            if self.pending() == 0 {
                return;
            }
            notified.await;
        }
    }
}

/// One registered, not yet resolved piece of work.
#[must_use = "dropping a WorkUnit resolves it immediately"]
#[derive(Debug)]
pub struct WorkUnit {
    inner: Arc<Inner>,
}

impl WorkUnit {
    /// Marks the work as finished. Same as dropping, but reads better at
    /// the places where resolution is the point.
    pub fn resolve(self) {}
}

impl Drop for WorkUnit {
    fn drop(&mut self) {
        if self.inner.pending.fetch_sub(1, Ordering::AcqRel) == 1 {
            self.inner.idle.notify_waiters();
        }
    }
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. Why a guard type instead of add()/done() calls?
//    - `WorkUnit` decrements the counter in its Drop impl
//    - A unit can't be resolved twice (resolve takes `self`) and can't be
//      forgotten: an early `return` or a dropped channel message resolves it
//
// 2. What is Notify?
//    - A tokio primitive for "wake whoever is waiting"
//    - notify_waiters() only wakes tasks already waiting, which is why
//      wait_idle() enables its Notified future before reading the count
// -----------------------------------------------------------------------------
