// src/crawl/pool.rs
// =============================================================================
// Bounded slot pools.
//
// Two independent pools gate the crawl:
// - workers:   total HTTP probes in flight, shared by every probe
// - dir slots: brute-force sessions running at the same time
//
// Acquiring blocks when the pool is empty; that wait is the only
// back-pressure in the pipeline. Releasing is dropping the slot.
// =============================================================================

use std::sync::Arc;
use tokio::sync::{OwnedSemaphorePermit, Semaphore};

use super::error::CrawlError;

#[derive(Debug, Clone)]
pub struct Pool {
    name: &'static str,
    capacity: usize,
    semaphore: Arc<Semaphore>,
}

impl Pool {
    pub fn new(name: &'static str, capacity: usize) -> Self {
        Self {
            name,
            capacity,
            semaphore: Arc::new(Semaphore::new(capacity)),
        }
    }

    /// Waits for a free slot.
    pub async fn acquire(&self) -> Result<Slot, CrawlError> {
        let permit = self
            .semaphore
            .clone()
            .acquire_owned()
            .await
            .map_err(|_| CrawlError::PoolClosed(self.name))?;
        Ok(Slot { _permit: permit })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Slots not currently held by anyone.
    pub fn available(&self) -> usize {
        self.semaphore.available_permits()
    }
}

/// A held slot. Returned to its pool on drop.
#[derive(Debug)]
pub struct Slot {
    _permit: OwnedSemaphorePermit,
}

impl Slot {
    pub fn release(self) {}
}

// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What is a Semaphore?
//    - A counter of permits; acquire() takes one and waits if none are left
//    - acquire_owned() needs an Arc<Semaphore> but returns a permit that is
//      not tied to a borrow, so it can be moved into a spawned task
//
// 2. Why two pools?
//    - One big wordlist could otherwise keep every worker busy on a single
//      directory; the directory pool limits how many run side by side
// -----------------------------------------------------------------------------
