//! In-flight fetch tracking.
//!
//! A batch must be fetched at most once concurrently. The tracker is the
//! gate: a fetch may only start after `try_acquire` returns `true`, and
//! must `release` when it settles, success or failure. `DashSet::insert`
//! is atomic, so the guarantee holds even when scheduler passes overlap
//! across tasks.

use dashmap::DashSet;

/// Set of batch numbers with a fetch currently in flight.
#[derive(Debug, Default)]
pub struct InFlightTracker {
    active: DashSet<usize>,
}

impl InFlightTracker {
    /// Create an empty tracker.
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim a batch for fetching.
    ///
    /// Returns `false` without changing state if the batch is already
    /// claimed. A `true` return obligates the caller to eventually call
    /// [`release`](Self::release) for the same batch.
    pub fn try_acquire(&self, batch: usize) -> bool {
        self.active.insert(batch)
    }

    /// Release a batch unconditionally.
    ///
    /// Idempotent: releasing a batch that is not tracked is a no-op.
    pub fn release(&self, batch: usize) {
        self.active.remove(&batch);
    }

    /// Whether a fetch for this batch is currently in flight.
    pub fn is_in_flight(&self, batch: usize) -> bool {
        self.active.contains(&batch)
    }
}
