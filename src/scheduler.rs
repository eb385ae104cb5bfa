//! Prefetch scheduling on page changes.
//!
//! Every page change targets a fixed window of batches: the one owning
//! the new page, its next and previous neighbors, and batch 0 so the
//! first page is always warm. Missing targets are fetched on spawned
//! tasks; the in-flight gate makes rapid repeated passes safe, and
//! already-cached batches are never fetched again.

use std::sync::Arc;

use tracing::debug;

use crate::config::PagerConfig;
use crate::fetcher::{BatchFetcher, PageSource};
use crate::inflight::InFlightTracker;
use crate::mapper::locate;
use crate::store::BatchStore;

/// Decides which batches a page change requires and starts the missing
/// fetches.
pub struct PrefetchScheduler<S: PageSource> {
    config: PagerConfig,
    fetcher: BatchFetcher<S>,
    store: Arc<BatchStore<S::Record>>,
    in_flight: Arc<InFlightTracker>,
}

impl<S: PageSource> PrefetchScheduler<S> {
    /// Create a scheduler over shared engine state.
    pub fn new(
        config: PagerConfig,
        fetcher: BatchFetcher<S>,
        store: Arc<BatchStore<S::Record>>,
        in_flight: Arc<InFlightTracker>,
    ) -> Self {
        Self {
            config,
            fetcher,
            store,
            in_flight,
        }
    }

    /// React to the view landing on `page`.
    ///
    /// Targets up to four batches in priority order: current, next
    /// (clamped to the last batch that exists for `total_pages`),
    /// previous (clamped at zero), and batch 0. Each target absent from
    /// the store is claimed through the in-flight gate and fetched on a
    /// spawned task, so two racing passes never issue two fetches for
    /// the same batch.
    ///
    /// Re-entrant and idempotent with respect to cached or in-flight
    /// batches. Must be called from within a tokio runtime.
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based logical page the view moved to
    /// * `total_pages` - total logical pages, 0 if not yet known
    pub fn on_page_changed(&self, page: usize, total_pages: u64) {
        let batch = locate(page, self.config.batch_size).batch;
        let last_batch = self.config.last_batch(total_pages);

        let next = (batch + 1).min(last_batch);
        let prev = batch.saturating_sub(1);

        // Priority order; duplicates within one pass are filtered by the
        // store check and the in-flight gate.
        for target in [batch, next, prev, 0] {
            self.fetch_if_missing(target);
        }
    }

    /// Start a fetch for `batch` unless it is cached or already in
    /// flight.
    fn fetch_if_missing(&self, batch: usize) {
        if self.store.contains(batch) {
            return;
        }
        if !self.in_flight.try_acquire(batch) {
            debug!(batch, "fetch already in flight, skipping");
            return;
        }

        let fetcher = self.fetcher.clone();
        tokio::spawn(async move {
            fetcher.fetch(batch).await;
        });
    }
}
