//! Consumer-facing pager facade.
//!
//! A [`Pager`] owns the engine state (store, in-flight gate, last-error
//! slot) and wires the fetcher and scheduler over a [`PageSource`].
//! The consumer drives it with two calls: [`on_page_change`] when the
//! view moves to a page, and [`get_page`] to read whatever is known
//! about a page right now. Both are cheap; all network work happens on
//! spawned tasks.
//!
//! [`on_page_change`]: Pager::on_page_change
//! [`get_page`]: Pager::get_page

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;

use crate::config::PagerConfig;
use crate::error::FetchError;
use crate::fetcher::{BatchFetcher, PageSource};
use crate::inflight::InFlightTracker;
use crate::mapper::locate;
use crate::scheduler::PrefetchScheduler;
use crate::store::{BatchStore, LogicalPage};

/// What the view knows about a page at read time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageView<R> {
    /// The page is cached.
    Ready(LogicalPage<R>),

    /// The page's batch is missing and either in flight or not yet
    /// scheduled.
    Loading,

    /// The page's batch is missing, no fetch is in flight, and the most
    /// recent fetch failure explains why.
    Failed(FetchError),
}

/// Paged view over a batch-fetched backing list.
///
/// State lives for the lifetime of the pager and is never evicted;
/// dropping the pager drops the cache.
pub struct Pager<S: PageSource> {
    config: PagerConfig,
    store: Arc<BatchStore<S::Record>>,
    in_flight: Arc<InFlightTracker>,
    last_error: Arc<Mutex<Option<FetchError>>>,
    total_records: Arc<AtomicU64>,
    scheduler: PrefetchScheduler<S>,
}

impl<S: PageSource> Pager<S> {
    /// Create a pager over a backing source.
    pub fn new(config: PagerConfig, source: S) -> Self {
        let store = Arc::new(BatchStore::new());
        let in_flight = Arc::new(InFlightTracker::new());
        let last_error = Arc::new(Mutex::new(None));
        let total_records = Arc::new(AtomicU64::new(0));

        let fetcher = BatchFetcher::new(
            config,
            Arc::new(source),
            Arc::clone(&store),
            Arc::clone(&in_flight),
            Arc::clone(&last_error),
            Arc::clone(&total_records),
        );
        let scheduler = PrefetchScheduler::new(
            config,
            fetcher,
            Arc::clone(&store),
            Arc::clone(&in_flight),
        );

        Self {
            config,
            store,
            in_flight,
            last_error,
            total_records,
            scheduler,
        }
    }

    /// Seed the total record count before the first fetch lands.
    ///
    /// Useful when the surrounding application already knows the count
    /// from another endpoint; without a seed the next-batch prefetch
    /// window stays clamped to batch 0 until the first envelope arrives.
    pub fn seed_total_records(&self, total_records: u64) {
        self.total_records.store(total_records, Ordering::Relaxed);
    }

    /// React to the view landing on a 1-based page.
    ///
    /// Triggers fetches for the page's batch and its prefetch window.
    /// Must be called from within a tokio runtime. Safe to call
    /// repeatedly and rapidly; cached and in-flight batches are skipped.
    pub fn on_page_change(&self, page: usize) {
        self.scheduler.on_page_changed(page, self.total_pages());
    }

    /// Read the current knowledge about a 1-based page.
    ///
    /// Never blocks and never triggers a fetch. A missing batch with a
    /// fetch in flight (or not yet scheduled) reads as [`PageView::Loading`];
    /// a missing batch with no fetch in flight and a recorded failure
    /// reads as [`PageView::Failed`].
    pub fn get_page(&self, page: usize) -> PageView<S::Record> {
        let loc = locate(page, self.config.batch_size);

        if let Some(data) = self.store.page(loc.batch, loc.offset) {
            return PageView::Ready(data);
        }

        if !self.in_flight.is_in_flight(loc.batch) {
            if let Some(err) = self.last_error.lock().clone() {
                return PageView::Failed(err);
            }
        }

        PageView::Loading
    }

    /// Total logical pages, from the latest observed envelope.
    ///
    /// Zero until the first batch lands or the count is seeded.
    pub fn total_pages(&self) -> u64 {
        self.config.total_pages(self.total_records.load(Ordering::Relaxed))
    }

    /// Total records in the backing dataset, from the latest observed
    /// envelope.
    pub fn total_records(&self) -> u64 {
        self.total_records.load(Ordering::Relaxed)
    }

    /// The most recent fetch failure, if any.
    pub fn last_error(&self) -> Option<FetchError> {
        self.last_error.lock().clone()
    }

    /// Clear the recorded fetch failure.
    ///
    /// The engine never clears it on its own; callers that retried a
    /// page and got data may want to drop the stale error.
    pub fn clear_error(&self) {
        *self.last_error.lock() = None;
    }

    /// The pager's sizing configuration.
    pub fn config(&self) -> &PagerConfig {
        &self.config
    }
}
