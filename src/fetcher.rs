//! Batch fetching: one network request per missing batch.
//!
//! The fetcher turns a batch number into a request against the backing
//! list endpoint, slices the oversized response into logical pages, and
//! writes them into the [`BatchStore`]. The network seam is the
//! [`PageSource`] trait, which exists for dependency injection: tests
//! run the whole engine against in-memory sources.
//!
//! Failure handling is deliberately passive. A failed fetch writes
//! nothing, parks the error in a shared slot for the view to surface,
//! and leaves the batch absent so a later scheduler pass can try again.
//! There is no retry or backoff inside the fetcher itself.

use std::future::Future;
use std::pin::Pin;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, warn};

use crate::config::PagerConfig;
use crate::error::FetchError;
use crate::inflight::InFlightTracker;
use crate::store::{BatchStore, LogicalPage};

/// Boxed future type for dyn-compatible async methods.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// One batch of records as returned by the backing endpoint, before
/// slicing into logical pages.
#[derive(Debug, Clone)]
pub struct BatchPayload<R> {
    /// The raw record run, up to `page_size * batch_size` records.
    pub records: Vec<R>,

    /// Envelope metadata: total records in the backing dataset.
    pub total_records: u64,
}

/// A paged backing endpoint.
///
/// Implementations issue one request per batch. The argument convention
/// follows the backing endpoint's own pagination, not the consumer's:
/// `page` is the 1-based batch index and `page_size` is the record count
/// per batch (`PagerConfig::records_per_batch`).
///
/// # Dyn Compatibility
///
/// Uses `Pin<Box<dyn Future>>` so sources can be used as trait objects
/// and mocked in tests.
pub trait PageSource: Send + Sync + 'static {
    /// The record type carried by the backing list.
    type Record: Clone + Send + Sync + 'static;

    /// Fetch one batch of records.
    ///
    /// # Arguments
    ///
    /// * `page` - 1-based batch index in the endpoint's URL convention
    /// * `page_size` - records requested per batch
    ///
    /// # Errors
    ///
    /// Returns [`FetchError`] on non-success HTTP status, transport
    /// failure, or a body missing the expected fields.
    fn fetch_batch(
        &self,
        page: usize,
        page_size: usize,
    ) -> BoxFuture<'_, Result<BatchPayload<Self::Record>, FetchError>>;
}

/// Slice a batch response into logical pages.
///
/// Always produces exactly `batch_size` pages. Pages past the end of the
/// record run come out short or empty, which happens only on the final
/// batch of a finite dataset. The envelope's total record count is
/// duplicated onto every slice. Pure function of the payload: re-slicing
/// the same response always reproduces the same pages.
pub(crate) fn slice_batch<R: Clone>(
    config: &PagerConfig,
    payload: &BatchPayload<R>,
) -> Vec<LogicalPage<R>> {
    let mut pages = Vec::with_capacity(config.batch_size);
    for i in 0..config.batch_size {
        let start = (i * config.page_size).min(payload.records.len());
        let end = ((i + 1) * config.page_size).min(payload.records.len());
        pages.push(LogicalPage {
            records: payload.records[start..end].to_vec(),
            total_records: payload.total_records,
        });
    }
    pages
}

/// Fetches missing batches and writes them into the store.
///
/// Shared state is `Arc`ed so the fetcher can be cloned into spawned
/// tasks; concurrent fetches for different batches are independent and
/// may settle in any order.
pub struct BatchFetcher<S: PageSource> {
    config: PagerConfig,
    source: Arc<S>,
    store: Arc<BatchStore<S::Record>>,
    in_flight: Arc<InFlightTracker>,
    last_error: Arc<Mutex<Option<FetchError>>>,
    total_records: Arc<AtomicU64>,
}

impl<S: PageSource> Clone for BatchFetcher<S> {
    fn clone(&self) -> Self {
        Self {
            config: self.config,
            source: Arc::clone(&self.source),
            store: Arc::clone(&self.store),
            in_flight: Arc::clone(&self.in_flight),
            last_error: Arc::clone(&self.last_error),
            total_records: Arc::clone(&self.total_records),
        }
    }
}

impl<S: PageSource> BatchFetcher<S> {
    /// Create a fetcher over shared engine state.
    pub fn new(
        config: PagerConfig,
        source: Arc<S>,
        store: Arc<BatchStore<S::Record>>,
        in_flight: Arc<InFlightTracker>,
        last_error: Arc<Mutex<Option<FetchError>>>,
        total_records: Arc<AtomicU64>,
    ) -> Self {
        Self {
            config,
            source,
            store,
            in_flight,
            last_error,
            total_records,
        }
    }

    /// Fetch one batch and cache its pages.
    ///
    /// The caller must hold the in-flight claim for `batch`
    /// (`InFlightTracker::try_acquire` returned `true`); the claim is
    /// released when this settles, success or failure.
    ///
    /// On success the response is sliced into logical pages and written
    /// into the store, and the envelope's total record count is
    /// published for `total_pages` computation. On failure the error is
    /// parked in the last-error slot and the batch stays absent.
    pub async fn fetch(&self, batch: usize) {
        debug!(batch, "fetching batch");

        let result = self
            .source
            .fetch_batch(batch + 1, self.config.records_per_batch())
            .await;

        match result {
            Ok(payload) => {
                self.total_records
                    .store(payload.total_records, Ordering::Relaxed);
                let pages = slice_batch(&self.config, &payload);
                debug!(
                    batch,
                    records = payload.records.len(),
                    total_records = payload.total_records,
                    "batch cached"
                );
                self.store.insert(batch, pages);
            }
            Err(e) => {
                warn!(error = %e, batch, "batch fetch failed");
                *self.last_error.lock() = Some(e);
            }
        }

        self.in_flight.release(batch);
    }
}
