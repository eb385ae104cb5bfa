//! Batch cache: batch number to sliced logical pages.
//!
//! The store is write-once per key and never evicts. Entries live for
//! the lifetime of the owning view; a long-lived view over a very large
//! dataset will grow without bound. That is a known limitation inherited
//! from the system this engine was distilled from, kept deliberately
//! rather than guessing at an eviction policy.

use dashmap::DashMap;

/// One page of records as shown to the consumer, plus the envelope
/// metadata the backing response carried.
///
/// Every page sliced from a batch response carries a copy of the
/// envelope's total record count, so any cached page can answer "how
/// many pages exist".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogicalPage<R> {
    /// The records on this page, at most the configured page size. The
    /// final page of a finite dataset may be short or empty.
    pub records: Vec<R>,

    /// Total records in the backing dataset, from the response envelope.
    pub total_records: u64,
}

/// Concurrent map from batch number to that batch's logical pages.
///
/// Safe to share across spawned fetches via `Arc`; each batch write is
/// keyed by its own number, so out-of-order fetch completion is
/// harmless.
#[derive(Debug)]
pub struct BatchStore<R> {
    batches: DashMap<usize, Vec<LogicalPage<R>>>,
}

impl<R> Default for BatchStore<R> {
    fn default() -> Self {
        Self {
            batches: DashMap::new(),
        }
    }
}

impl<R: Clone> BatchStore<R> {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a batch has been cached.
    pub fn contains(&self, batch: usize) -> bool {
        self.batches.contains_key(&batch)
    }

    /// Cache the pages of a batch.
    ///
    /// Entries are immutable once written: if the batch is already
    /// present the existing pages are kept and the new ones dropped.
    pub fn insert(&self, batch: usize, pages: Vec<LogicalPage<R>>) {
        self.batches.entry(batch).or_insert(pages);
    }

    /// Read one page out of a cached batch.
    ///
    /// Returns `None` if the batch is absent or the offset is past the
    /// end of the batch's page list.
    pub fn page(&self, batch: usize, offset: usize) -> Option<LogicalPage<R>> {
        self.batches
            .get(&batch)
            .and_then(|pages| pages.get(offset).cloned())
    }

    /// Number of cached batches.
    pub fn batch_count(&self) -> usize {
        self.batches.len()
    }
}
