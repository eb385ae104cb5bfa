//! Pager configuration.
//!
//! Two sizes govern the engine: the logical page size shown to the
//! consumer per pagination step, and the batch size measured in logical
//! pages per network fetch. The source admin console showed 8 records per
//! page and fetched 8 pages at a time, so one network call covered 64
//! records.

/// Default number of records per logical page.
pub const DEFAULT_PAGE_SIZE: usize = 8;

/// Default number of logical pages fetched per network call.
///
/// With the default page size this means 64 records per fetch.
pub const DEFAULT_BATCH_SIZE: usize = 8;

/// Sizing configuration for a [`Pager`](crate::pager::Pager).
///
/// Both sizes are fixed for the lifetime of a pager; the page-to-batch
/// mapping in [`mapper`](crate::mapper) is only stable while they do not
/// change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PagerConfig {
    /// Records per logical page.
    pub page_size: usize,

    /// Logical pages per network batch.
    pub batch_size: usize,
}

impl Default for PagerConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl PagerConfig {
    /// Create a config with explicit sizes.
    ///
    /// Zero sizes are meaningless for pagination, so both values are
    /// clamped to at least 1.
    ///
    /// # Arguments
    ///
    /// * `page_size` - Records per logical page
    /// * `batch_size` - Logical pages per network batch
    pub fn new(page_size: usize, batch_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            batch_size: batch_size.max(1),
        }
    }

    /// Number of records requested per network call.
    pub fn records_per_batch(&self) -> usize {
        self.page_size * self.batch_size
    }

    /// Total logical pages needed to show `total_records` records.
    pub fn total_pages(&self, total_records: u64) -> u64 {
        total_records.div_ceil(self.page_size as u64)
    }

    /// Highest batch number that exists for a dataset of `total_pages`
    /// logical pages.
    ///
    /// An empty dataset still reports batch 0 so the always-warm rule
    /// has a batch to target.
    pub fn last_batch(&self, total_pages: u64) -> usize {
        total_pages.div_ceil(self.batch_size as u64).saturating_sub(1) as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sizes() {
        let config = PagerConfig::default();
        assert_eq!(config.page_size, 8);
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.records_per_batch(), 64);
    }

    #[test]
    fn test_new_clamps_zero_sizes() {
        let config = PagerConfig::new(0, 0);
        assert_eq!(config.page_size, 1);
        assert_eq!(config.batch_size, 1);
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let config = PagerConfig::default();
        assert_eq!(config.total_pages(0), 0);
        assert_eq!(config.total_pages(64), 8);
        // 100 records at 8 per page leaves a short 13th page.
        assert_eq!(config.total_pages(100), 13);
    }

    #[test]
    fn test_last_batch() {
        let config = PagerConfig::default();
        assert_eq!(config.last_batch(0), 0);
        assert_eq!(config.last_batch(8), 0);
        assert_eq!(config.last_batch(13), 1);
        assert_eq!(config.last_batch(17), 2);
    }
}
