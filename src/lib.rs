//! Batchview - paged views over batch-fetched data.
//!
//! Paginated lists with an expensive backing fetch want a small page
//! size for the consumer and a larger fetch granularity on the wire.
//! This crate decouples the two: a [`Pager`](pager::Pager) maps logical
//! pages onto network batches, caches each batch the first time it is
//! fetched, deduplicates concurrent fetches for the same batch, and
//! prefetches the neighboring batches on every page change so the next
//! pagination click is usually free.
//!
//! The cache is in-memory only and unbounded; entries live until the
//! pager is dropped. Failed fetches are surfaced passively and retried
//! only when a later page change still finds the batch missing.
//!
//! # Example
//!
//! ```ignore
//! use batchview::attempt::AttemptHistorySource;
//! use batchview::{PageView, Pager, PagerConfig};
//!
//! let source = AttemptHistorySource::new("https://host/api/cc-pair/7")?;
//! let pager = Pager::new(PagerConfig::default(), source);
//!
//! pager.on_page_change(1);
//! match pager.get_page(1) {
//!     PageView::Ready(page) => render(page.records),
//!     PageView::Loading => render_spinner(),
//!     PageView::Failed(e) => render_error(e),
//! }
//! ```

pub mod attempt;
pub mod config;
pub mod error;
pub mod fetcher;
pub mod inflight;
pub mod mapper;
pub mod pager;
pub mod scheduler;
pub mod store;

pub use config::{PagerConfig, DEFAULT_BATCH_SIZE, DEFAULT_PAGE_SIZE};
pub use error::FetchError;
pub use fetcher::{BatchPayload, BoxFuture, PageSource};
pub use mapper::{locate, PageLocation};
pub use pager::{PageView, Pager};
pub use store::{BatchStore, LogicalPage};
