//! Mapping from logical page numbers to batch coordinates.
//!
//! Logical pages are 1-based (page 1 is the first page the consumer
//! sees); batches are 0-based. With a batch size of 8, pages 1-8 live in
//! batch 0, pages 9-16 in batch 1, and so on.

/// Position of a logical page within the batch space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLocation {
    /// Zero-based number of the batch owning the page.
    pub batch: usize,

    /// Zero-based offset of the page within its batch, always less than
    /// the batch size.
    pub offset: usize,
}

/// Locate the batch and offset owning a 1-based logical page.
///
/// Pure and total for any `page >= 1`; the result is stable for the
/// lifetime of a given batch size. For every valid input,
/// `batch * batch_size + offset + 1 == page`.
///
/// # Arguments
///
/// * `page` - 1-based logical page number
/// * `batch_size` - logical pages per batch, at least 1
pub fn locate(page: usize, batch_size: usize) -> PageLocation {
    debug_assert!(page >= 1, "logical pages are 1-based");
    debug_assert!(batch_size >= 1, "batch size must be at least 1");

    PageLocation {
        batch: (page - 1) / batch_size,
        offset: (page - 1) % batch_size,
    }
}
