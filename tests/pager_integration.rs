//! End-to-end pager behavior against a simulated backing endpoint.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;

use batchview::{BatchPayload, BoxFuture, FetchError, PageSource, PageView, Pager, PagerConfig};

/// Simulated paged list endpoint over `total` records with ids
/// `1..=total`. Records every request it receives and can be switched
/// into a failing state.
struct SimulatedApi {
    total: u64,
    requests: Mutex<Vec<(usize, usize)>>,
    failing: AtomicBool,
}

impl SimulatedApi {
    fn new(total: u64) -> Self {
        Self {
            total,
            requests: Mutex::new(Vec::new()),
            failing: AtomicBool::new(false),
        }
    }

    fn requests(&self) -> Vec<(usize, usize)> {
        self.requests.lock().clone()
    }

    fn requests_for_page(&self, page: usize) -> usize {
        self.requests.lock().iter().filter(|r| r.0 == page).count()
    }
}

impl PageSource for SimulatedApi {
    type Record = u64;

    fn fetch_batch(
        &self,
        page: usize,
        page_size: usize,
    ) -> BoxFuture<'_, Result<BatchPayload<u64>, FetchError>> {
        self.requests.lock().push((page, page_size));
        Box::pin(async move {
            if self.failing.load(Ordering::Relaxed) {
                return Err(FetchError::Http { status: 500 });
            }
            let start = ((page - 1) * page_size) as u64;
            let end = (start + page_size as u64).min(self.total);
            let records = if start >= self.total {
                Vec::new()
            } else {
                (start + 1..=end).collect()
            };
            Ok(BatchPayload {
                records,
                total_records: self.total,
            })
        })
    }
}

/// Poll until `cond` holds, panicking after one second.
async fn eventually(cond: impl Fn() -> bool) {
    tokio::time::timeout(Duration::from_secs(1), async {
        while !cond() {
            tokio::task::yield_now().await;
        }
    })
    .await
    .expect("condition not reached in time");
}

/// Newtype so the test can keep a handle on the simulated API while the
/// pager owns the source.
struct SharedApi(Arc<SimulatedApi>);

impl PageSource for SharedApi {
    type Record = u64;

    fn fetch_batch(
        &self,
        page: usize,
        page_size: usize,
    ) -> BoxFuture<'_, Result<BatchPayload<u64>, FetchError>> {
        self.0.fetch_batch(page, page_size)
    }
}

fn hundred_record_pager() -> (Arc<SimulatedApi>, Pager<SharedApi>) {
    let api = Arc::new(SimulatedApi::new(100));
    let pager = Pager::new(PagerConfig::default(), SharedApi(Arc::clone(&api)));
    (api, pager)
}

fn hundred_record_pager_shared() -> (Arc<SimulatedApi>, Arc<Pager<SharedApi>>) {
    let (api, pager) = hundred_record_pager();
    (api, Arc::new(pager))
}

#[tokio::test]
async fn test_first_page_fetches_one_batch_of_sixtyfour() {
    let (api, pager) = hundred_record_pager();

    assert_eq!(pager.get_page(1), PageView::Loading);
    pager.on_page_change(1);

    eventually(|| matches!(pager.get_page(1), PageView::Ready(_))).await;

    // One call for batch 0: endpoint page 1, 64 records.
    assert_eq!(api.requests_for_page(1), 1);
    assert!(api.requests().contains(&(1, 64)));

    // Pages 1-8 all come out of batch 0 without further requests.
    for page in 1..=8usize {
        let PageView::Ready(data) = pager.get_page(page) else {
            panic!("page {page} should be cached");
        };
        assert_eq!(data.records.len(), 8);
        assert_eq!(data.records[0], (page as u64 - 1) * 8 + 1);
        assert_eq!(data.total_records, 100);
    }
    assert_eq!(api.requests_for_page(1), 1);

    // Envelope metadata drives the page count: 100 records, 13 pages.
    assert_eq!(pager.total_pages(), 13);
}

#[tokio::test]
async fn test_moving_to_second_batch_skips_cached_first() {
    let (api, pager) = hundred_record_pager();

    pager.on_page_change(1);
    eventually(|| matches!(pager.get_page(1), PageView::Ready(_))).await;

    pager.on_page_change(9);
    eventually(|| matches!(pager.get_page(9), PageView::Ready(_))).await;

    // Batch 1 was fetched once; batch 0 (previous and always-warm
    // target) was already cached and never re-requested. Batch 2 does
    // not exist for 13 pages, so the next-batch target clamps to 1.
    assert_eq!(api.requests_for_page(2), 1);
    assert_eq!(api.requests_for_page(1), 1);
    assert_eq!(api.requests_for_page(3), 0);
}

#[tokio::test]
async fn test_last_page_is_short() {
    let (api, pager) = hundred_record_pager();

    pager.on_page_change(13);
    eventually(|| matches!(pager.get_page(13), PageView::Ready(_))).await;

    // Page 13 is batch 1, offset 4: records 97..=100.
    let PageView::Ready(data) = pager.get_page(13) else {
        unreachable!();
    };
    assert_eq!(data.records, vec![97, 98, 99, 100]);

    // No request beyond the last existing batch.
    assert_eq!(api.requests_for_page(3), 0);
}

#[tokio::test]
async fn test_failed_batch_surfaces_error_and_is_retried() {
    let (api, pager) = hundred_record_pager();
    api.failing.store(true, Ordering::Relaxed);
    pager.seed_total_records(100);

    pager.on_page_change(9);
    eventually(|| matches!(pager.get_page(9), PageView::Failed(_))).await;
    assert_eq!(
        pager.last_error(),
        Some(FetchError::Http { status: 500 })
    );

    // The failed batch stayed out of the cache, so a later page change
    // attempts it again; once the endpoint recovers the page loads.
    api.failing.store(false, Ordering::Relaxed);
    pager.on_page_change(9);
    eventually(|| matches!(pager.get_page(9), PageView::Ready(_))).await;
    assert!(api.requests_for_page(2) >= 2);

    pager.clear_error();
    assert_eq!(pager.last_error(), None);
}

#[tokio::test]
async fn test_rapid_pagination_fetches_each_batch_once() {
    let (api, pager) = hundred_record_pager_shared();
    pager.seed_total_records(100);

    // Click through every page concurrently; deduplication must keep it
    // to one request per existing batch.
    let clicks = (1..=13usize).map(|page| {
        let pager = Arc::clone(&pager);
        tokio::spawn(async move {
            pager.on_page_change(page);
        })
    });
    futures::future::join_all(clicks).await;

    eventually(|| {
        matches!(pager.get_page(1), PageView::Ready(_))
            && matches!(pager.get_page(13), PageView::Ready(_))
    })
    .await;

    assert_eq!(api.requests_for_page(1), 1);
    assert_eq!(api.requests_for_page(2), 1);
    assert_eq!(api.requests().len(), 2);
}
