//! Indexing-attempt history source.
//!
//! The engine was built to browse a connector's indexing-attempt
//! history in an admin console. This module supplies the concrete
//! record type and the HTTP [`PageSource`] over the backing endpoint:
//!
//! `GET {base}/index-attempts?page={batch}&page_size={records}`
//!
//! where `page` is the 1-based batch index and `page_size` the record
//! count per batch. The response envelope is
//! `{ "index_attempts": [...], "total_count": N }`.

use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::error::FetchError;
use crate::fetcher::{BatchPayload, BoxFuture, PageSource};

/// Lifecycle states of an indexing attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IndexAttemptStatus {
    Success,
    Failed,
    Canceled,
    InProgress,
    NotStarted,
}

/// One indexing attempt as reported by the backing API.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct IndexAttempt {
    pub id: i64,

    /// Absent while the attempt has not been picked up by a worker.
    pub status: Option<IndexAttemptStatus>,

    pub new_docs_indexed: u64,
    pub docs_removed_from_index: u64,
    pub total_docs_indexed: u64,

    pub error_msg: Option<String>,
    pub full_exception_trace: Option<String>,

    pub time_started: Option<DateTime<Utc>>,
    pub time_updated: DateTime<Utc>,
}

/// Wire envelope of the index-attempts endpoint.
#[derive(Debug, Deserialize)]
struct AttemptEnvelope {
    index_attempts: Vec<IndexAttempt>,
    total_count: u64,
}

/// HTTP source for a connector's indexing-attempt history.
pub struct AttemptHistorySource {
    client: reqwest::Client,
    base_url: String,
}

impl AttemptHistorySource {
    /// Create a source rooted at a connector's info URL.
    ///
    /// # Arguments
    ///
    /// * `base_url` - resource root, e.g. `https://host/api/manage/admin/cc-pair/7`
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::Transport`] if the HTTP client cannot be
    /// built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, FetchError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| FetchError::Transport(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    fn batch_url(&self, page: usize, page_size: usize) -> String {
        format!(
            "{}/index-attempts?page={}&page_size={}",
            self.base_url, page, page_size
        )
    }
}

impl PageSource for AttemptHistorySource {
    type Record = IndexAttempt;

    fn fetch_batch(
        &self,
        page: usize,
        page_size: usize,
    ) -> BoxFuture<'_, Result<BatchPayload<IndexAttempt>, FetchError>> {
        Box::pin(async move {
            let url = self.batch_url(page, page_size);

            let response = self
                .client
                .get(&url)
                .send()
                .await
                .map_err(|e| FetchError::Transport(format!("request failed: {e}")))?;

            let status = response.status();
            if !status.is_success() {
                return Err(FetchError::Http {
                    status: status.as_u16(),
                });
            }

            let envelope: AttemptEnvelope = response
                .json()
                .await
                .map_err(|e| FetchError::MalformedResponse(e.to_string()))?;

            Ok(BatchPayload {
                records: envelope.index_attempts,
                total_records: envelope.total_count,
            })
        })
    }
}
