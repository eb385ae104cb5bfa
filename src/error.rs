//! Error types for batch fetching.

use thiserror::Error;

/// Errors produced by a failed batch fetch.
///
/// Fetch errors never cross component boundaries as panics or early
/// returns from the scheduler; they are caught inside the fetcher and
/// parked in a shared last-error slot for the view to surface. The
/// variants are `Clone` so the stored error can be handed out on every
/// read without consuming the slot.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum FetchError {
    /// The backing endpoint answered with a non-success status.
    #[error("HTTP status {status} from backing endpoint")]
    Http {
        /// The HTTP status code received.
        status: u16,
    },

    /// The request never completed (connect failure, timeout, TLS error).
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was missing expected fields or was not valid
    /// JSON.
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_includes_status() {
        let err = FetchError::Http { status: 500 };
        assert!(format!("{}", err).contains("500"));
    }

    #[test]
    fn test_errors_are_cloneable() {
        let err = FetchError::Transport("connection reset".into());
        let copy = err.clone();
        assert_eq!(err, copy);
    }
}
