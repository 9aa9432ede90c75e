use std::time::Duration;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Terminal signals a page fetch can produce besides a page of listings.
///
/// The engine maps these onto its retry policy: rate limits, transient
/// failures, and timeouts are retried with backoff; fatal errors stop
/// the scope immediately.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("rate limited by upstream{}", retry_hint(.retry_after))]
    RateLimited {
        /// Upstream-suggested wait before retrying, if it sent one
        retry_after: Option<Duration>,
    },

    #[error("transient fetch failure: {0}")]
    Transient(String),

    #[error("fetch timed out after {0:?}")]
    Timeout(Duration),

    #[error("upstream rejected the request: {0}")]
    Fatal(String),
}

impl FetchError {
    /// Whether the engine should retry this failure with backoff.
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        !matches!(self, FetchError::Fatal(_))
    }

    /// Whether this failure came from upstream rate limiting.
    #[must_use]
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, FetchError::RateLimited { .. })
    }
}

fn retry_hint(retry_after: &Option<Duration>) -> String {
    match retry_after {
        Some(d) => format!(", retry after {d:?}"),
        None => String::new(),
    }
}
