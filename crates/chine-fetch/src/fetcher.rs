//! The page fetcher boundary trait.

use crate::error::Result;
use crate::page::{Page, PageRequest};
use async_trait::async_trait;
use chine_search::SearchScope;

/// Trait for page fetcher implementations.
///
/// The concrete transport (HTTP client, browser automation, recorded
/// fixtures) lives behind this trait. Implementations must be
/// thread-safe (`Send + Sync`) for use by the scope worker pool.
///
/// One call returns one page of raw listings; an empty page is the
/// end-of-results signal. Failures use the [`crate::FetchError`]
/// taxonomy, which drives the engine's retry policy.
#[async_trait]
pub trait PageFetcher: Send + Sync {
    /// Fetch one page of listings for a scope.
    ///
    /// # Errors
    /// Returns a [`crate::FetchError`] describing whether the failure
    /// is retryable.
    async fn fetch(&self, scope: &SearchScope, request: &PageRequest) -> Result<Page>;
}
