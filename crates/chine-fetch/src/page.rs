//! Page requests and fetched pages.

use crate::listing::RawListing;
use chine_core::MAX_PAGE_SIZE;
use serde::{Deserialize, Serialize};

/// One page fetch against a scope.
///
/// Created per fetch call and discarded after use. Page indexes are
/// 1-based; the offset is derived for fetchers that paginate by cursor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    /// Page index, 1-based
    pub page: u32,
    /// Listings requested, clamped to the upstream maximum
    pub page_size: u32,
}

impl PageRequest {
    /// Build a request for the given 1-based page index.
    ///
    /// `page_size` is clamped to [`MAX_PAGE_SIZE`]; a zero page index is
    /// normalized to 1.
    #[must_use]
    pub fn new(page: u32, page_size: u32) -> Self {
        Self {
            page: page.max(1),
            page_size: page_size.clamp(1, MAX_PAGE_SIZE),
        }
    }

    /// Zero-based listing offset for cursor-style pagination.
    #[must_use]
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.page_size)
    }
}

/// A successfully fetched page of listings.
///
/// An empty listing vector is the end-of-results signal.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Page {
    /// Listings in upstream order; may be empty
    pub listings: Vec<RawListing>,
    /// Total matching listings advertised by the upstream, if reported
    pub total: Option<u64>,
    /// Total pages advertised by the upstream, if reported
    pub max_pages: Option<u32>,
}

impl Page {
    /// Whether this page signals end-of-results.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.listings.is_empty()
    }
}
