//! Raw listings as returned by the upstream search API.

use chine_core::ListingId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One raw listing from a search page.
///
/// The payload is opaque to the engine; only the identifier and the
/// recency timestamps are interpreted. Everything else flows through
/// the normalizer's field whitelist.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawListing {
    /// Unique listing identifier (deduplication key)
    pub id: ListingId,
    /// First publication timestamp
    pub published_at: DateTime<Utc>,
    /// Last index/update timestamp, when the upstream provides one
    pub indexed_at: Option<DateTime<Utc>>,
    /// Opaque raw payload (a JSON object of marketplace fields)
    pub payload: serde_json::Value,
}

impl RawListing {
    /// The recency timestamp the freshness gate evaluates.
    ///
    /// Index/update time when present, first publication otherwise.
    #[must_use]
    pub fn recency(&self) -> DateTime<Utc> {
        self.indexed_at.unwrap_or(self.published_at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_recency_prefers_index_date() {
        let published = Utc.with_ymd_and_hms(2026, 8, 1, 12, 0, 0).unwrap();
        let indexed = Utc.with_ymd_and_hms(2026, 8, 20, 9, 30, 0).unwrap();

        let listing = RawListing {
            id: ListingId::from(1u64),
            published_at: published,
            indexed_at: Some(indexed),
            payload: serde_json::json!({}),
        };
        assert_eq!(listing.recency(), indexed);

        let listing = RawListing {
            indexed_at: None,
            ..listing
        };
        assert_eq!(listing.recency(), published);
    }
}
