//! Deterministic fetcher replaying scripted outcomes.
//!
//! Used by the engine's tests and the runnable example: each scope label
//! is scripted with an ordered sequence of outcomes, replayed one per
//! fetch call. A scope with no remaining outcomes returns an empty page
//! (the end-of-results signal).

use crate::error::{FetchError, Result};
use crate::fetcher::PageFetcher;
use crate::listing::RawListing;
use crate::page::{Page, PageRequest};
use async_trait::async_trait;
use chine_search::SearchScope;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::Duration;

/// One scripted fetch outcome.
#[derive(Debug, Clone)]
pub enum ScriptedOutcome {
    /// A page of listings
    Page(Vec<RawListing>),
    /// Upstream rate limit
    RateLimited {
        /// Optional retry hint forwarded to the engine
        retry_after: Option<Duration>,
    },
    /// Transient failure (network error, 5xx)
    Transient(String),
    /// Fatal upstream rejection
    Fatal(String),
}

/// In-memory [`PageFetcher`] replaying scripted outcomes per scope label.
#[derive(Debug, Default)]
pub struct ScriptedFetcher {
    scripts: Mutex<HashMap<String, VecDeque<ScriptedOutcome>>>,
    calls: Mutex<HashMap<String, u32>>,
}

impl ScriptedFetcher {
    /// Create an empty scripted fetcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the outcome sequence for a scope label.
    #[must_use]
    pub fn with_script(
        self,
        label: impl Into<String>,
        outcomes: Vec<ScriptedOutcome>,
    ) -> Self {
        self.scripts
            .lock()
            .expect("scripts lock poisoned")
            .insert(label.into(), outcomes.into());
        self
    }

    /// Number of fetch calls made against a scope label.
    #[must_use]
    pub fn call_count(&self, label: &str) -> u32 {
        self.calls
            .lock()
            .expect("calls lock poisoned")
            .get(label)
            .copied()
            .unwrap_or(0)
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, scope: &SearchScope, request: &PageRequest) -> Result<Page> {
        *self
            .calls
            .lock()
            .expect("calls lock poisoned")
            .entry(scope.label.clone())
            .or_insert(0) += 1;

        let outcome = self
            .scripts
            .lock()
            .expect("scripts lock poisoned")
            .get_mut(&scope.label)
            .and_then(VecDeque::pop_front);

        tracing::trace!(
            scope = %scope.label,
            page = request.page,
            "Scripted fetch"
        );

        match outcome {
            Some(ScriptedOutcome::Page(listings)) => Ok(Page {
                listings,
                total: None,
                max_pages: None,
            }),
            Some(ScriptedOutcome::RateLimited { retry_after }) => {
                Err(FetchError::RateLimited { retry_after })
            }
            Some(ScriptedOutcome::Transient(detail)) => Err(FetchError::Transient(detail)),
            Some(ScriptedOutcome::Fatal(detail)) => Err(FetchError::Fatal(detail)),
            // Script exhausted: upstream has nothing more to report
            None => Ok(Page::default()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chine_core::ListingId;
    use chine_search::{resolve_scopes, SearchRequest};
    use chrono::Utc;

    fn listing(id: u64) -> RawListing {
        RawListing {
            id: ListingId::from(id),
            published_at: Utc::now(),
            indexed_at: None,
            payload: serde_json::json!({ "subject": "test" }),
        }
    }

    #[tokio::test]
    async fn test_replays_in_order_then_exhausts() {
        let scopes = resolve_scopes(&SearchRequest::default()).expect("resolve scopes");
        let scope = &scopes[0];

        let fetcher = ScriptedFetcher::new().with_script(
            scope.label.clone(),
            vec![
                ScriptedOutcome::Page(vec![listing(1), listing(2)]),
                ScriptedOutcome::Transient("reset".to_string()),
            ],
        );

        let request = PageRequest::new(1, 35);
        let page = fetcher.fetch(scope, &request).await.expect("first page");
        assert_eq!(page.listings.len(), 2);

        let err = fetcher.fetch(scope, &request).await.unwrap_err();
        assert!(matches!(err, FetchError::Transient(_)));

        let page = fetcher.fetch(scope, &request).await.expect("exhausted");
        assert!(page.is_empty());

        assert_eq!(fetcher.call_count(&scope.label), 3);
    }
}
