//! End-to-end engine tests over a scripted fetcher.

use chine_core::{ListingId, ScrapeConfig, StalePolicy};
use chine_fetch::{RawListing, ScriptedFetcher, ScriptedOutcome};
use chine_scraper::{ScrapeEngine, StopReason};
use chine_search::{LocationSpec, LocationType, SearchRequest};
use chrono::{Duration, Utc};
use std::sync::Arc;

fn fresh(id: u64) -> RawListing {
    listing(id, 1)
}

fn stale(id: u64) -> RawListing {
    listing(id, 30)
}

fn listing(id: u64, age_days: i64) -> RawListing {
    RawListing {
        id: ListingId::from(id),
        published_at: Utc::now() - Duration::days(age_days),
        indexed_at: None,
        payload: serde_json::json!({
            "subject": format!("listing {id}"),
            "price": 100,
        }),
    }
}

/// Base test config: freshness gate at 7 days, fast retries.
fn config() -> ScrapeConfig {
    let mut config = ScrapeConfig::default();
    config.freshness.max_age_days = 7;
    config.freshness.consecutive_stale_limit = 2;
    config.retry.base_delay_ms = 5;
    config
}

fn engine(
    script: Vec<ScriptedOutcome>,
    config: ScrapeConfig,
) -> (Arc<ScriptedFetcher>, ScrapeEngine<ScriptedFetcher>) {
    let fetcher = Arc::new(ScriptedFetcher::new().with_script("everywhere", script));
    let engine = ScrapeEngine::new(fetcher.clone(), config).expect("engine config");
    (fetcher, engine)
}

#[tokio::test]
async fn test_run_continues_while_stale_streak_within_limit() {
    // Two consecutive stale listings with a limit of two: the streak is
    // tolerated and pagination continues to the end of results.
    let (fetcher, engine) = engine(
        vec![
            ScriptedOutcome::Page(vec![fresh(1), fresh(2)]),
            ScriptedOutcome::Page(vec![stale(3), stale(4)]),
            ScriptedOutcome::Page(vec![fresh(5), fresh(6)]),
        ],
        config(),
    );

    let report = engine
        .run(&SearchRequest::default())
        .await
        .expect("scrape run");

    assert_eq!(fetcher.call_count("everywhere"), 4);
    assert_eq!(report.records.len(), 6);
    assert_eq!(report.stats.unique_emitted, 6);
    assert_eq!(report.stats.pages_fetched, 4);
    assert_eq!(report.stats.scopes[0].stop_reason, StopReason::EndOfResults);
    assert!(!report.stats.aborted);
}

#[tokio::test]
async fn test_stale_streak_past_limit_stops_after_full_page() {
    // Limit of one: the second consecutive stale listing trips the
    // early stop, but only after the whole page has been processed.
    let mut config = config();
    config.freshness.consecutive_stale_limit = 1;

    let (fetcher, engine) = engine(
        vec![
            ScriptedOutcome::Page(vec![fresh(1), fresh(2)]),
            ScriptedOutcome::Page(vec![stale(3), stale(4)]),
            ScriptedOutcome::Page(vec![fresh(5), fresh(6)]),
        ],
        config,
    );

    let report = engine
        .run(&SearchRequest::default())
        .await
        .expect("scrape run");

    assert_eq!(fetcher.call_count("everywhere"), 2);
    // Stale listings are still emitted under the default policy
    assert_eq!(report.records.len(), 4);
    assert_eq!(report.stats.scopes[0].stop_reason, StopReason::StaleLimit);
}

#[tokio::test]
async fn test_exclude_policy_drops_stale_listings() {
    let mut config = config();
    config.freshness.consecutive_stale_limit = 1;
    config.freshness.stale_policy = StalePolicy::Exclude;

    let (_, engine) = engine(
        vec![
            ScriptedOutcome::Page(vec![fresh(1), stale(2), stale(3)]),
        ],
        config,
    );

    let report = engine
        .run(&SearchRequest::default())
        .await
        .expect("scrape run");

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.records[0].id(), "1");
    assert_eq!(report.stats.scopes[0].listings_seen, 3);
    assert_eq!(report.stats.scopes[0].stop_reason, StopReason::StaleLimit);
}

#[tokio::test]
async fn test_disabled_gate_never_stale_stops() {
    let mut config = config();
    config.freshness.max_age_days = 0;
    config.freshness.consecutive_stale_limit = 1;

    let (fetcher, engine) = engine(
        vec![
            ScriptedOutcome::Page(vec![stale(1), stale(2)]),
            ScriptedOutcome::Page(vec![stale(3), stale(4)]),
        ],
        config,
    );

    let report = engine
        .run(&SearchRequest::default())
        .await
        .expect("scrape run");

    assert_eq!(fetcher.call_count("everywhere"), 3);
    assert_eq!(report.records.len(), 4);
    assert_eq!(report.stats.scopes[0].stop_reason, StopReason::EndOfResults);
}

#[tokio::test]
async fn test_exact_threshold_age_is_fresh() {
    // A listing exactly at the age boundary stays fresh, so a streak
    // of boundary listings never trips the limit.
    let mut config = config();
    config.freshness.consecutive_stale_limit = 1;

    let boundary = RawListing {
        id: ListingId::from(9u64),
        // Slightly inside the 7-day window to absorb test runtime
        published_at: Utc::now() - Duration::days(7) + Duration::seconds(5),
        indexed_at: None,
        payload: serde_json::json!({}),
    };

    let (_, engine) = engine(
        vec![ScriptedOutcome::Page(vec![boundary])],
        config,
    );

    let report = engine
        .run(&SearchRequest::default())
        .await
        .expect("scrape run");

    assert_eq!(report.records.len(), 1);
    assert_eq!(report.stats.scopes[0].stop_reason, StopReason::EndOfResults);
}

#[tokio::test]
async fn test_page_budget_caps_fetch_calls() {
    let mut config = config();
    config.pagination.max_pages = 2;

    let (fetcher, engine) = engine(
        vec![
            ScriptedOutcome::Page(vec![fresh(1)]),
            ScriptedOutcome::Page(vec![fresh(2)]),
            ScriptedOutcome::Page(vec![fresh(3)]),
        ],
        config,
    );

    let report = engine
        .run(&SearchRequest::default())
        .await
        .expect("scrape run");

    assert_eq!(fetcher.call_count("everywhere"), 2);
    assert_eq!(report.records.len(), 2);
    assert_eq!(report.stats.scopes[0].stop_reason, StopReason::PageBudget);
}

#[tokio::test]
async fn test_empty_first_page_ends_scope() {
    let (fetcher, engine) = engine(vec![], config());

    let report = engine
        .run(&SearchRequest::default())
        .await
        .expect("scrape run");

    assert_eq!(fetcher.call_count("everywhere"), 1);
    assert!(report.records.is_empty());
    assert_eq!(report.stats.pages_fetched, 1);
    assert_eq!(report.stats.scopes[0].stop_reason, StopReason::EndOfResults);
}

#[tokio::test]
async fn test_duplicate_across_pages_emitted_once() {
    let (_, engine) = engine(
        vec![
            ScriptedOutcome::Page(vec![fresh(1), fresh(2)]),
            ScriptedOutcome::Page(vec![fresh(2), fresh(3)]),
        ],
        config(),
    );

    let report = engine
        .run(&SearchRequest::default())
        .await
        .expect("scrape run");

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.stats.total_seen, 4);
    assert_eq!(report.stats.unique_emitted, 3);
    assert_eq!(report.stats.duplicates, 1);

    let ids: Vec<&str> = report.records.iter().map(|r| r.id()).collect();
    assert_eq!(ids, vec!["1", "2", "3"]);
}

#[tokio::test]
async fn test_duplicates_do_not_reset_stale_streak() {
    // A re-sent fresh listing is skipped before the freshness gate, so
    // it cannot break a stale streak that should stop the scope.
    let mut config = config();
    config.freshness.consecutive_stale_limit = 1;

    let (fetcher, engine) = engine(
        vec![
            ScriptedOutcome::Page(vec![fresh(1)]),
            ScriptedOutcome::Page(vec![stale(2), fresh(1), stale(3)]),
            ScriptedOutcome::Page(vec![fresh(4)]),
        ],
        config,
    );

    let report = engine
        .run(&SearchRequest::default())
        .await
        .expect("scrape run");

    assert_eq!(fetcher.call_count("everywhere"), 2);
    assert_eq!(report.stats.duplicates, 1);
    assert_eq!(report.stats.scopes[0].stop_reason, StopReason::StaleLimit);
}

#[tokio::test]
async fn test_transient_failure_retried_then_succeeds() {
    let (fetcher, engine) = engine(
        vec![
            ScriptedOutcome::Transient("connection reset".to_string()),
            ScriptedOutcome::Page(vec![fresh(1)]),
        ],
        config(),
    );

    let report = engine
        .run(&SearchRequest::default())
        .await
        .expect("scrape run");

    // First page took two attempts, then the exhausted script ended the scope
    assert_eq!(fetcher.call_count("everywhere"), 3);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.stats.errors, 0);
    assert_eq!(report.stats.scopes[0].stop_reason, StopReason::EndOfResults);
}

#[tokio::test]
async fn test_rate_limit_retried_with_hint() {
    let (fetcher, engine) = engine(
        vec![
            ScriptedOutcome::RateLimited {
                retry_after: Some(std::time::Duration::from_millis(10)),
            },
            ScriptedOutcome::Page(vec![fresh(1)]),
        ],
        config(),
    );

    let report = engine
        .run(&SearchRequest::default())
        .await
        .expect("scrape run");

    assert_eq!(fetcher.call_count("everywhere"), 3);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.stats.errors, 0);
}

#[tokio::test]
async fn test_retries_exhausted_stops_scope_with_error() {
    let (fetcher, engine) = engine(
        vec![
            ScriptedOutcome::Transient("reset".to_string()),
            ScriptedOutcome::Transient("reset".to_string()),
            ScriptedOutcome::Transient("reset".to_string()),
        ],
        config(),
    );

    let report = engine
        .run(&SearchRequest::default())
        .await
        .expect("scrape run");

    assert_eq!(fetcher.call_count("everywhere"), 3);
    assert!(report.records.is_empty());
    assert_eq!(report.stats.errors, 1);
    assert_eq!(report.stats.scopes[0].stop_reason, StopReason::Error);
    assert!(report.stats.scopes[0].error.is_some());
}

#[tokio::test]
async fn test_fatal_failure_stops_scope_without_retry() {
    let (fetcher, engine) = engine(
        vec![ScriptedOutcome::Fatal("blocked".to_string())],
        config(),
    );

    let report = engine
        .run(&SearchRequest::default())
        .await
        .expect("scrape run");

    assert_eq!(fetcher.call_count("everywhere"), 1);
    assert_eq!(report.stats.errors, 1);
    assert_eq!(report.stats.scopes[0].stop_reason, StopReason::Fatal);
}

fn city(name: &str, lat: f64, lng: f64) -> LocationSpec {
    LocationSpec::City {
        name: name.to_string(),
        lat,
        lng,
        radius_m: 10_000,
    }
}

fn two_city_request() -> SearchRequest {
    SearchRequest {
        location_type: LocationType::City,
        locations: vec![city("Paris", 48.8566, 2.3522), city("Lyon", 45.7640, 4.8357)],
        ..SearchRequest::default()
    }
}

#[tokio::test]
async fn test_fingerprints_shared_across_scopes() {
    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .with_script(
                "Paris (10km)",
                vec![ScriptedOutcome::Page(vec![fresh(1), fresh(2)])],
            )
            .with_script(
                "Lyon (10km)",
                vec![ScriptedOutcome::Page(vec![fresh(2), fresh(3)])],
            ),
    );
    let engine = ScrapeEngine::new(fetcher, config()).expect("engine config");

    let report = engine
        .run(&two_city_request())
        .await
        .expect("scrape run");

    assert_eq!(report.records.len(), 3);
    assert_eq!(report.stats.duplicates, 1);
    assert_eq!(report.stats.scopes_processed, 2);
}

#[tokio::test]
async fn test_error_threshold_skips_remaining_scopes() {
    let mut config = config();
    config.run.error_threshold = 1;

    let fetcher = Arc::new(
        ScriptedFetcher::new()
            .with_script(
                "Paris (10km)",
                vec![ScriptedOutcome::Fatal("blocked".to_string())],
            )
            .with_script(
                "Lyon (10km)",
                vec![ScriptedOutcome::Page(vec![fresh(1)])],
            ),
    );
    let engine = ScrapeEngine::new(fetcher.clone(), config).expect("engine config");

    let report = engine
        .run(&two_city_request())
        .await
        .expect("scrape run");

    assert!(report.stats.aborted);
    assert_eq!(report.stats.errors, 1);
    assert_eq!(fetcher.call_count("Lyon (10km)"), 0);
    assert_eq!(report.stats.stopped_for(StopReason::Skipped).len(), 1);
    // Skipped scopes are recorded but not counted as processed
    assert_eq!(report.stats.scopes_processed, 1);
}

#[tokio::test]
async fn test_invalid_request_rejected_before_fetching() {
    let fetcher = Arc::new(ScriptedFetcher::new());
    let engine = ScrapeEngine::new(fetcher.clone(), config()).expect("engine config");

    let request = SearchRequest {
        location_type: LocationType::City,
        ..SearchRequest::default()
    };
    assert!(engine.run(&request).await.is_err());
    assert_eq!(fetcher.call_count("everywhere"), 0);
}
