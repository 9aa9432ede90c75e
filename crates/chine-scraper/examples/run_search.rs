//! Run a scripted scrape end to end and print the emitted records.
//!
//! ```sh
//! RUST_LOG=chine_scraper=debug cargo run -p chine-scraper --example run_search
//! ```

use chine_core::{ListingId, ScrapeConfig};
use chine_fetch::{ProxySettings, RawListing, ScriptedFetcher, ScriptedOutcome};
use chine_scraper::ScrapeEngine;
use chine_search::{LocationSpec, LocationType, SearchRequest};
use chrono::{Duration, Utc};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

fn listing(id: u64, subject: &str, price: u64, age_days: i64) -> RawListing {
    RawListing {
        id: ListingId::from(id),
        published_at: Utc::now() - Duration::days(age_days),
        indexed_at: None,
        payload: serde_json::json!({
            "subject": subject,
            "price": price,
            "url": format!("https://example.com/ad/{id}"),
            "location": { "city": "Nanterre", "zipcode": "92000" },
        }),
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let fetcher = Arc::new(ScriptedFetcher::new().with_script(
        "Nanterre (10km)",
        vec![
            ScriptedOutcome::Page(vec![
                listing(101, "Studio meublé 25m2", 780, 1),
                listing(102, "T2 lumineux proche RER", 950, 2),
            ]),
            ScriptedOutcome::Page(vec![
                listing(103, "Chambre chez l'habitant", 450, 12),
                listing(102, "T2 lumineux proche RER", 950, 2),
            ]),
        ],
    ));

    let mut config = ScrapeConfig::load_with_env()?;
    config.freshness.max_age_days = 7;
    config.freshness.consecutive_stale_limit = 2;

    // A network-backed fetcher would take these at construction; the
    // scripted one has no transport to route through.
    if let Some(proxy) = config.proxy.as_ref().map(ProxySettings::from) {
        tracing::info!(host = %proxy.host, port = proxy.port, "Routing through proxy");
    }

    let request = SearchRequest {
        location_type: LocationType::City,
        locations: vec![LocationSpec::City {
            name: "Nanterre".to_string(),
            lat: 48.8924,
            lng: 2.2071,
            radius_m: 10_000,
        }],
        ..SearchRequest::default()
    };

    let engine = ScrapeEngine::new(fetcher, config)?;
    let report = engine.run(&request).await?;

    for record in &report.records {
        println!("{}", serde_json::to_string_pretty(record)?);
    }
    println!(
        "run {}: {} unique, {} duplicates, {} pages",
        report.stats.run_id,
        report.stats.unique_emitted,
        report.stats.duplicates,
        report.stats.pages_fetched
    );
    Ok(())
}
