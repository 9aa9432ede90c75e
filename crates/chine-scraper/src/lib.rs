//! Scrape orchestration for chine.
//!
//! This crate drives a full scrape run: it resolves a search request
//! into scopes, paginates each scope through a [`PageFetcher`], gates
//! listings on freshness, deduplicates across scopes by fingerprint,
//! normalizes raw listings into flat records, and accumulates run
//! statistics with a per-scope stop reason.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod context;
pub mod engine;
#[allow(missing_docs)]
pub mod error;
pub mod fingerprint;
pub mod freshness;
pub mod normalizer;
pub mod sink;
pub mod stats;

pub use context::RunContext;
pub use engine::{ScrapeEngine, ScrapeReport};
pub use error::{Result, ScrapeError};
pub use fingerprint::FingerprintSet;
pub use freshness::{Freshness, FreshnessGate, FreshnessState};
pub use normalizer::{NormalizedRecord, Normalizer};
pub use sink::{CollectingSink, RecordSink};
pub use stats::{RunStats, ScopeOutcome, StopReason};

// Re-exported for engine construction without a direct chine-fetch dep.
pub use chine_fetch::PageFetcher;
