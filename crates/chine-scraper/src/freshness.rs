//! The freshness gate and its per-scope rolling state.

use chine_core::FreshnessConfig;
use chrono::{DateTime, Duration, Utc};

/// Classification of a listing's recency.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
    /// Within the configured window (or the gate is disabled)
    Fresh,
    /// Older than the configured window
    Stale,
}

/// Decides whether a listing is too old relative to the configured
/// maximum age.
///
/// The boundary is inclusive: a listing exactly at the threshold age is
/// fresh. When disabled (`max_age_days = 0`), every listing is fresh and
/// no scope ever stops for staleness.
#[derive(Debug, Clone, Copy)]
pub struct FreshnessGate {
    max_age: Option<Duration>,
}

impl FreshnessGate {
    /// Build the gate from configuration; `max_age_days = 0` disables it.
    #[must_use]
    pub fn from_config(config: &FreshnessConfig) -> Self {
        Self {
            max_age: match config.max_age_days {
                0 => None,
                days => Some(Duration::days(i64::from(days))),
            },
        }
    }

    /// A disabled gate that classifies everything fresh.
    #[must_use]
    pub fn disabled() -> Self {
        Self { max_age: None }
    }

    /// Whether the gate enforces an age window.
    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.max_age.is_some()
    }

    /// Classify a listing by its recency timestamp.
    #[must_use]
    pub fn classify(&self, recency: DateTime<Utc>, now: DateTime<Utc>) -> Freshness {
        match self.max_age {
            None => Freshness::Fresh,
            Some(max_age) => {
                // Inclusive boundary: age == max_age is still fresh.
                if now - recency <= max_age {
                    Freshness::Fresh
                } else {
                    Freshness::Stale
                }
            }
        }
    }
}

/// Rolling consecutive-stale counter for one scope.
///
/// Tolerates up to the configured limit of back-to-back stale listings;
/// the listing after that trips the scope's early stop. Reset whenever
/// a listing passes the freshness check. Duplicates never touch this
/// state.
#[derive(Debug, Default)]
pub struct FreshnessState {
    consecutive: u32,
}

impl FreshnessState {
    /// Fresh state with a zeroed counter.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one stale listing, returning the new consecutive count.
    pub fn record_stale(&mut self) -> u32 {
        self.consecutive += 1;
        self.consecutive
    }

    /// Reset the counter after a fresh listing.
    pub fn reset(&mut self) {
        self.consecutive = 0;
    }

    /// Current consecutive-stale count.
    #[must_use]
    pub fn consecutive(&self) -> u32 {
        self.consecutive
    }
}
