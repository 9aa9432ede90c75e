//! Run statistics and scope outcomes.
//!
//! Every stop reason, at any level, lands here rather than only in logs
//! so callers can distinguish "finished" from "stopped early"
//! programmatically.

use chine_core::RunId;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why a scope stopped paginating.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum StopReason {
    /// Upstream returned an empty page
    EndOfResults,
    /// Consecutive-stale limit tripped
    StaleLimit,
    /// Configured page budget reached
    PageBudget,
    /// Transient failures exhausted the retry ceiling
    Error,
    /// Upstream rejected the request outright
    Fatal,
    /// Run-level cancellation interrupted the scope
    Aborted,
    /// Scope never started because the run aborted first
    Skipped,
}

impl fmt::Display for StopReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            StopReason::EndOfResults => "end-of-results",
            StopReason::StaleLimit => "stale-limit",
            StopReason::PageBudget => "page-budget",
            StopReason::Error => "error",
            StopReason::Fatal => "fatal",
            StopReason::Aborted => "aborted",
            StopReason::Skipped => "skipped",
        };
        write!(f, "{s}")
    }
}

impl StopReason {
    /// Whether this outcome counts toward the run error threshold.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, StopReason::Error | StopReason::Fatal)
    }
}

/// Result of scraping a single scope.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScopeOutcome {
    /// Scope label, matching the records' provenance tag
    pub label: String,
    /// Why pagination stopped
    pub stop_reason: StopReason,
    /// Pages fetched successfully for this scope
    pub pages_fetched: u32,
    /// Listings seen (before dedup)
    pub listings_seen: u64,
    /// Records emitted from this scope
    pub emitted: u64,
    /// Duplicates skipped in this scope
    pub duplicates: u64,
    /// Total matching listings advertised by the upstream, if reported
    pub advertised_total: Option<u64>,
    /// Error detail when the stop reason is error/fatal
    pub error: Option<String>,
}

impl ScopeOutcome {
    /// Fresh outcome for a scope that has not fetched anything yet.
    #[must_use]
    pub fn new(label: impl Into<String>, stop_reason: StopReason) -> Self {
        Self {
            label: label.into(),
            stop_reason,
            pages_fetched: 0,
            listings_seen: 0,
            emitted: 0,
            duplicates: 0,
            advertised_total: None,
            error: None,
        }
    }
}

/// Counters accumulated across a whole run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunStats {
    /// Identifier of this run
    pub run_id: RunId,
    /// Listings seen across all scopes, before dedup
    pub total_seen: u64,
    /// Unique records emitted
    pub unique_emitted: u64,
    /// Duplicates skipped
    pub duplicates: u64,
    /// Pages fetched successfully
    pub pages_fetched: u64,
    /// Scopes that ran to a stop reason (including early stops)
    pub scopes_processed: u32,
    /// Scope-level errors encountered
    pub errors: u32,
    /// Whether the run was cut short (cancellation or error threshold)
    pub aborted: bool,
    /// Per-scope outcomes in processing order
    pub scopes: Vec<ScopeOutcome>,
}

impl RunStats {
    /// Empty stats for a new run.
    #[must_use]
    pub fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            total_seen: 0,
            unique_emitted: 0,
            duplicates: 0,
            pages_fetched: 0,
            scopes_processed: 0,
            errors: 0,
            aborted: false,
            scopes: Vec::new(),
        }
    }

    /// Fold a finished scope's outcome into the run counters.
    pub fn absorb(&mut self, outcome: ScopeOutcome) {
        self.total_seen += outcome.listings_seen;
        self.unique_emitted += outcome.emitted;
        self.duplicates += outcome.duplicates;
        self.pages_fetched += u64::from(outcome.pages_fetched);
        if outcome.stop_reason != StopReason::Skipped {
            self.scopes_processed += 1;
        }
        if outcome.stop_reason.is_error() {
            self.errors += 1;
        }
        self.scopes.push(outcome);
    }

    /// Outcomes that stopped for the given reason.
    #[must_use]
    pub fn stopped_for(&self, reason: StopReason) -> Vec<&ScopeOutcome> {
        self.scopes
            .iter()
            .filter(|o| o.stop_reason == reason)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stop_reason_display() {
        assert_eq!(StopReason::EndOfResults.to_string(), "end-of-results");
        assert_eq!(StopReason::StaleLimit.to_string(), "stale-limit");
    }

    #[test]
    fn test_stop_reason_serde() {
        let json = serde_json::to_string(&StopReason::PageBudget).expect("serialize");
        assert_eq!(json, "\"page-budget\"");
    }

    #[test]
    fn test_absorb_accumulates() {
        let mut stats = RunStats::new(RunId::generate());

        let mut outcome = ScopeOutcome::new("Paris (10km)", StopReason::EndOfResults);
        outcome.pages_fetched = 3;
        outcome.listings_seen = 70;
        outcome.emitted = 68;
        outcome.duplicates = 2;
        stats.absorb(outcome);

        let mut outcome = ScopeOutcome::new("Lyon (10km)", StopReason::Fatal);
        outcome.error = Some("invalid scope".to_string());
        stats.absorb(outcome);

        stats.absorb(ScopeOutcome::new("Nantes (10km)", StopReason::Skipped));

        assert_eq!(stats.total_seen, 70);
        assert_eq!(stats.unique_emitted, 68);
        assert_eq!(stats.duplicates, 2);
        assert_eq!(stats.pages_fetched, 3);
        assert_eq!(stats.scopes_processed, 2);
        assert_eq!(stats.errors, 1);
        assert_eq!(stats.stopped_for(StopReason::Skipped).len(), 1);
    }
}
