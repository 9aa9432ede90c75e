//! Shared per-run state threaded through every scope worker.
//!
//! The fingerprint set and run statistics are explicit, synchronized
//! values constructed at run start and discarded at run end — never
//! ambient globals. Lock scopes are short and never held across await
//! points, so plain std mutexes are sufficient.

use crate::fingerprint::FingerprintSet;
use crate::stats::{RunStats, ScopeOutcome};
use chine_core::{ListingId, RunId};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;

/// Shared state for one scrape run.
#[derive(Debug)]
pub struct RunContext {
    run_id: RunId,
    fingerprints: Mutex<FingerprintSet>,
    stats: Mutex<RunStats>,
    aborted: AtomicBool,
}

impl RunContext {
    /// Create fresh state for a new run.
    #[must_use]
    pub fn new() -> Self {
        let run_id = RunId::generate();
        Self {
            run_id: run_id.clone(),
            fingerprints: Mutex::new(FingerprintSet::new()),
            stats: Mutex::new(RunStats::new(run_id)),
            aborted: AtomicBool::new(false),
        }
    }

    /// This run's identifier.
    #[must_use]
    pub fn run_id(&self) -> &RunId {
        &self.run_id
    }

    /// Record a listing identifier, returning `true` if it was new.
    ///
    /// The check-and-record is a single operation under the lock, so
    /// two scope workers can never both claim the same identifier.
    pub fn claim_fingerprint(&self, id: ListingId) -> bool {
        self.fingerprints
            .lock()
            .expect("fingerprint lock poisoned")
            .insert(id)
    }

    /// Fold a finished scope into the run stats, returning the new
    /// error total for threshold checks.
    pub fn absorb_outcome(&self, outcome: ScopeOutcome) -> u32 {
        let mut stats = self.stats.lock().expect("stats lock poisoned");
        stats.absorb(outcome);
        stats.errors
    }

    /// Flag the run as aborted (error threshold or cancellation).
    pub fn mark_aborted(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    /// Whether the run has been flagged as aborted.
    #[must_use]
    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }

    /// Snapshot the final stats, carrying the abort flag.
    #[must_use]
    pub fn finalize(&self) -> RunStats {
        let mut stats = self.stats.lock().expect("stats lock poisoned").clone();
        stats.aborted = self.is_aborted();
        stats
    }
}

impl Default for RunContext {
    fn default() -> Self {
        Self::new()
    }
}
