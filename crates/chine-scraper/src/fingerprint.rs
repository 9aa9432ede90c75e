//! The fingerprint store backing deduplication.

use chine_core::ListingId;
use std::collections::HashSet;

/// Set of listing identifiers already emitted in the current run.
///
/// Scoped to one run: created at run start, discarded at run end. No
/// cross-run persistence, so repeated runs may re-emit previously seen
/// listings; persistence, if desired, belongs to the consuming layer.
#[derive(Debug, Default)]
pub struct FingerprintSet {
    seen: HashSet<ListingId>,
}

impl FingerprintSet {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this identifier was already recorded. O(1) amortized.
    #[must_use]
    pub fn seen(&self, id: &ListingId) -> bool {
        self.seen.contains(id)
    }

    /// Record an identifier. O(1) amortized.
    pub fn record(&mut self, id: ListingId) {
        self.seen.insert(id);
    }

    /// Record an identifier, returning `true` if it was new.
    pub fn insert(&mut self, id: ListingId) -> bool {
        self.seen.insert(id)
    }

    /// Number of recorded identifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.seen.len()
    }

    /// Whether the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.seen.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_seen_and_record() {
        let mut set = FingerprintSet::new();
        let id = ListingId::from(42u64);

        assert!(!set.seen(&id));
        set.record(id.clone());
        assert!(set.seen(&id));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_insert_reports_novelty() {
        let mut set = FingerprintSet::new();
        let id = ListingId::from(42u64);

        assert!(set.insert(id.clone()));
        assert!(!set.insert(id));
        assert_eq!(set.len(), 1);
    }
}
