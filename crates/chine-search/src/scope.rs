//! Resolved search scopes.

use crate::filters::Filters;
use crate::location::LocationSpec;
use crate::request::{AdType, Category, OwnerType, PriceRange, Sort};
use serde::{Deserialize, Serialize};
use std::fmt;

/// One resolved (location, filter) combination the engine pages through
/// independently.
///
/// Immutable once constructed by the resolver. The label appears in
/// output provenance and log lines.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchScope {
    /// Human-readable label, e.g. "Nanterre (10km)"
    pub label: String,
    /// The geographic constraint for this scope
    pub location: LocationSpec,
    /// Category searched
    pub category: Category,
    /// Free-text query
    pub text: Option<String>,
    /// Structured filters, passed through to the fetcher
    pub filters: Filters,
    /// Price bounds
    pub price: Option<PriceRange>,
    /// Result ordering
    pub sort: Sort,
    /// Offer vs. demand
    pub ad_type: AdType,
    /// Seller kind
    pub owner_type: OwnerType,
}

impl fmt::Display for SearchScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label)
    }
}
