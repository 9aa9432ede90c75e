//! The declarative search request consumed by the scrape engine.

use crate::error::{Result, SearchError};
use crate::filters::Filters;
use crate::location::{LocationSpec, LocationType};
use serde::{Deserialize, Serialize};

/// Top-level marketplace category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    /// All categories
    #[default]
    All,
    /// Jobs
    Emploi,
    /// Vehicles
    Vehicules,
    /// Real estate
    Immobilier,
    /// Holiday rentals
    Vacances,
    /// Electronics and multimedia
    Multimedia,
    /// Home and garden
    Maison,
    /// Family and baby equipment
    Famille,
    /// Clothing and fashion
    Mode,
    /// Hobbies and leisure
    Loisirs,
    /// Animals
    Animaux,
    /// Professional equipment
    MaterielProfessionnel,
    /// Services
    Services,
    /// Donations
    Dons,
    /// Miscellaneous
    Divers,
}

/// Result ordering requested from the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sort {
    /// Most recent first (the default; freshness early-stop assumes it)
    #[default]
    Newest,
    /// Cheapest first
    Cheapest,
    /// Most expensive first
    Expensive,
    /// Upstream relevance ranking
    Relevance,
}

/// Whether listings are offers or requests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AdType {
    /// Items offered for sale/rent
    #[default]
    Offer,
    /// Wanted ads
    Demand,
}

/// Seller kind filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OwnerType {
    /// Both private and professional sellers
    #[default]
    All,
    /// Private sellers only
    Private,
    /// Professional sellers only
    Pro,
}

/// Inclusive price bounds in whole currency units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceRange {
    /// Lower bound
    pub min: u64,
    /// Upper bound
    pub max: u64,
}

impl PriceRange {
    /// Validate that the bounds are ordered.
    pub fn validate(&self) -> Result<()> {
        if self.min > self.max {
            Err(SearchError::InvalidPriceRange {
                min: self.min,
                max: self.max,
            })
        } else {
            Ok(())
        }
    }
}

/// A declarative search request.
///
/// The engine consumes this verbatim; filters and proxy settings are
/// passed through to the page fetcher without interpretation.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchRequest {
    /// Marketplace category to search
    pub category: Category,
    /// Free-text query
    pub text: Option<String>,
    /// Declared location mode
    pub location_type: LocationType,
    /// Location descriptors, one scope each, in priority order
    pub locations: Vec<LocationSpec>,
    /// Category-specific structured filters, passed through opaquely
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

impl SearchRequest {
    /// Validate the request without touching the network.
    ///
    /// Checks price bounds and every structured filter. Location
    /// descriptors are validated by the resolver, which also checks
    /// them against [`SearchRequest::location_type`].
    pub fn validate(&self) -> Result<()> {
        if let Some(price) = &self.price {
            price.validate()?;
        }
        self.filters.validate()?;
        Ok(())
    }
}
