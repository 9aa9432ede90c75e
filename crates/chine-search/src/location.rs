//! Location descriptors and their validation.
//!
//! A search runs against zero or more discrete geographic scopes. Each
//! scope is described by one [`LocationSpec`] variant; the resolver
//! checks every descriptor against the declared [`LocationType`] before
//! any network call is made.

use crate::error::{Result, SearchError};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Declared location mode of a search request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LocationType {
    /// No geographic constraint; the whole marketplace
    #[default]
    None,
    /// City with coordinates and search radius
    City,
    /// Administrative department
    Department,
    /// Administrative region
    Region,
}

impl fmt::Display for LocationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            LocationType::None => "none",
            LocationType::City => "city",
            LocationType::Department => "department",
            LocationType::Region => "region",
        };
        write!(f, "{s}")
    }
}

/// One geographic search constraint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LocationSpec {
    /// No geographic constraint
    None,
    /// City with coordinates and a radius in meters
    City {
        /// City name, used in the scope label
        name: String,
        /// Latitude in degrees
        lat: f64,
        /// Longitude in degrees
        lng: f64,
        /// Search radius in meters; 0 means exact city only
        radius_m: u32,
    },
    /// French department by code (e.g. "75", "2A", "971")
    Department {
        /// Department code
        code: String,
    },
    /// Region by name
    Region {
        /// Region name
        name: String,
    },
}

// Metropolitan codes 01-95 incl. Corsican 2A/2B, overseas 971-989.
static DEPARTMENT_CODE_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\d{2}|2[AB]|9[78]\d)$").expect("valid regex"));

impl LocationSpec {
    /// The [`LocationType`] this descriptor belongs to.
    #[must_use]
    pub fn location_type(&self) -> LocationType {
        match self {
            LocationSpec::None => LocationType::None,
            LocationSpec::City { .. } => LocationType::City,
            LocationSpec::Department { .. } => LocationType::Department,
            LocationSpec::Region { .. } => LocationType::Region,
        }
    }

    /// Validate the descriptor's fields.
    ///
    /// A descriptor missing required fields for its variant is rejected
    /// here, before any fetch happens.
    pub fn validate(&self) -> Result<()> {
        match self {
            LocationSpec::None => Ok(()),
            LocationSpec::City {
                name,
                lat,
                lng,
                radius_m: _,
            } => {
                if name.trim().is_empty() {
                    return Err(SearchError::InvalidLocation {
                        reason: "city name cannot be empty".to_string(),
                    });
                }
                if !lat.is_finite() || !(-90.0..=90.0).contains(lat) {
                    return Err(SearchError::InvalidLocation {
                        reason: format!("latitude out of range: {lat}"),
                    });
                }
                if !lng.is_finite() || !(-180.0..=180.0).contains(lng) {
                    return Err(SearchError::InvalidLocation {
                        reason: format!("longitude out of range: {lng}"),
                    });
                }
                Ok(())
            }
            LocationSpec::Department { code } => {
                if DEPARTMENT_CODE_REGEX.is_match(code) {
                    Ok(())
                } else {
                    Err(SearchError::InvalidLocation {
                        reason: format!("invalid department code '{code}'"),
                    })
                }
            }
            LocationSpec::Region { name } => {
                if name.trim().is_empty() {
                    Err(SearchError::InvalidLocation {
                        reason: "region name cannot be empty".to_string(),
                    })
                } else {
                    Ok(())
                }
            }
        }
    }

    /// Human-readable label used in output provenance.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            LocationSpec::None => "everywhere".to_string(),
            LocationSpec::City { name, radius_m, .. } => {
                if *radius_m == 0 {
                    name.clone()
                } else {
                    format!("{name} ({}km)", radius_m / 1000)
                }
            }
            LocationSpec::Department { code } => format!("department {code}"),
            LocationSpec::Region { name } => format!("region {name}"),
        }
    }
}
