//! The open filter map passed through to the page fetcher.
//!
//! Filters vary by category (a real-estate search carries `rooms`, a car
//! search carries `mileage`). The engine never interprets filter
//! semantics; it only carries the map from the request to the fetcher,
//! which keeps the engine category-agnostic.

use crate::error::{Result, SearchError};
use serde::{Deserialize, Serialize};

/// A single filter value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterValue {
    /// Single scalar value (text, enum key, boolean flag)
    Scalar(String),
    /// Numeric range, inclusive on both ends; either bound may be open
    Range {
        /// Lower bound
        min: Option<i64>,
        /// Upper bound
        max: Option<i64>,
    },
    /// Set of accepted values
    Values(Vec<String>),
}

impl FilterValue {
    /// Validate the value's internal consistency.
    pub fn validate(&self, name: &str) -> Result<()> {
        match self {
            FilterValue::Scalar(s) if s.is_empty() => Err(SearchError::InvalidFilter {
                name: name.to_string(),
                reason: "scalar value cannot be empty".to_string(),
            }),
            FilterValue::Range {
                min: Some(min),
                max: Some(max),
            } if min > max => Err(SearchError::InvalidFilter {
                name: name.to_string(),
                reason: format!("range min {min} exceeds max {max}"),
            }),
            FilterValue::Range {
                min: None,
                max: None,
            } => Err(SearchError::InvalidFilter {
                name: name.to_string(),
                reason: "range must have at least one bound".to_string(),
            }),
            FilterValue::Values(vals) if vals.is_empty() => Err(SearchError::InvalidFilter {
                name: name.to_string(),
                reason: "value set cannot be empty".to_string(),
            }),
            _ => Ok(()),
        }
    }
}

/// Ordered filter map.
///
/// Insertion order is preserved so the fetcher sees filters in the order
/// the caller specified them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Filters(Vec<(String, FilterValue)>);

impl Filters {
    /// Create an empty filter map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a filter, preserving insertion order for new keys.
    pub fn set(&mut self, name: impl Into<String>, value: FilterValue) {
        let name = name.into();
        if let Some(entry) = self.0.iter_mut().find(|(n, _)| *n == name) {
            entry.1 = value;
        } else {
            self.0.push((name, value));
        }
    }

    /// Look up a filter by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&FilterValue> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    /// Iterate filters in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FilterValue)> {
        self.0.iter().map(|(n, v)| (n.as_str(), v))
    }

    /// Number of filters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map has no filters.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Validate every filter value.
    pub fn validate(&self) -> Result<()> {
        for (name, value) in &self.0 {
            value.validate(name)?;
        }
        Ok(())
    }
}

impl FromIterator<(String, FilterValue)> for Filters {
    fn from_iter<I: IntoIterator<Item = (String, FilterValue)>>(iter: I) -> Self {
        let mut filters = Filters::new();
        for (name, value) in iter {
            filters.set(name, value);
        }
        filters
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insertion_order_preserved() {
        let mut filters = Filters::new();
        filters.set("rooms", FilterValue::Range { min: Some(2), max: Some(4) });
        filters.set("furnished", FilterValue::Scalar("1".to_string()));
        filters.set(
            "heating",
            FilterValue::Values(vec!["gas".to_string(), "electric".to_string()]),
        );

        let names: Vec<&str> = filters.iter().map(|(n, _)| n).collect();
        assert_eq!(names, vec!["rooms", "furnished", "heating"]);
    }

    #[test]
    fn test_set_replaces_existing() {
        let mut filters = Filters::new();
        filters.set("rooms", FilterValue::Scalar("2".to_string()));
        filters.set("rooms", FilterValue::Scalar("3".to_string()));
        assert_eq!(filters.len(), 1);
        assert_eq!(
            filters.get("rooms"),
            Some(&FilterValue::Scalar("3".to_string()))
        );
    }

    #[test]
    fn test_validate_rejects_inverted_range() {
        let value = FilterValue::Range {
            min: Some(10),
            max: Some(2),
        };
        assert!(value.validate("rooms").is_err());
    }

    #[test]
    fn test_validate_rejects_empty_bounds() {
        let value = FilterValue::Range {
            min: None,
            max: None,
        };
        assert!(value.validate("rooms").is_err());
    }

    #[test]
    fn test_open_ended_range_valid() {
        let value = FilterValue::Range {
            min: None,
            max: Some(1500),
        };
        assert!(value.validate("price").is_ok());
    }
}
