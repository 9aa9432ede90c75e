use thiserror::Error;

pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors raised while validating a search request.
///
/// All of these fail the whole run before any network call is made.
#[derive(Debug, Error)]
pub enum SearchError {
    #[error("invalid location descriptor: {reason}")]
    InvalidLocation { reason: String },

    #[error("location descriptor {index} does not match location type '{expected}'")]
    LocationTypeMismatch { index: usize, expected: String },

    #[error("location type '{location_type}' requires at least one descriptor")]
    MissingLocations { location_type: String },

    #[error("location type 'none' does not accept descriptors, got {count}")]
    UnexpectedLocations { count: usize },

    #[error("invalid filter '{name}': {reason}")]
    InvalidFilter { name: String, reason: String },

    #[error("invalid price range: min {min} exceeds max {max}")]
    InvalidPriceRange { min: u64, max: u64 },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SearchError::LocationTypeMismatch {
            index: 2,
            expected: "city".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "location descriptor 2 does not match location type 'city'"
        );
    }

    #[test]
    fn test_price_range_error() {
        let err = SearchError::InvalidPriceRange { min: 500, max: 100 };
        assert!(err.to_string().contains("500"));
    }
}
