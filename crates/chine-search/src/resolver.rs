//! Location resolver: expands a request into an ordered scope sequence.
//!
//! Validation is fail-fast: a malformed descriptor rejects the whole
//! run here, before any network call. Ordering is preserved from the
//! input list so callers can put the most relevant location first. No
//! deduplication of scopes is performed; duplicate scopes are the
//! caller's responsibility.

use crate::error::{Result, SearchError};
use crate::location::{LocationSpec, LocationType};
use crate::request::SearchRequest;
use crate::scope::SearchScope;

/// Expand a validated request into the ordered scope list the engine
/// iterates.
///
/// - `location_type = none` with an empty list yields exactly one
///   unconstrained scope.
/// - `location_type = none` with descriptors is rejected: the caller
///   supplied input that would be silently ignored otherwise.
/// - Any other type requires at least one descriptor, and every
///   descriptor must match the declared type.
pub fn resolve_scopes(request: &SearchRequest) -> Result<Vec<SearchScope>> {
    request.validate()?;

    let scopes = match request.location_type {
        LocationType::None => {
            if !request.locations.is_empty() {
                return Err(SearchError::UnexpectedLocations {
                    count: request.locations.len(),
                });
            }
            vec![build_scope(request, LocationSpec::None)]
        }
        location_type => {
            if request.locations.is_empty() {
                return Err(SearchError::MissingLocations {
                    location_type: location_type.to_string(),
                });
            }

            let mut scopes = Vec::with_capacity(request.locations.len());
            for (index, spec) in request.locations.iter().enumerate() {
                if spec.location_type() != location_type {
                    return Err(SearchError::LocationTypeMismatch {
                        index,
                        expected: location_type.to_string(),
                    });
                }
                spec.validate()?;
                scopes.push(build_scope(request, spec.clone()));
            }
            scopes
        }
    };

    tracing::debug!("Resolved {} search scope(s)", scopes.len());
    Ok(scopes)
}

fn build_scope(request: &SearchRequest, location: LocationSpec) -> SearchScope {
    SearchScope {
        label: location.label(),
        location,
        category: request.category,
        text: request.text.clone(),
        filters: request.filters.clone(),
        price: request.price,
        sort: request.sort,
        ad_type: request.ad_type,
        owner_type: request.owner_type,
    }
}
