//! Chine Search - The declarative search model.
//!
//! This crate defines what a scrape run searches for: the category and
//! filter bundle, the tagged location union, and the resolver that
//! expands a [`SearchRequest`] into the ordered [`SearchScope`] list the
//! engine iterates. All validation is fail-fast and happens before any
//! network call.
//!
//! # Example
//!
//! ```rust
//! use chine_search::{resolve_scopes, Category, LocationSpec, LocationType, SearchRequest};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let request = SearchRequest {
//!     category: Category::Immobilier,
//!     location_type: LocationType::Department,
//!     locations: vec![LocationSpec::Department { code: "75".into() }],
//!     ..SearchRequest::default()
//! };
//!
//! let scopes = resolve_scopes(&request)?;
//! assert_eq!(scopes[0].label, "department 75");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod error;
pub mod filters;
pub mod location;
pub mod request;
pub mod resolver;
pub mod scope;

// Re-export commonly used types
pub use error::{Result, SearchError};
pub use filters::{FilterValue, Filters};
pub use location::{LocationSpec, LocationType};
pub use request::{AdType, Category, OwnerType, PriceRange, SearchRequest, Sort};
pub use resolver::resolve_scopes;
pub use scope::SearchScope;
