//! Chine Fetch - The page fetcher boundary.
//!
//! This crate defines the contract between the scrape engine and
//! whatever actually talks to the marketplace: the [`PageFetcher`]
//! trait, the page/listing types crossing it, and the fetch error
//! taxonomy the engine's retry policy is built on. Concrete transports
//! (HTTP clients, browser automation, anti-bot proxies) implement
//! [`PageFetcher`] outside this workspace; a deterministic
//! [`ScriptedFetcher`] is provided for tests and examples.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

#[allow(missing_docs)]
pub mod error;
pub mod fetcher;
pub mod listing;
pub mod page;
pub mod proxy;
pub mod scripted;

// Re-export commonly used types
pub use error::{FetchError, Result};
pub use fetcher::PageFetcher;
pub use listing::RawListing;
pub use page::{Page, PageRequest};
pub use proxy::ProxySettings;
pub use scripted::{ScriptedFetcher, ScriptedOutcome};
