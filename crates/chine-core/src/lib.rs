//! Chine Core - Foundation crate for the chine marketplace scraper.
//!
//! This crate provides shared types, error handling, and configuration
//! management that all other chine crates depend on.
//!
//! # Modules
//!
//! - [`error`] - Central error types using thiserror
//! - [`config`] - TOML-based configuration with XDG paths
//! - [`types`] - Shared newtypes (`ListingId`, `RunId`)
//!
//! # Example
//!
//! ```rust
//! use chine_core::{ListingId, ScrapeConfig};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = ScrapeConfig::default();
//! let id = ListingId::new("2853671234")?;
//! assert_eq!(id.as_str(), "2853671234");
//! # Ok(())
//! # }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]

pub mod config;
pub mod error;
pub mod types;

// Re-export commonly used types
pub use config::{
    DelayConfig, FreshnessConfig, OutputConfig, OutputShape, PaginationConfig, ProxyConfig,
    RetryConfig, RunConfig, ScrapeConfig, StalePolicy, MAX_PAGE_SIZE, UNBOUNDED_PAGE_CEILING,
};
pub use error::{ConfigError, ConfigResult, CoreError, Result};
pub use types::{ListingId, RunId};
