//! Shared types used across the chine workspace.
//!
//! This module defines common newtypes that provide type safety and
//! clear domain modeling.

use crate::error::CoreError;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Newtype for listing identifiers.
///
/// Listing IDs come from the upstream marketplace as numbers or strings;
/// they are always stored string-formatted so the emitted output schema
/// stays stable regardless of what the upstream sends.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ListingId(String);

static LISTING_ID_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^\S{1,64}$").expect("valid regex"));

impl ListingId {
    /// Create a new `ListingId` from a string.
    ///
    /// # Errors
    /// Returns error if the ID is empty, contains whitespace, or is
    /// longer than 64 characters.
    pub fn new(id: impl Into<String>) -> Result<Self, CoreError> {
        let id = id.into();
        if LISTING_ID_REGEX.is_match(&id) {
            Ok(Self(id))
        } else {
            Err(CoreError::Validation(format!(
                "invalid listing ID: must be 1-64 non-whitespace characters, got '{id}'"
            )))
        }
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ListingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for ListingId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// Newtype for scrape run identifiers.
///
/// A fresh `RunId` is generated at run start; fingerprints and stats are
/// scoped to it and discarded at run end.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(String);

impl RunId {
    /// Create a new random `RunId` using UUID v4.
    #[must_use]
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Get the inner string value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
