//! Configuration management for chine.
//!
//! Provides TOML-based configuration with XDG-compliant paths and
//! environment variable overrides. The config carries the engine-side
//! knobs (budgets, delays, retry policy, output shape); the search side
//! of a run is described by a `SearchRequest`, not by this file.

use crate::error::{ConfigError, ConfigResult};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// Upstream page-size ceiling; requests above this are clamped.
pub const MAX_PAGE_SIZE: u32 = 35;

/// Hard page ceiling applied when `max_pages` is 0 (unbounded).
pub const UNBOUNDED_PAGE_CEILING: u32 = 100;

/// Main scrape configuration.
///
/// This is loaded from `~/.config/chine/config.toml` (or platform
/// equivalent). If the file doesn't exist, default values are used.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ScrapeConfig {
    /// Pagination budgets
    pub pagination: PaginationConfig,
    /// Freshness gate settings
    pub freshness: FreshnessConfig,
    /// Inter-request pacing
    pub delays: DelayConfig,
    /// Retry/backoff policy for transient fetch failures
    pub retry: RetryConfig,
    /// Output record shape
    pub output: OutputConfig,
    /// Run-level limits and concurrency
    pub run: RunConfig,
    /// Upstream proxy, handed through to the fetcher untouched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub proxy: Option<ProxyConfig>,
}

impl ScrapeConfig {
    /// Load configuration from disk, falling back to defaults if not found.
    ///
    /// # Errors
    /// Returns error if:
    /// - Config directory cannot be determined
    /// - File exists but cannot be read
    /// - File contents are not valid TOML
    pub fn load() -> ConfigResult<Self> {
        let config_path = Self::config_path()?;

        if config_path.exists() {
            tracing::debug!("Loading config from {}", config_path.display());
            let contents = fs::read_to_string(&config_path)?;
            let config: Self = toml::from_str(&contents)?;
            config.validate()?;
            Ok(config)
        } else {
            tracing::debug!("Config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Load configuration with environment variable overrides.
    ///
    /// Supports the following environment variables:
    /// - `CHINE_MAX_PAGES`: Override the per-scope page budget
    /// - `CHINE_MAX_AGE_DAYS`: Override the freshness threshold
    /// - `CHINE_DELAY_BETWEEN_PAGES_MS`: Override inter-page delay
    pub fn load_with_env() -> ConfigResult<Self> {
        let mut config = Self::load()?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Apply the `CHINE_*` environment overrides in place.
    ///
    /// Unset or unparseable variables leave the loaded value untouched.
    pub fn apply_env_overrides(&mut self) {
        if let Ok(val) = std::env::var("CHINE_MAX_PAGES") {
            if let Ok(pages) = val.parse() {
                self.pagination.max_pages = pages;
                tracing::debug!("Override max_pages from env: {}", pages);
            }
        }

        if let Ok(val) = std::env::var("CHINE_MAX_AGE_DAYS") {
            if let Ok(days) = val.parse() {
                self.freshness.max_age_days = days;
                tracing::debug!("Override max_age_days from env: {}", days);
            }
        }

        if let Ok(val) = std::env::var("CHINE_DELAY_BETWEEN_PAGES_MS") {
            if let Ok(ms) = val.parse() {
                self.delays.between_pages_ms = ms;
                tracing::debug!("Override between_pages_ms from env: {}", ms);
            }
        }
    }

    /// Load configuration from a specific TOML file.
    pub fn load_from(path: &std::path::Path) -> ConfigResult<Self> {
        if !path.exists() {
            return Err(ConfigError::NotFound {
                path: path.display().to_string(),
            });
        }
        let contents = fs::read_to_string(path)?;
        let config: Self = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Get the platform-appropriate config file path.
    ///
    /// # Errors
    /// Returns error if XDG base directories cannot be determined.
    pub fn config_path() -> ConfigResult<PathBuf> {
        let dirs =
            ProjectDirs::from("", "", "chine").ok_or(ConfigError::NoConfigDir)?;
        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Validate cross-field constraints.
    ///
    /// # Errors
    /// Returns error on out-of-range values.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.pagination.limit_per_page == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pagination.limit_per_page".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.freshness.consecutive_stale_limit == 0 {
            return Err(ConfigError::InvalidValue {
                field: "freshness.consecutive_stale_limit".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.retry.max_retries == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_retries".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        if self.run.max_concurrent_scopes == 0 {
            return Err(ConfigError::InvalidValue {
                field: "run.max_concurrent_scopes".to_string(),
                reason: "must be at least 1".to_string(),
            });
        }
        Ok(())
    }
}

/// Pagination budgets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Maximum pages fetched per scope; 0 means unbounded
    /// (subject to [`UNBOUNDED_PAGE_CEILING`])
    pub max_pages: u32,
    /// Listings requested per page, clamped to [`MAX_PAGE_SIZE`]
    pub limit_per_page: u32,
}

impl PaginationConfig {
    /// Effective per-scope page budget with the unbounded ceiling applied.
    #[must_use]
    pub fn effective_max_pages(&self) -> u32 {
        if self.max_pages == 0 {
            UNBOUNDED_PAGE_CEILING
        } else {
            self.max_pages
        }
    }

    /// Page size clamped to the upstream maximum.
    #[must_use]
    pub fn effective_page_size(&self) -> u32 {
        self.limit_per_page.min(MAX_PAGE_SIZE)
    }
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            max_pages: 10,
            limit_per_page: MAX_PAGE_SIZE,
        }
    }
}

/// Freshness gate settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FreshnessConfig {
    /// Maximum listing age in days; 0 disables the gate entirely
    pub max_age_days: u32,
    /// Consecutive stale listings that trigger scope early-stop
    pub consecutive_stale_limit: u32,
    /// What to do with stale listings
    pub stale_policy: StalePolicy,
}

impl Default for FreshnessConfig {
    fn default() -> Self {
        Self {
            max_age_days: 0,
            consecutive_stale_limit: 5,
            stale_policy: StalePolicy::EmitAndStop,
        }
    }
}

/// Policy for listings that fail the freshness check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StalePolicy {
    /// Emit stale listings but stop requesting further pages once the
    /// consecutive-stale limit is hit (staleness is a stopping
    /// heuristic, not an exclusion filter)
    #[default]
    EmitAndStop,
    /// Exclude stale listings from the output entirely, in addition to
    /// the early-stop behavior
    Exclude,
}

/// Inter-request pacing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DelayConfig {
    /// Delay between page fetches within a scope, in milliseconds
    pub between_pages_ms: u64,
    /// Delay between scopes, in milliseconds (sequential runs only)
    pub between_scopes_ms: u64,
}

impl Default for DelayConfig {
    fn default() -> Self {
        Self {
            between_pages_ms: 0,
            between_scopes_ms: 0,
        }
    }
}

/// Retry/backoff policy for transient fetch failures.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    /// Maximum fetch attempts per page
    pub max_retries: u32,
    /// Base backoff delay in milliseconds (multiplied per attempt)
    pub base_delay_ms: u64,
    /// Backoff multiplier applied after rate-limit responses
    pub rate_limit_multiplier: u64,
    /// Per-fetch timeout in milliseconds
    pub fetch_timeout_ms: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_retries: 3,
            base_delay_ms: 2000,
            rate_limit_multiplier: 3,
            fetch_timeout_ms: 30_000,
        }
    }
}

/// Output record shape.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Projection applied to normalized records
    pub shape: OutputShape,
}

/// The two fixed field projections over normalized records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputShape {
    /// All known fields, flattened
    #[default]
    Detailed,
    /// Essential fields only; always a strict subset of detailed
    Compact,
}

/// Run-level limits and concurrency.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RunConfig {
    /// Scope-level errors tolerated before the whole run aborts;
    /// 0 disables the threshold
    pub error_threshold: u32,
    /// Maximum scopes scraped in parallel; 1 means strictly sequential
    pub max_concurrent_scopes: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            error_threshold: 0,
            max_concurrent_scopes: 1,
        }
    }
}

/// Upstream proxy settings.
///
/// The engine never interprets these; fetcher implementations own the
/// transport concern.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProxyConfig {
    /// Proxy hostname
    pub host: String,
    /// Proxy port
    pub port: u16,
    /// Optional username
    pub username: Option<String>,
    /// Optional password
    pub password: Option<String>,
}
