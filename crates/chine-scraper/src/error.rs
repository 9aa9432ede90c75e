//! Run-level error types.

use thiserror::Error;

pub type Result<T> = std::result::Result<T, ScrapeError>;

/// Errors that abort a whole scrape run.
///
/// Per-scope fetch failures never surface here; they are demoted to
/// scope-level stop reasons recorded in `RunStats`. Only configuration
/// problems (before any fetch) and sink failures end the run with an
/// error.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("configuration error: {0}")]
    Config(#[from] chine_core::ConfigError),

    #[error("invalid search request: {0}")]
    Search(#[from] chine_search::SearchError),

    #[error("record sink error: {0}")]
    Sink(String),
}
