//! Error types for the search engine.

use thiserror::Error;

/// Errors that can occur when building queries or running searches.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Invalid regular expression pattern.
    #[error("invalid regex pattern: {0}")]
    InvalidRegex(#[from] regex::Error),

    /// A page descriptor was built with a page size of zero.
    #[error("page size must be a positive integer")]
    InvalidPageSize,

    /// The record source failed to produce records.
    #[error("record source failed: {0}")]
    Source(String),
}

/// Result type for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;
