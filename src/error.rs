//! Error types for the parinaam scraper
//!
//! This module defines custom error types used throughout the application.

use thiserror::Error;

/// Errors that can occur during HTTP fetching operations
#[derive(Error, Debug)]
pub enum FetchError {
    /// HTTP request error
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Server error with status code
    #[error("Server error: {0}")]
    ServerError(u16),

    /// Request timeout
    #[error("Request timeout")]
    Timeout,

    /// Maximum retry attempts exceeded
    #[error("Maximum retry attempts exceeded")]
    MaxRetriesExceeded,

    /// Roll number too short to derive the per-year endpoint
    #[error("Invalid roll number: {0}")]
    InvalidRoll(String),
}

/// Errors that can occur during result-page extraction
///
/// Every variant is a "no data" signal: the page did not match the result
/// template well enough to yield a record. None of them halt a batch.
#[derive(Error, Debug)]
pub enum ExtractError {
    /// Fewer than two tables in the document
    #[error("Document has fewer than two tables")]
    TooFewTables,

    /// A labelled identity field could not be located
    #[error("Identity field not found: {0}")]
    IdentityFieldMissing(&'static str),

    /// No semester blocks were extracted
    #[error("No semester data found")]
    NoSemesters,
}
