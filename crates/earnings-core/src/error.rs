//! Error types for earnings document operations.
//!
//! This module defines [`EarningsError`] which covers all error cases that can
//! occur when searching for, reconciling, or downloading earnings documents.

use thiserror::Error;

/// Errors that can occur during earnings document operations.
#[derive(Error, Debug)]
pub enum EarningsError {
    /// Network-related errors (connection failures, timeouts, etc.).
    #[error("Network error: {0}")]
    Network(String),

    /// Error parsing data returned by a source.
    #[error("Parse error: {0}")]
    Parse(String),

    /// The requested company could not be found by a source.
    #[error("Company not found: {0}")]
    CompanyNotFound(String),

    /// An invalid region string was supplied by the caller.
    #[error("Invalid region: {0} (expected india, us, japan, korea or china)")]
    InvalidRegion(String),

    /// Filesystem errors while reading the scrip list or writing downloads.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    /// Any other error.
    #[error("{0}")]
    Other(String),
}

/// Result type alias using [`EarningsError`].
pub type Result<T> = std::result::Result<T, EarningsError>;
