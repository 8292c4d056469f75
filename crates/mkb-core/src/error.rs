//! Error types for the MKB-10 scraper
//!
//! This module defines all error types used throughout the library.

use thiserror::Error;

/// Error type for MKB-10 scraper operations
#[derive(Error, Debug)]
pub enum MkbError {
    /// HTTP request failed
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Failed to parse HTML content
    #[error("Failed to parse HTML: {0}")]
    ParseError(String),

    /// Required HTML element was not found
    #[error("Element not found: {0}")]
    ElementNotFound(String),

    /// Rate limited by the server (HTTP 429)
    #[error("Rate limited - too many requests")]
    RateLimited,

    /// Requested page was not found (HTTP 404)
    #[error("Page not found: {0}")]
    NotFound(String),

    /// An entry field would corrupt the pipe-delimited output
    #[error("Entry {code} contains a field with the '|' delimiter or a line break")]
    InvalidField { code: String },

    /// Output file could not be written
    #[error("Failed to write output: {0}")]
    IoError(#[from] std::io::Error),
}

/// Result type alias for MKB-10 scraper operations
pub type Result<T> = std::result::Result<T, MkbError>;
