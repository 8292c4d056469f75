use thiserror::Error;

/// Application-specific errors for the CLI
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid delay value: {delay}. Must be a non-negative number of seconds")]
    InvalidDelay { delay: f64 },

    #[error("Scraper error: {0}")]
    Scraper(#[from] mkb_core::MkbError),
}
