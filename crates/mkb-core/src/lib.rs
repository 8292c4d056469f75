//! MKB-10 Catalogue Scraper Core Library
//!
//! This crate provides the core scraping functionality for the MKB-10
//! (ICD-10) diagnosis catalogue published on stetoskop.info.
//!
//! # Features
//! - Walk the paged category listing of the catalogue
//! - Fetch each category's diagnosis pages, following sub-pagination
//! - Aggregate entries into one record per code, in natural code order
//! - Export the catalogue as a pipe-delimited flat file
//! - Rate-limited HTTP client to avoid server overload

pub mod catalog;
pub mod client;
pub mod error;
pub mod export;
pub mod parser;
pub mod scrape;
pub mod types;

// Re-export main types for convenience
pub use catalog::aggregate;
pub use client::{ClientConfig, MkbClient, RateLimiter};
pub use error::{MkbError, Result};
pub use export::write_catalog;
pub use scrape::{MkbScraper, ScrapeReport, ScraperConfig};
pub use types::{CategoryRef, Entry, PaginatedResult};
