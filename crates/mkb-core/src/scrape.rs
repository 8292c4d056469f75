//! Main MKB-10 scraper API
//!
//! This module provides the high-level API for scraping the catalogue.
//! It combines the HTTP client with the parsers: the paged category
//! listing is walked first, then every category's diagnosis pages are
//! fetched and the parsed entries aggregated into the final catalogue.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::catalog::aggregate;
use crate::client::{ClientConfig, MkbClient};
use crate::error::{MkbError, Result};
use crate::parser::{next_page_path, parse_category_list, parse_entries};
use crate::types::{CategoryRef, Entry, PaginatedResult};

/// Site-absolute path of the catalogue index on the portal
pub const DEFAULT_INDEX_PATH: &str = "/medjunarodna-klasifikacija-bolesti";

/// Configuration for [`MkbScraper`]
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    /// HTTP client configuration
    pub client: ClientConfig,
    /// Site-absolute path of the catalogue index page
    pub index_path: String,
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            client: ClientConfig::default(),
            index_path: DEFAULT_INDEX_PATH.to_string(),
        }
    }
}

/// Result of a full catalogue scrape
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScrapeReport {
    /// Aggregated catalogue: unique codes in natural order
    pub entries: Vec<Entry>,
    /// Listing pages walked
    pub listing_pages: usize,
    /// Categories discovered on the listing pages
    pub categories: usize,
    /// Categories skipped because their pages yielded no parseable entries
    pub skipped_categories: usize,
    /// Raw records merged away during deduplication
    pub duplicates: usize,
}

/// Main scraper API for the MKB-10 catalogue
///
/// Provides methods for walking the category listing, fetching a single
/// category's entries, and scraping the whole catalogue in one call. All
/// operations are asynchronous.
///
/// # Example
/// ```no_run
/// use mkb_core::MkbScraper;
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let scraper = MkbScraper::new()?;
///
///     // Scrape the whole catalogue
///     let report = scraper.scrape().await?;
///     println!("Found {} entries", report.entries.len());
///
///     Ok(())
/// }
/// ```
pub struct MkbScraper {
    client: MkbClient,
    index_path: String,
}

impl MkbScraper {
    /// Create a new scraper with default configuration.
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    ///
    /// # Example
    /// ```
    /// use mkb_core::MkbScraper;
    ///
    /// let scraper = MkbScraper::new().expect("Failed to create scraper");
    /// ```
    pub fn new() -> Result<Self> {
        Self::with_config(ScraperConfig::default())
    }

    /// Create a new scraper with custom configuration.
    ///
    /// # Arguments
    /// * `config` - Scraper configuration
    ///
    /// # Errors
    /// Returns an error if the HTTP client cannot be created.
    pub fn with_config(config: ScraperConfig) -> Result<Self> {
        let client = MkbClient::with_config(config.client)?;
        Ok(Self {
            client,
            index_path: normalize_index_path(&config.index_path),
        })
    }

    /// Create a new scraper with a custom client.
    ///
    /// This is useful for testing or when you need custom client
    /// configuration.
    ///
    /// # Arguments
    /// * `client` - Pre-configured MkbClient instance
    pub fn with_client(client: MkbClient) -> Self {
        Self {
            client,
            index_path: DEFAULT_INDEX_PATH.to_string(),
        }
    }

    /// Get the catalogue index path this scraper walks.
    pub fn index_path(&self) -> &str {
        &self.index_path
    }

    /// Fetch and parse one listing page of the catalogue.
    ///
    /// # Arguments
    /// * `path` - Site-absolute path of the listing page
    ///
    /// # Returns
    /// * `Ok(PaginatedResult<CategoryRef>)` with the page's categories
    /// * `Err(MkbError)` on fetch or parse failure
    pub async fn category_page(&self, path: &str) -> Result<PaginatedResult<CategoryRef>> {
        let html = self.client.fetch(path).await?;
        parse_category_list(&html, self.client.base_url(), &self.index_path)
    }

    /// Walk every listing page and collect the category references.
    ///
    /// The walk starts at the index page and follows next-page links until
    /// the last page; a visited set guards against pagination loops.
    ///
    /// # Returns
    /// * `Ok(Vec<CategoryRef>)` with the discovered categories
    /// * `Err(MkbError::ElementNotFound)` if the walk found no categories
    ///
    /// # Example
    /// ```no_run
    /// use mkb_core::MkbScraper;
    ///
    /// # async fn example() -> Result<(), mkb_core::MkbError> {
    /// let scraper = MkbScraper::new()?;
    /// for category in scraper.categories().await? {
    ///     println!("{} -> {}", category.name, category.path);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn categories(&self) -> Result<Vec<CategoryRef>> {
        Ok(self.walk_listing().await?.0)
    }

    /// Fetch every diagnosis entry of one category, following the
    /// category's own sub-pages when its list spans more than one.
    ///
    /// # Arguments
    /// * `category` - Category reference from the listing
    ///
    /// # Returns
    /// * `Ok(Vec<Entry>)` with the entries in page order
    /// * `Err(MkbError)` on fetch or parse failure
    pub async fn category_entries(&self, category: &CategoryRef) -> Result<Vec<Entry>> {
        let mut entries = Vec::new();
        let mut visited: HashSet<String> = HashSet::new();
        let mut path = category.path.clone();

        loop {
            visited.insert(path.clone());
            let html = self.client.fetch(&path).await?;
            let page_entries = parse_entries(&html)?;
            debug!(
                "Category {}: {} entries on {}",
                category.name,
                page_entries.len(),
                path
            );
            entries.extend(page_entries);

            match next_page_path(&html, self.client.base_url(), &self.index_path) {
                Some(next) if !visited.contains(&next) => path = next,
                _ => break,
            }
        }

        Ok(entries)
    }

    /// Scrape the full catalogue.
    ///
    /// Listing pages are walked first; every discovered category is then
    /// fetched in turn. A category whose pages cannot be parsed, or parse
    /// to nothing, is skipped with a warning and counted in the report;
    /// network failures abort the run.
    ///
    /// # Returns
    /// * `Ok(ScrapeReport)` with the aggregated catalogue and counters
    /// * `Err(MkbError)` on an unrecoverable failure
    pub async fn scrape(&self) -> Result<ScrapeReport> {
        let (categories, listing_pages) = self.walk_listing().await?;

        let mut raw: Vec<Entry> = Vec::new();
        let mut skipped = 0usize;
        for category in &categories {
            match self.category_entries(category).await {
                Ok(batch) if batch.is_empty() => {
                    warn!(
                        "No entries found in category {} ({})",
                        category.name, category.path
                    );
                    skipped += 1;
                }
                Ok(batch) => raw.extend(batch),
                Err(MkbError::ParseError(reason)) => {
                    warn!(
                        "Skipping category {} ({}): {}",
                        category.name, category.path, reason
                    );
                    skipped += 1;
                }
                Err(MkbError::ElementNotFound(what)) => {
                    warn!(
                        "Skipping category {} ({}): missing {}",
                        category.name, category.path, what
                    );
                    skipped += 1;
                }
                Err(other) => return Err(other),
            }
        }

        let raw_count = raw.len();
        let entries = aggregate(raw);
        let duplicates = raw_count - entries.len();
        info!(
            "Collected {} unique entries ({} duplicates merged, {} of {} categories skipped)",
            entries.len(),
            duplicates,
            skipped,
            categories.len()
        );

        Ok(ScrapeReport {
            entries,
            listing_pages,
            categories: categories.len(),
            skipped_categories: skipped,
            duplicates,
        })
    }

    /// Walk the paged listing, returning the categories and page count.
    async fn walk_listing(&self) -> Result<(Vec<CategoryRef>, usize)> {
        let mut categories: Vec<CategoryRef> = Vec::new();
        let mut seen_paths: HashSet<String> = HashSet::new();
        let mut visited_pages: HashSet<String> = HashSet::new();
        let mut pages = 0usize;
        let mut page_path = self.index_path.clone();

        loop {
            visited_pages.insert(page_path.clone());
            let listing = self.category_page(&page_path).await?;
            pages += 1;
            debug!(
                "Listing page {}: {} categories, next: {:?}",
                listing.current_page,
                listing.items.len(),
                listing.next_page
            );

            for category in listing.items {
                if seen_paths.insert(category.path.clone()) {
                    categories.push(category);
                }
            }

            match listing.next_page {
                Some(next) if !visited_pages.contains(&next) => page_path = next,
                _ => break,
            }
        }

        if categories.is_empty() {
            return Err(MkbError::ElementNotFound(format!(
                "category links under {}",
                self.index_path
            )));
        }

        info!(
            "Discovered {} categories on {} listing page(s)",
            categories.len(),
            pages
        );
        Ok((categories, pages))
    }
}

/// Force an index path into site-absolute form without a trailing slash.
fn normalize_index_path(path: &str) -> String {
    let trimmed = path.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        "/".to_string()
    } else if trimmed.starts_with('/') {
        trimmed.to_string()
    } else {
        format!("/{}", trimmed)
    }
}
