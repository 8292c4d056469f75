//! HTML parsers for catalogue pages
//!
//! This module contains parsers for extracting data from the portal's HTML:
//! - `categories`: Parse a catalogue listing page into category references
//! - `entries`: Parse a category page into diagnosis entries
//! - `pagination`: Next-page detection shared by both

pub mod categories;
pub mod entries;
pub mod pagination;

// Re-export main parsing functions
pub use categories::{normalize_href, parse_category_list};
pub use entries::{is_code, parse_entries, strip_labels};
pub use pagination::next_page_path;
