//! Data types for the MKB-10 scraper
//!
//! This module contains all the core data structures used throughout the library.
//! All types implement Serialize and Deserialize for JSON compatibility with
//! downstream tooling.

use serde::{Deserialize, Serialize};

/// One diagnosis record from the MKB-10 catalogue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    /// Diagnosis code (e.g., "A00" or "J12.8")
    pub code: String,
    /// Description in Serbian
    pub serbian: String,
    /// Description in Latin
    pub latin: String,
}

/// Reference to a category page discovered on a catalogue listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRef {
    /// Link text (e.g., "A00-A09 Crevne zarazne bolesti")
    pub name: String,
    /// Site-absolute path of the category page
    pub path: String,
}

/// Paginated result wrapper for catalogue pages
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaginatedResult<T> {
    /// Items on the current page
    pub items: Vec<T>,
    /// Current page number (1-based)
    pub current_page: u32,
    /// Site-absolute path of the next page, absent on the last page
    pub next_page: Option<String>,
}

impl<T> PaginatedResult<T> {
    /// Create a new paginated result
    pub fn new(items: Vec<T>, current_page: u32, next_page: Option<String>) -> Self {
        Self {
            items,
            current_page,
            next_page,
        }
    }

    /// Create an empty result for the first page
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            current_page: 1,
            next_page: None,
        }
    }

    /// Whether another page follows this one
    pub fn has_next_page(&self) -> bool {
        self.next_page.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_serialization() {
        let entry = Entry {
            code: "A00".to_string(),
            serbian: "Kolera".to_string(),
            latin: "Cholera".to_string(),
        };

        let json = serde_json::to_string(&entry).unwrap();
        let deserialized: Entry = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, entry);
        assert!(json.contains("\"code\":\"A00\""));
    }

    #[test]
    fn test_category_ref_serialization() {
        let category = CategoryRef {
            name: "A00-A09 Crevne zarazne bolesti".to_string(),
            path: "/medjunarodna-klasifikacija-bolesti/a00-a09".to_string(),
        };

        let json = serde_json::to_string(&category).unwrap();
        let deserialized: CategoryRef = serde_json::from_str(&json).unwrap();

        assert_eq!(deserialized, category);
    }

    #[test]
    fn test_paginated_result_empty() {
        let result: PaginatedResult<Entry> = PaginatedResult::empty();
        assert!(result.items.is_empty());
        assert_eq!(result.current_page, 1);
        assert!(!result.has_next_page());
    }

    #[test]
    fn test_paginated_result_next_page() {
        let result = PaginatedResult::new(
            vec![Entry {
                code: "A00".to_string(),
                serbian: "Kolera".to_string(),
                latin: "Cholera".to_string(),
            }],
            2,
            Some("/medjunarodna-klasifikacija-bolesti?page=3".to_string()),
        );
        assert!(result.has_next_page());
        assert_eq!(result.current_page, 2);
    }
}
