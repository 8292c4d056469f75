//! Catalogue assembly: deduplication and ordering
//!
//! Entries arrive in page order, possibly repeated across overlapping
//! pages. This module folds them into one record per code and sorts the
//! result by the natural code order used by the catalogue.

use std::collections::HashMap;

use crate::types::Entry;

/// Sort key for MKB-10 codes: alphabetic prefix, numeric value, suffix.
///
/// Splitting the numeric part out keeps `A9` ahead of `A10`. Codes that
/// do not match the `LETTERS DIGITS [. SUFFIX]` shape compare as whole
/// strings in the first component.
///
/// # Examples
/// ```
/// use mkb_core::catalog::code_sort_key;
///
/// assert!(code_sort_key("A9") < code_sort_key("A10"));
/// assert!(code_sort_key("A00") < code_sort_key("A00.1"));
/// assert!(code_sort_key("A00.1") < code_sort_key("B00"));
/// ```
pub fn code_sort_key(code: &str) -> (String, u32, String) {
    let re = regex_lite::Regex::new(r"^([A-Z]+)(\d+)(?:\.([0-9A-Z]+))?$");
    if let Ok(re) = re {
        if let Some(caps) = re.captures(code) {
            let prefix = caps.get(1).map(|m| m.as_str()).unwrap_or("").to_string();
            let number = caps
                .get(2)
                .and_then(|m| m.as_str().parse().ok())
                .unwrap_or(0);
            let suffix = caps.get(3).map(|m| m.as_str()).unwrap_or("").to_string();
            return (prefix, number, suffix);
        }
    }
    (code.to_string(), 0, String::new())
}

/// Fold raw entries into one record per code, sorted by [`code_sort_key`]
/// with the raw code breaking ties.
///
/// Deduplication keeps the first record seen for each code and fills or
/// replaces its description fields from later duplicates whenever those
/// are non-empty: overlapping pages usually repeat an entry verbatim, but
/// some carry only one of the two descriptions.
///
/// # Arguments
/// * `entries` - Raw entries in the order they were parsed
pub fn aggregate<I>(entries: I) -> Vec<Entry>
where
    I: IntoIterator<Item = Entry>,
{
    let mut by_code: HashMap<String, Entry> = HashMap::new();
    for entry in entries {
        if entry.code.is_empty() {
            continue;
        }
        match by_code.get_mut(&entry.code) {
            Some(existing) => {
                if !entry.serbian.is_empty() {
                    existing.serbian = entry.serbian;
                }
                if !entry.latin.is_empty() {
                    existing.latin = entry.latin;
                }
            }
            None => {
                by_code.insert(entry.code.clone(), entry);
            }
        }
    }

    let mut catalog: Vec<Entry> = by_code.into_values().collect();
    catalog.sort_by_cached_key(|entry| (code_sort_key(&entry.code), entry.code.clone()));
    catalog
}
