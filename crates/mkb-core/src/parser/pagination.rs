//! Pagination detection for catalogue pages
//!
//! The category listing and the category pages share the same pagination
//! markup; this module locates the link to the next page and the current
//! page number.

use scraper::{ElementRef, Html, Selector};

use super::categories::normalize_href;

/// Selectors matching the links of a pagination block.
const PAGER_LINK_SELECTORS: [&str; 3] = [".pagination a", ".paging a", ".pager a"];

/// Link texts that mark a "next page" link.
const NEXT_MARKERS: [&str; 6] = ["»", "›", "sledeća", "sledeca", "следећа", "next"];

/// Find the path of the next page advertised by a page.
///
/// # Arguments
/// * `html` - Raw HTML content of the page
/// * `base_url` - Base URL of the portal, without a trailing slash
/// * `index_path` - Site-absolute path of the catalogue index
///
/// # Returns
/// * `Some(path)` with the normalized next-page path
/// * `None` on the last page or when no pagination block exists
pub fn next_page_path(html: &str, base_url: &str, index_path: &str) -> Option<String> {
    let document = Html::parse_document(html);
    find_next_page(&document, base_url, index_path)
}

/// Find the next page link in an already parsed document.
pub(crate) fn find_next_page(document: &Html, base_url: &str, index_path: &str) -> Option<String> {
    // Explicitly marked next links first
    let next_selectors = [
        "a[rel='next']",
        ".pagination .next:not(.disabled) a",
        ".pagination a.next:not(.disabled)",
        ".paging a.next",
        ".pagination li.active + li a",
    ];

    for selector_str in &next_selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            for el in document.select(&selector) {
                if let Some(path) = link_path(&el, base_url, index_path) {
                    return Some(path);
                }
            }
        }
    }

    // Fall back to pager links labelled with a next marker
    for selector_str in &PAGER_LINK_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            for el in document.select(&selector) {
                let text = el.text().collect::<String>().trim().to_lowercase();
                if NEXT_MARKERS.iter().any(|marker| text.contains(marker)) {
                    if let Some(path) = link_path(&el, base_url, index_path) {
                        return Some(path);
                    }
                }
            }
        }
    }

    None
}

/// Collect the raw hrefs of every link inside a pagination block.
pub(crate) fn pagination_hrefs(document: &Html) -> Vec<String> {
    let mut hrefs = Vec::new();
    for selector_str in &PAGER_LINK_SELECTORS {
        if let Ok(selector) = Selector::parse(selector_str) {
            for el in document.select(&selector) {
                if let Some(href) = el.value().attr("href") {
                    hrefs.push(href.to_string());
                }
            }
        }
    }
    hrefs
}

/// Extract the current page number from the pagination block.
pub(crate) fn current_page(document: &Html) -> Option<u32> {
    let selectors = [
        ".pagination .active",
        ".pagination .current",
        ".paging .current",
        ".pager .active",
    ];

    for selector_str in &selectors {
        if let Ok(selector) = Selector::parse(selector_str) {
            if let Some(el) = document.select(&selector).next() {
                let text = el.text().collect::<String>();
                if let Some(page) = first_number(&text) {
                    return Some(page);
                }
            }
        }
    }

    None
}

/// Resolve a pager link element to a normalized site path.
fn link_path(el: &ElementRef, base_url: &str, index_path: &str) -> Option<String> {
    let href = el.value().attr("href")?;
    normalize_href(href, base_url, index_path)
}

/// Pull the first run of digits out of a pager label.
fn first_number(text: &str) -> Option<u32> {
    let re = regex_lite::Regex::new(r"\d+").ok()?;
    re.find(text)?.as_str().parse().ok()
}
