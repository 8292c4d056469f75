//! Category listing parser for the MKB-10 catalogue
//!
//! Parses a catalogue listing page into category references and a pointer
//! to the next listing page, if the pagination block advertises one.

use std::collections::HashSet;

use scraper::{ElementRef, Html, Selector};

use crate::error::{MkbError, Result};
use crate::types::{CategoryRef, PaginatedResult};

use super::entries::normalize_text;
use super::pagination::{current_page, find_next_page, pagination_hrefs};

/// Normalize an anchor href into a site-absolute path.
///
/// Keeps only links that stay on the portal and inside the catalogue
/// subtree:
/// - absolute URLs must be on `base_url`; other hosts are rejected
/// - non-http schemes (`mailto:`, `javascript:`, `tel:`) are rejected
/// - pure fragments are rejected, fragments on paths are dropped
/// - the path must start with `index_path`
/// - trailing slashes are stripped, query strings are preserved
///
/// # Arguments
/// * `href` - Raw href attribute value
/// * `base_url` - Base URL of the portal, without a trailing slash
/// * `index_path` - Site-absolute path of the catalogue index
///
/// # Examples
/// ```
/// use mkb_core::parser::normalize_href;
///
/// let base = "https://www.stetoskop.info";
/// let index = "/medjunarodna-klasifikacija-bolesti";
///
/// assert_eq!(
///     normalize_href("/medjunarodna-klasifikacija-bolesti/a00-a09/", base, index),
///     Some("/medjunarodna-klasifikacija-bolesti/a00-a09".to_string())
/// );
/// assert_eq!(normalize_href("https://example.com/other", base, index), None);
/// assert_eq!(normalize_href("#sadrzaj", base, index), None);
/// ```
pub fn normalize_href(href: &str, base_url: &str, index_path: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty() || href.starts_with('#') {
        return None;
    }
    if href.starts_with("mailto:") || href.starts_with("javascript:") || href.starts_with("tel:") {
        return None;
    }

    let base = base_url.trim_end_matches('/');
    let path = if let Some(rest) = href.strip_prefix(base) {
        // Absolute URL on the portal itself
        if rest.is_empty() {
            "/".to_string()
        } else if rest.starts_with('/') {
            rest.to_string()
        } else {
            // Another host that merely shares the prefix
            return None;
        }
    } else if href.starts_with("http://") || href.starts_with("https://") || href.starts_with("//")
    {
        // Absolute URL pointing at another host
        return None;
    } else if href.starts_with('/') {
        href.to_string()
    } else {
        // Bare-relative link, resolved against the catalogue index
        format!("{}/{}", index_path.trim_end_matches('/'), href)
    };

    // Drop any fragment, keep the query
    let path = match path.split_once('#') {
        Some((before, _)) => before.to_string(),
        None => path,
    };
    let (raw_path, query) = match path.split_once('?') {
        Some((p, q)) => (p, Some(q.to_string())),
        None => (path.as_str(), None),
    };

    let trimmed = raw_path.trim_end_matches('/');
    if trimmed.is_empty() {
        return None;
    }
    let index = index_path.trim_end_matches('/');
    if !index.is_empty() && !trimmed.starts_with(index) {
        return None;
    }

    match query {
        Some(q) if !q.is_empty() => Some(format!("{}?{}", trimmed, q)),
        _ => Some(trimmed.to_string()),
    }
}

/// Parse one listing page of the catalogue.
///
/// Returns the category links found on the page, in document order and
/// without duplicates, together with the current page number and the path
/// of the next listing page when the pagination block advertises one.
/// Malformed or empty HTML yields an empty category list; deciding whether
/// an empty catalogue is an error is left to the traversal.
///
/// # Arguments
/// * `html` - Raw HTML content of the listing page
/// * `base_url` - Base URL of the portal, without a trailing slash
/// * `index_path` - Site-absolute path of the catalogue index
pub fn parse_category_list(
    html: &str,
    base_url: &str,
    index_path: &str,
) -> Result<PaginatedResult<CategoryRef>> {
    let document = Html::parse_document(html);

    let anchor_selector = Selector::parse("a[href]")
        .map_err(|e| MkbError::ParseError(format!("Invalid selector: {:?}", e)))?;

    // Links inside the pagination block are page pointers, not categories
    let pager_links: HashSet<String> = pagination_hrefs(&document)
        .into_iter()
        .filter_map(|href| normalize_href(&href, base_url, index_path))
        .collect();

    let index = {
        let trimmed = index_path.trim_end_matches('/');
        if trimmed.is_empty() {
            "/".to_string()
        } else {
            trimmed.to_string()
        }
    };

    let mut seen = HashSet::new();
    let mut items = Vec::new();
    for anchor in document.select(&anchor_selector) {
        if let Some(category) = parse_category_anchor(&anchor, base_url, index_path) {
            if category.path == index
                || pager_links.contains(&category.path)
                || is_pager_query(&category.path)
            {
                continue;
            }
            if seen.insert(category.path.clone()) {
                items.push(category);
            }
        }
    }

    let next_page = find_next_page(&document, base_url, index_path);
    let current = current_page(&document).unwrap_or(1);

    Ok(PaginatedResult::new(items, current, next_page))
}

/// Parse a single candidate anchor into a category reference.
fn parse_category_anchor(
    anchor: &ElementRef,
    base_url: &str,
    index_path: &str,
) -> Option<CategoryRef> {
    let href = anchor.value().attr("href")?;
    let path = normalize_href(href, base_url, index_path)?;

    let name = normalize_text(&anchor.text().collect::<String>());
    let name = if name.is_empty() {
        // Image-only anchors still need a label for logging
        path.rsplit('/').next().unwrap_or(&path).to_string()
    } else {
        name
    };

    Some(CategoryRef { name, path })
}

/// Whether a normalized path carries a listing pagination query.
fn is_pager_query(path: &str) -> bool {
    let query = match path.split_once('?') {
        Some((_, query)) => query,
        None => return false,
    };
    regex_lite::Regex::new(r"(?:^|&)(?:page|strana)=\d+")
        .map(|re| re.is_match(query))
        .unwrap_or(false)
}
