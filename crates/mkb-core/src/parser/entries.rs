//! Diagnosis entry parser for catalogue category pages
//!
//! Extracts `code / Serbian description / Latin description` rows from a
//! category page. The portal has changed its markup over the years, so
//! extraction tries several strategies in order and the first one that
//! yields entries wins:
//! - Bootstrap `list-group` rows (current portal markup)
//! - plain tables
//! - blocks with `mkb` classes (older markup)
//! - raw text lines

use scraper::{ElementRef, Html, Selector};

use crate::error::{MkbError, Result};
use crate::types::Entry;

/// Check whether a string is a well-formed MKB-10 code.
///
/// Codes are one or two uppercase letters, two digits and an optional
/// dot-separated alphanumeric suffix.
///
/// # Arguments
/// * `value` - Candidate string to check
///
/// # Examples
/// ```
/// use mkb_core::parser::is_code;
///
/// assert!(is_code("A00"));
/// assert!(is_code("A00.0"));
/// assert!(is_code("J12.8"));
/// assert!(!is_code("a00"));
/// assert!(!is_code("A0"));
/// assert!(!is_code("Šifra"));
/// ```
pub fn is_code(value: &str) -> bool {
    regex_lite::Regex::new(r"^[A-Z]{1,2}\d{2}(?:\.[0-9A-Z]{1,4})?$")
        .map(|re| re.is_match(value))
        .unwrap_or(false)
}

/// Strip a leading field label from a cell value.
///
/// The portal sometimes prefixes values with `Šifra:`, `Naziv:`, `Opis:`
/// or `Latinski:` (with `:` or `-` as the separator); the label carries no
/// information and is removed.
///
/// # Arguments
/// * `value` - Cell text, already whitespace-normalized
///
/// # Examples
/// ```
/// use mkb_core::parser::strip_labels;
///
/// assert_eq!(strip_labels("Naziv: tekst"), "tekst");
/// assert_eq!(strip_labels("latinski - tekst"), "tekst");
/// assert_eq!(strip_labels("tekst"), "tekst");
/// ```
pub fn strip_labels(value: &str) -> String {
    // `Š` is outside the ASCII-only case folding of (?i), so both cases
    // are spelled out explicitly.
    let re = regex_lite::Regex::new(r"(?i)^\s*(?:[šŠsS]ifra|naziv|opis|latinski)\s*[:\-]\s*");
    match re {
        Ok(re) => re.replace(value, "").trim().to_string(),
        Err(_) => value.trim().to_string(),
    }
}

/// Collapse whitespace runs into single spaces and trim.
pub(crate) fn normalize_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Parse every diagnosis entry on a category page.
///
/// Entries are returned in document order. A row with a missing Serbian
/// or Latin description yields an empty string for that field rather than
/// failing the page; a page with no recognizable rows yields an empty
/// vector.
///
/// # Arguments
/// * `html` - Raw HTML content of the category page
///
/// # Returns
/// * `Ok(Vec<Entry>)` with the parsed entries
/// * `Err(MkbError)` if parsing fails
pub fn parse_entries(html: &str) -> Result<Vec<Entry>> {
    let document = Html::parse_document(html);

    let entries = parse_from_list_groups(&document)?;
    if !entries.is_empty() {
        return Ok(entries);
    }

    let entries = parse_from_tables(&document)?;
    if !entries.is_empty() {
        return Ok(entries);
    }

    let entries = parse_from_structured_blocks(&document)?;
    if !entries.is_empty() {
        return Ok(entries);
    }

    parse_from_text_lines(&document)
}

/// Parse Bootstrap list-group rows: the code sits in a `col_first` column
/// and the `col_last` column holds the Serbian name in a `<strong>` with
/// the Latin text after it.
fn parse_from_list_groups(document: &Html) -> Result<Vec<Entry>> {
    let item_selector = Selector::parse("ul.list-group li.list-group-item")
        .map_err(|e| MkbError::ParseError(format!("Invalid selector: {:?}", e)))?;

    let mut entries = Vec::new();
    for item in document.select(&item_selector) {
        if let Some(entry) = parse_list_group_item(&item) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Parse a single list-group row into an entry.
fn parse_list_group_item(item: &ElementRef) -> Option<Entry> {
    let code_selector = Selector::parse("[class*='col_first']").ok()?;
    let desc_selector = Selector::parse("[class*='col_last']").ok()?;
    let strong_selector = Selector::parse("strong").ok()?;

    let code_el = item.select(&code_selector).next()?;
    let code = strip_labels(&normalize_text(&code_el.text().collect::<String>()));
    if !is_code(&code) {
        return None;
    }

    let desc = match item.select(&desc_selector).next() {
        Some(el) => el,
        None => {
            return Some(Entry {
                code,
                serbian: String::new(),
                latin: String::new(),
            });
        }
    };

    let full_text = normalize_text(&desc.text().collect::<String>());
    let strong_text = desc
        .select(&strong_selector)
        .next()
        .map(|el| normalize_text(&el.text().collect::<String>()))
        .unwrap_or_default();

    if strong_text.is_empty() {
        // No highlighted Serbian name; the whole column is the description
        return Some(Entry {
            code,
            serbian: strip_labels(&full_text),
            latin: String::new(),
        });
    }

    // The Latin text is whatever follows the highlighted Serbian name
    let latin = match full_text.strip_prefix(&strong_text) {
        Some(rest) => rest.trim().to_string(),
        None => full_text.replacen(&strong_text, "", 1).trim().to_string(),
    };

    Some(Entry {
        code,
        serbian: strip_labels(&strong_text),
        latin: strip_labels(&latin),
    })
}

/// Parse classic `<table>` rows of code / Serbian / Latin cells.
fn parse_from_tables(document: &Html) -> Result<Vec<Entry>> {
    let row_selector = Selector::parse("table tr")
        .map_err(|e| MkbError::ParseError(format!("Invalid selector: {:?}", e)))?;
    let cell_selector = Selector::parse("td, th")
        .map_err(|e| MkbError::ParseError(format!("Invalid selector: {:?}", e)))?;

    let mut entries = Vec::new();
    for row in document.select(&row_selector) {
        let cells: Vec<String> = row
            .select(&cell_selector)
            .map(|cell| strip_labels(&normalize_text(&cell.text().collect::<String>())))
            .collect();
        if cells.len() < 2 {
            continue;
        }

        // Header rows ("Šifra | Naziv | Latinski") fail the code check
        let code = cells[0].clone();
        if !is_code(&code) {
            continue;
        }
        let serbian = cells[1].clone();
        let latin = cells.get(2).cloned().unwrap_or_default();
        entries.push(Entry {
            code,
            serbian,
            latin,
        });
    }
    Ok(entries)
}

/// Parse older markup: `div`/`li` blocks with `mkb` classes and labelled
/// child elements for each field.
fn parse_from_structured_blocks(document: &Html) -> Result<Vec<Entry>> {
    let block_selector = Selector::parse("div[class*='mkb'], li[class*='mkb']")
        .map_err(|e| MkbError::ParseError(format!("Invalid selector: {:?}", e)))?;

    let mut entries = Vec::new();
    for block in document.select(&block_selector) {
        if let Some(entry) = parse_structured_block(&block) {
            entries.push(entry);
        }
    }
    Ok(entries)
}

/// Parse one `mkb`-classed block into an entry.
fn parse_structured_block(block: &ElementRef) -> Option<Entry> {
    let code_selector =
        Selector::parse("[class*='sifra'], [class*='code'], [class*='oznaka']").ok()?;
    let serbian_selector =
        Selector::parse("[class*='sr'], [class*='opis'], [class*='naziv']").ok()?;
    let latin_selector = Selector::parse("[class*='lat']").ok()?;

    let code_el = block.select(&code_selector).next()?;
    let code = strip_labels(&normalize_text(&code_el.text().collect::<String>()));
    if !is_code(&code) {
        return None;
    }

    let serbian = block
        .select(&serbian_selector)
        .find(|el| el.id() != code_el.id())
        .map(|el| strip_labels(&normalize_text(&el.text().collect::<String>())))
        .unwrap_or_default();
    let latin = block
        .select(&latin_selector)
        .find(|el| el.id() != code_el.id())
        .map(|el| strip_labels(&normalize_text(&el.text().collect::<String>())))
        .unwrap_or_default();

    Some(Entry {
        code,
        serbian,
        latin,
    })
}

/// Last resort: scan the page text line by line for `CODE description`
/// rows, splitting descriptions on runs of whitespace.
fn parse_from_text_lines(document: &Html) -> Result<Vec<Entry>> {
    let line_re = regex_lite::Regex::new(r"^([A-Z]{1,2}\d{2}(?:\.[0-9A-Z]{1,4})?)\s+(.+)$")
        .map_err(|e| MkbError::ParseError(format!("Invalid pattern: {}", e)))?;
    let field_re = regex_lite::Regex::new(r"\s{2,}\|\s{2,}|\s{2,}")
        .map_err(|e| MkbError::ParseError(format!("Invalid pattern: {}", e)))?;

    let text = document.root_element().text().collect::<Vec<_>>().join("\n");

    let mut entries = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        let caps = match line_re.captures(line) {
            Some(caps) => caps,
            None => continue,
        };
        let (code, rest) = match (caps.get(1), caps.get(2)) {
            (Some(code), Some(rest)) => (code.as_str(), rest.as_str()),
            _ => continue,
        };

        let mut parts = field_re
            .split(rest)
            .map(str::trim)
            .filter(|part| !part.is_empty());
        let serbian = parts.next().unwrap_or("").to_string();
        let latin = parts.next().unwrap_or("").to_string();
        entries.push(Entry {
            code: code.to_string(),
            serbian,
            latin,
        });
    }
    Ok(entries)
}
