//! Catalogue export
//!
//! Serializes the aggregated catalogue into the pipe-delimited flat file
//! consumed by downstream tooling. The whole file is rendered in memory
//! and written in one pass, so an aborted run never leaves partial output.

use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tracing::info;

use crate::error::{MkbError, Result};
use crate::types::Entry;

/// Field separator of the output format
pub const DELIMITER: char = '|';

/// Column header written as the first line
pub const HEADER: &str = "code|description_serbian|description_latin";

/// Write the catalogue to `path` as UTF-8 text, one `code|serbian|latin`
/// line per entry under a header line.
///
/// Field values containing the delimiter or a line break would corrupt
/// the format; they are rejected with [`MkbError::InvalidField`] before
/// the file is created. An unwritable path fails with
/// [`MkbError::IoError`] without leaving a partial file behind.
///
/// # Arguments
/// * `path` - Destination file path
/// * `entries` - Aggregated entries, already sorted
pub async fn write_catalog(path: &Path, entries: &[Entry]) -> Result<()> {
    let mut out = String::with_capacity(HEADER.len() + 1 + entries.len() * 64);
    out.push_str(HEADER);
    out.push('\n');

    for entry in entries {
        for field in [&entry.code, &entry.serbian, &entry.latin] {
            if field.contains(DELIMITER) || field.contains('\n') || field.contains('\r') {
                return Err(MkbError::InvalidField {
                    code: entry.code.clone(),
                });
            }
        }
        out.push_str(&format!(
            "{}|{}|{}\n",
            entry.code, entry.serbian, entry.latin
        ));
    }

    let mut file = File::create(path).await?;
    file.write_all(out.as_bytes()).await?;
    file.flush().await?;

    info!("Wrote {} entries to {}", entries.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(code: &str, serbian: &str, latin: &str) -> Entry {
        Entry {
            code: code.to_string(),
            serbian: serbian.to_string(),
            latin: latin.to_string(),
        }
    }

    #[tokio::test]
    async fn test_write_catalog_content() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mkb10.csv");
        let entries = vec![
            entry("A00", "Kolera", "Cholera"),
            entry("A00.0", "Kolera classica", "Cholera classica"),
        ];

        write_catalog(&path, &entries).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(
            written,
            "code|description_serbian|description_latin\n\
             A00|Kolera|Cholera\n\
             A00.0|Kolera classica|Cholera classica\n"
        );
    }

    #[tokio::test]
    async fn test_write_catalog_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("prazno.csv");

        write_catalog(&path, &[]).await.unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert_eq!(written, "code|description_serbian|description_latin\n");
    }

    #[tokio::test]
    async fn test_write_catalog_rejects_delimiter_in_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mkb10.csv");
        let entries = vec![entry("A00", "Kolera | dodatak", "Cholera")];

        let result = write_catalog(&path, &entries).await;

        assert!(matches!(
            result,
            Err(MkbError::InvalidField { code }) if code == "A00"
        ));
        // The invalid field is caught before the file is created
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_write_catalog_rejects_line_break_in_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("mkb10.csv");
        let entries = vec![entry("A00", "Kolera\nCholera", "")];

        let result = write_catalog(&path, &entries).await;

        assert!(matches!(result, Err(MkbError::InvalidField { .. })));
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_write_catalog_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nema/takvog/direktorijuma/mkb10.csv");

        let result = write_catalog(&path, &[entry("A00", "Kolera", "Cholera")]).await;

        assert!(matches!(result, Err(MkbError::IoError(_))));
        assert!(!path.exists());
    }
}
