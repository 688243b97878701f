//! Reading uploads off disk: CSV exports become rows, PDF statements become text.
//!
//! Tokenizing CSV and pulling text out of PDF pages are left to the `csv` and `pdf-extract`
//! crates. Both are blocking, so they run on tokio's blocking pool.

use crate::model::RawRow;
use crate::Result;
use anyhow::{anyhow, Context};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

/// The kind of file being uploaded.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "lowercase")]
pub enum InputKind {
    /// A tabular transaction export with a header row.
    #[default]
    Csv,
    /// A statement whose text is searched for a labeled balance.
    Pdf,
}

serde_plain::derive_display_from_serialize!(InputKind);
serde_plain::derive_fromstr_from_deserialize!(InputKind);

impl InputKind {
    /// `.pdf` (any case) is a statement, everything else is treated as CSV.
    pub fn infer(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("pdf") => InputKind::Pdf,
            _ => InputKind::Csv,
        }
    }
}

/// One upload, either still on disk or already extracted.
#[derive(Debug, Clone, PartialEq)]
pub enum Source {
    Csv(PathBuf),
    Pdf(PathBuf),
    Rows(Vec<RawRow>),
    Text(String),
}

/// What a `Source` yields once its file has been read.
#[derive(Debug, Clone, PartialEq)]
pub enum Extracted {
    Rows(Vec<RawRow>),
    Text(String),
}

impl Source {
    /// Builds a file source, inferring the kind from the extension unless one is given.
    pub fn from_path(path: impl Into<PathBuf>, kind: Option<InputKind>) -> Self {
        let path = path.into();
        match kind.unwrap_or_else(|| InputKind::infer(&path)) {
            InputKind::Csv => Source::Csv(path),
            InputKind::Pdf => Source::Pdf(path),
        }
    }

    pub async fn extract(self) -> Result<Extracted> {
        match self {
            Source::Csv(path) => read_rows(&path).await.map(Extracted::Rows),
            Source::Pdf(path) => read_text(&path).await.map(Extracted::Text),
            Source::Rows(rows) => Ok(Extracted::Rows(rows)),
            Source::Text(text) => Ok(Extracted::Text(text)),
        }
    }
}

async fn read_bytes(path: &Path) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .with_context(|| format!("Unable to read {}", path.display()))
}

/// Reads a headered CSV file into rows.
pub async fn read_rows(path: &Path) -> Result<Vec<RawRow>> {
    let bytes = read_bytes(path).await?;
    let rows = tokio::task::spawn_blocking(move || RawRow::read_csv(bytes.as_slice()))
        .await
        .context("CSV reader task failed")?
        .with_context(|| format!("Unable to parse CSV file {}", path.display()))?;
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Extracts the text of every page of a PDF, in page order.
pub async fn read_text(path: &Path) -> Result<String> {
    let bytes = read_bytes(path).await?;
    let text = tokio::task::spawn_blocking(move || pdf_extract::extract_text_from_mem(&bytes))
        .await
        .context("PDF extraction task failed")?
        .map_err(|e| anyhow!("{e:?}"))
        .with_context(|| format!("Unable to extract text from {}", path.display()))?;
    debug!("Extracted {} bytes of text from {}", text.len(), path.display());
    Ok(text)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_infer() {
        assert_eq!(InputKind::infer(Path::new("may.PDF")), InputKind::Pdf);
        assert_eq!(InputKind::infer(Path::new("may.csv")), InputKind::Csv);
        assert_eq!(InputKind::infer(Path::new("export")), InputKind::Csv);
    }

    #[test]
    fn test_from_path_override() {
        let source = Source::from_path("statement.txt", Some(InputKind::Pdf));
        assert_eq!(source, Source::Pdf(PathBuf::from("statement.txt")));
    }

    #[tokio::test]
    async fn test_read_rows() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("export.csv");
        tokio::fs::write(&path, "Date,Category,Amount\n01/01/2024,Grocery,$5\n")
            .await
            .unwrap();
        let extracted = Source::from_path(&path, None).extract().await.unwrap();
        match extracted {
            Extracted::Rows(rows) => {
                assert_eq!(rows.len(), 1);
                assert_eq!(rows[0].get("Amount"), Some("$5"));
            }
            Extracted::Text(_) => panic!("expected rows"),
        }
    }

    #[tokio::test]
    async fn test_missing_file_is_an_error() {
        let dir = TempDir::new().unwrap();
        let result = read_rows(&dir.path().join("nope.csv")).await;
        let message = format!("{:#}", result.unwrap_err());
        assert!(message.contains("nope.csv"));
    }

    #[tokio::test]
    async fn test_not_a_pdf_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("fake.pdf");
        tokio::fs::write(&path, "Balance: 10").await.unwrap();
        assert!(read_text(&path).await.is_err());
    }
}
