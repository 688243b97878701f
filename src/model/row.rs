use crate::Result;
use anyhow::Context;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::Read;

/// One record from a tabular export: column name to raw cell text, in file column order.
#[derive(Debug, Clone, Default, Eq, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawRow(IndexMap<String, String>);

impl RawRow {
    /// Builds a row from `(column, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self(
            pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }

    pub fn get(&self, column: &str) -> Option<&str> {
        self.0.get(column).map(String::as_str)
    }

    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Reads every record of a headered CSV into rows.
    ///
    /// Headers are trimmed (and stripped of a byte-order mark) so that `" Amount"` still matches
    /// the `Amount` column. Short records are allowed; the missing cells are simply absent.
    pub fn read_csv(reader: impl Read) -> Result<Vec<RawRow>> {
        let mut rdr = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_reader(reader);

        let headers: Vec<String> = rdr
            .headers()
            .context("Unable to read the CSV header row")?
            .iter()
            .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for (ix, result) in rdr.records().enumerate() {
            let record = result.with_context(|| format!("Malformed CSV record at row {}", ix + 2))?;
            if record.iter().all(|cell| cell.is_empty()) {
                continue;
            }
            let row = RawRow::from_pairs(
                headers
                    .iter()
                    .zip(record.iter())
                    .map(|(h, v)| (h.clone(), v.to_string())),
            );
            rows.push(row);
        }
        Ok(rows)
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for RawRow {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        RawRow::from_pairs(iter)
    }
}
