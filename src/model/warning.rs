use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// A recoverable problem found while ingesting a file. Warnings never stop ingestion; each one
/// describes the default that was used instead.
///
/// `row` is the 1-based position of the record among the data rows (the header is not counted).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "kind")]
pub enum Warning {
    /// The amount was blank or could not be read, and counted as zero.
    UnparseableAmount { row: usize, raw: String },
    /// The date could not be read and the raw text was used as the grouping key.
    UnparseableDate { row: usize, raw: String },
    /// The category is not in the closed vocabulary and the row was dropped.
    UnknownCategory { row: usize, category: String },
    /// A configured column is absent from the input; its cells were treated as empty.
    MissingColumn { column: String },
    /// No labeled figure was found in the statement text; zero was used.
    MissingBalance { label: String },
}

impl Display for Warning {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Warning::UnparseableAmount { row, raw } if raw.trim().is_empty() => {
                write!(f, "row {row}: amount is blank, counted as 0")
            }
            Warning::UnparseableAmount { row, raw } => {
                write!(f, "row {row}: amount '{raw}' is not a number, counted as 0")
            }
            Warning::UnparseableDate { row, raw } => {
                write!(f, "row {row}: date '{raw}' is not a calendar date, grouped as-is")
            }
            Warning::UnknownCategory { row, category } => {
                write!(f, "row {row}: category '{category}' is not known, row dropped")
            }
            Warning::MissingColumn { column } => {
                write!(f, "column '{column}' is missing from the input")
            }
            Warning::MissingBalance { label } => {
                write!(f, "no '{label}:' figure found, using 0")
            }
        }
    }
}
