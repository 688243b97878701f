//! Groups normalized transactions by day and sums them per category.

use crate::model::{DateKey, NormalizedTransaction, RawRow, RowRules, Warning};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Accumulated totals for one day, keyed by category in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CategoryTotals(IndexMap<String, f64>);

impl CategoryTotals {
    pub fn get(&self, category: &str) -> Option<f64> {
        self.0.get(category).copied()
    }

    pub fn add(&mut self, category: impl Into<String>, amount: f64) {
        *self.0.entry(category.into()).or_insert(0.0) += amount;
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for CategoryTotals {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        let mut totals = CategoryTotals::default();
        for (category, amount) in iter {
            totals.add(category, amount);
        }
        totals
    }
}

/// Per-day category totals. Days iterate in the order they were first seen in the input,
/// which is the order faces are displayed in.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateTable(IndexMap<DateKey, CategoryTotals>);

impl AggregateTable {
    pub fn get(&self, date: &DateKey) -> Option<&CategoryTotals> {
        self.0.get(date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &CategoryTotals)> {
        self.0.iter()
    }

    pub fn dates(&self) -> impl Iterator<Item = &DateKey> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn add(&mut self, tx: NormalizedTransaction) {
        self.0
            .entry(tx.date)
            .or_default()
            .add(tx.category, tx.amount);
    }
}

impl FromIterator<(DateKey, CategoryTotals)> for AggregateTable {
    fn from_iter<T: IntoIterator<Item = (DateKey, CategoryTotals)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// Builds the table in a single pass over `rows`.
///
/// Malformed rows never abort the pass: they contribute what could be recovered and leave a
/// `Warning` behind. Rows whose category is rejected do not create a day entry.
pub fn aggregate(rows: &[RawRow], rules: RowRules<'_>) -> (AggregateTable, Vec<Warning>) {
    let mut table = AggregateTable::default();
    let mut warnings = missing_columns(rows, rules);
    let no_amounts = warnings.iter().any(
        |w| matches!(w, Warning::MissingColumn { column } if *column == rules.columns.amount),
    );

    for (ix, raw) in rows.iter().enumerate() {
        if let Some(tx) = NormalizedTransaction::from_row(raw, ix + 1, rules, &mut warnings) {
            trace!("{} {} += {}", tx.date, tx.category, tx.amount);
            table.add(tx);
        }
    }

    // a missing amount column is reported once, not once per row
    if no_amounts {
        warnings.retain(|w| !matches!(w, Warning::UnparseableAmount { .. }));
    }

    (table, warnings)
}

/// One warning per configured column that no row carries.
fn missing_columns(rows: &[RawRow], rules: RowRules<'_>) -> Vec<Warning> {
    if rows.is_empty() {
        return Vec::new();
    }
    rules
        .columns
        .iter()
        .filter(|column| rows.iter().all(|row| row.get(column).is_none()))
        .map(|column| Warning::MissingColumn {
            column: column.to_string(),
        })
        .collect()
}
