use crate::model::{format_money, Warning};
use crate::pipeline::{AggregateTable, CategoryTotals, GlobalMaxTable, Ingestion, StatementFace};
use std::fmt::Write;

fn totals_line<'a>(totals: impl Iterator<Item = (&'a str, f64)>) -> String {
    let parts: Vec<String> = totals
        .map(|(category, total)| format!("{category} {}", format_money(total)))
        .collect();
    if parts.is_empty() {
        String::from("(none)")
    } else {
        parts.join(", ")
    }
}

/// A day's totals on one line, e.g. `Grocery $150.00, Tithing $10.00`.
pub fn describe_totals(totals: &CategoryTotals) -> String {
    totals_line(totals.iter())
}

/// A plain-text rendition of the aggregated totals, one day per line in display order,
/// followed by the per-category maxima and any warnings.
pub fn summarize(table: &AggregateTable, bounds: &GlobalMaxTable, warnings: &[Warning]) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{} {}",
        table.len(),
        if table.len() == 1 { "date" } else { "dates" }
    );
    for (date, totals) in table.iter() {
        let _ = writeln!(out, "{date}: {}", describe_totals(totals));
    }
    let _ = writeln!(out, "max: {}", totals_line(bounds.iter()));
    for warning in warnings {
        let _ = writeln!(out, "warning: {warning}");
    }
    out
}

impl Ingestion {
    pub fn summary(&self) -> String {
        summarize(&self.table, &self.bounds, &self.warnings)
    }
}

impl StatementFace {
    pub fn summary(&self) -> String {
        let mut out = format!(
            "balance: {}\nsmile: {:.2}\n",
            format_money(self.balance),
            self.smile
        );
        for warning in &self.warnings {
            let _ = writeln!(out, "warning: {warning}");
        }
        let text = self.text.trim();
        if text.is_empty() {
            out.push_str("text: (empty)\n");
        } else {
            let _ = writeln!(out, "text:\n{text}");
        }
        out
    }
}
