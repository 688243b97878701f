use crate::model::{normalize_category, resolve_date, Amount, DateKey, RawRow, Vocabulary, Warning};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// How the sign of an amount is treated before it is added to a category total.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    JsonSchema,
    clap::ValueEnum,
)]
#[serde(rename_all = "snake_case")]
pub enum SignPolicy {
    /// Default: only the magnitude counts, so refunds and withdrawals both grow the total.
    #[default]
    Absolute,
    /// Negative amounts subtract from the total.
    Signed,
    /// Negative amounts count as zero.
    SignedFloorZero,
}

serde_plain::derive_display_from_serialize!(SignPolicy);
serde_plain::derive_fromstr_from_deserialize!(SignPolicy);

impl SignPolicy {
    pub fn apply(&self, amount: Amount) -> f64 {
        match self {
            SignPolicy::Absolute => amount.magnitude(),
            SignPolicy::Signed => amount.to_f64(),
            SignPolicy::SignedFloorZero => amount.to_f64().max(0.0),
        }
    }
}

/// The names of the columns the aggregator reads.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Columns {
    pub date: String,
    pub category: String,
    pub amount: String,
}

impl Default for Columns {
    fn default() -> Self {
        Self {
            date: "Date".to_string(),
            category: "Category".to_string(),
            amount: "Amount".to_string(),
        }
    }
}

impl Columns {
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        [
            self.date.as_str(),
            self.category.as_str(),
            self.amount.as_str(),
        ]
        .into_iter()
    }
}

/// A transaction after its fields have been coerced to typed values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NormalizedTransaction {
    pub date: DateKey,
    pub category: String,
    pub amount: f64,
}

/// Everything `NormalizedTransaction::from_row` needs to know about the input's shape.
#[derive(Debug, Clone, Copy)]
pub struct RowRules<'a> {
    pub columns: &'a Columns,
    pub vocabulary: &'a Vocabulary,
    pub sign_policy: SignPolicy,
}

impl NormalizedTransaction {
    /// Normalizes one raw row. `row` is the 1-based data row number used in warnings.
    ///
    /// Returns `None` only when the category is rejected by a closed vocabulary. A blank or bad
    /// amount becomes `0.0` and a bad date keeps its raw text as the key; both push a warning.
    pub fn from_row(
        raw: &RawRow,
        row: usize,
        rules: RowRules<'_>,
        warnings: &mut Vec<Warning>,
    ) -> Option<Self> {
        let raw_category = raw.get(&rules.columns.category).unwrap_or_default();
        let category = match normalize_category(raw_category, rules.vocabulary) {
            Some(c) => c,
            None => {
                warnings.push(Warning::UnknownCategory {
                    row,
                    category: raw_category.trim().to_string(),
                });
                return None;
            }
        };

        let raw_date = raw.get(&rules.columns.date).unwrap_or_default();
        let date = resolve_date(raw_date);
        if !date.is_calendar_date() {
            warnings.push(Warning::UnparseableDate {
                row,
                raw: raw_date.to_string(),
            });
        }

        let raw_amount = raw.get(&rules.columns.amount).unwrap_or_default();
        let amount = match Amount::from_str(raw_amount) {
            Ok(amount) if !raw_amount.trim().is_empty() => rules.sign_policy.apply(amount),
            _ => {
                warnings.push(Warning::UnparseableAmount {
                    row,
                    raw: raw_amount.to_string(),
                });
                0.0
            }
        };

        Some(Self {
            date: date.key,
            category,
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rules<'a>(columns: &'a Columns, vocabulary: &'a Vocabulary) -> RowRules<'a> {
        RowRules {
            columns,
            vocabulary,
            sign_policy: SignPolicy::default(),
        }
    }

    #[test]
    fn test_sign_policies() {
        let refund = Amount::from_str("-$20.00").unwrap();
        assert_eq!(SignPolicy::Absolute.apply(refund), 20.0);
        assert_eq!(SignPolicy::Signed.apply(refund), -20.0);
        assert_eq!(SignPolicy::SignedFloorZero.apply(refund), 0.0);

        let spend = Amount::from_str("$20.00").unwrap();
        assert_eq!(SignPolicy::SignedFloorZero.apply(spend), 20.0);
    }

    #[test]
    fn test_sign_policy_strings() {
        assert_eq!(SignPolicy::SignedFloorZero.to_string(), "signed_floor_zero");
        assert_eq!(SignPolicy::from_str("signed").unwrap(), SignPolicy::Signed);
    }

    #[test]
    fn test_from_row() {
        let columns = Columns::default();
        let vocabulary = Vocabulary::default();
        let raw = RawRow::from_pairs([
            ("Date", "01152024"),
            ("Category", "grocery"),
            ("Amount", "$1,234.56"),
        ]);
        let mut warnings = Vec::new();
        let tx = NormalizedTransaction::from_row(&raw, 1, rules(&columns, &vocabulary), &mut warnings)
            .unwrap();
        assert!(warnings.is_empty());
        assert_eq!(tx.date.as_str(), "01/15/2024");
        assert_eq!(tx.category, "Grocery");
        assert_eq!(tx.amount, 1234.56);
    }

    #[test]
    fn test_from_row_soft_failures() {
        let columns = Columns::default();
        let vocabulary = Vocabulary::Open;
        let raw = RawRow::from_pairs([("Date", "whenever"), ("Category", "Pets"), ("Amount", "??")]);
        let mut warnings = Vec::new();
        let tx = NormalizedTransaction::from_row(&raw, 4, rules(&columns, &vocabulary), &mut warnings)
            .unwrap();
        assert_eq!(tx.amount, 0.0);
        assert_eq!(tx.date.as_str(), "whenever");
        assert_eq!(
            warnings,
            vec![
                Warning::UnparseableDate {
                    row: 4,
                    raw: "whenever".to_string()
                },
                Warning::UnparseableAmount {
                    row: 4,
                    raw: "??".to_string()
                },
            ]
        );
    }

    #[test]
    fn test_from_row_unknown_category() {
        let columns = Columns::default();
        let vocabulary = Vocabulary::default();
        let raw = RawRow::from_pairs([("Date", "01/01/2024"), ("Category", "Pets"), ("Amount", "1")]);
        let mut warnings = Vec::new();
        let tx = NormalizedTransaction::from_row(&raw, 2, rules(&columns, &vocabulary), &mut warnings);
        assert!(tx.is_none());
        assert_eq!(
            warnings,
            vec![Warning::UnknownCategory {
                row: 2,
                category: "Pets".to_string()
            }]
        );
    }

    #[test]
    fn test_columns_default_deserialize() {
        let columns: Columns = serde_json::from_str(r#"{"amount":"Debit"}"#).unwrap();
        assert_eq!(columns.amount, "Debit");
        assert_eq!(columns.date, "Date");
    }
}
