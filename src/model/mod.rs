//! Types that represent the data being ingested, such as `RawRow` and `NormalizedTransaction`,
//! along with the field normalizers that produce them.
mod amount;
mod category;
mod date;
mod row;
mod transaction;
mod warning;

pub use amount::{format_money, normalize_amount, Amount, AmountError};
pub use category::{
    normalize_category, Vocabulary, BUDGET_CATEGORIES, HOUSEHOLD_CATEGORIES, UNCATEGORIZED,
};
pub use date::{normalize_date, resolve_date, DateKey, NormalizedDate, CANONICAL_FORMAT};
pub use row::RawRow;
pub use transaction::{Columns, NormalizedTransaction, RowRules, SignPolicy};
pub use warning::Warning;
