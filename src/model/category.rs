use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// The name given to rows with a blank category when the vocabulary is open.
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Which categories the aggregator keeps.
///
/// Serialized as either `"open"` or `{ "closed": ["Housing", "Food"] }`.
#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum Vocabulary {
    /// Every category seen in the input is retained.
    Open,
    /// Only the listed categories are retained; anything else is dropped.
    Closed(Vec<String>),
}

impl Default for Vocabulary {
    fn default() -> Self {
        Vocabulary::closed(BUDGET_CATEGORIES)
    }
}

/// The everyday-budget category set.
pub const BUDGET_CATEGORIES: [&str; 4] = ["Grocery", "Transportation", "Go out to eat", "Tithing"];

/// The household-expense category set.
pub const HOUSEHOLD_CATEGORIES: [&str; 4] = ["Housing", "Transport", "Food", "Entertainment"];

impl Vocabulary {
    pub fn closed<S: Into<String>>(names: impl IntoIterator<Item = S>) -> Self {
        Vocabulary::Closed(names.into_iter().map(Into::into).collect())
    }

    pub fn is_closed(&self) -> bool {
        matches!(self, Vocabulary::Closed(_))
    }

    /// The fixed category list, or `None` for an open vocabulary.
    pub fn known(&self) -> Option<&[String]> {
        match self {
            Vocabulary::Open => None,
            Vocabulary::Closed(names) => Some(names),
        }
    }
}

/// Trims `raw` and checks it against `vocabulary`.
///
/// A closed vocabulary matches case-insensitively and returns its own spelling, so `grocery`
/// and `Grocery ` both land in `Grocery`. Returns `None` when the category is rejected.
pub fn normalize_category(raw: &str, vocabulary: &Vocabulary) -> Option<String> {
    let trimmed = raw.trim();
    match vocabulary {
        Vocabulary::Open if trimmed.is_empty() => Some(UNCATEGORIZED.to_string()),
        Vocabulary::Open => Some(trimmed.to_string()),
        Vocabulary::Closed(names) => names
            .iter()
            .find(|name| name.trim().eq_ignore_ascii_case(trimmed))
            .cloned(),
    }
}
