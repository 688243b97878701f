//! The ingestion pipeline: normalize rows, group them by day, find per-category maxima and scale
//! each day's totals into face geometry.
//!
//! Every call starts from nothing and returns its results by value. Nothing is cached between
//! uploads, so a new upload can never see a previous upload's maxima.

mod aggregate;
mod bounds;
mod digest;
mod scale;
mod summary;

pub use aggregate::{aggregate, AggregateTable, CategoryTotals};
pub use bounds::{compute_global_max, GlobalMaxTable};
pub use digest::{derive_smile_factor, extract_balance, extract_labeled, BALANCE_LABEL};
pub use scale::{scale, FeatureRange, FeatureRanges, VisualParameterSet};
pub use summary::{describe_totals, summarize};

use crate::model::{
    Columns, DateKey, RawRow, RowRules, SignPolicy, Vocabulary, Warning, BUDGET_CATEGORIES,
    HOUSEHOLD_CATEGORIES,
};
use indexmap::IndexMap;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Settings for reading a statement's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct StatementSettings {
    /// The label in front of the figure, `Balance` by default.
    pub label: String,
    /// The balance at which the face reaches its widest grin.
    pub scale_ceiling: f64,
}

impl Default for StatementSettings {
    fn default() -> Self {
        Self {
            label: BALANCE_LABEL.to_string(),
            scale_ceiling: 5000.0,
        }
    }
}

/// Everything that differs between one kind of export and another.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(default)]
pub struct Settings {
    pub columns: Columns,
    pub vocabulary: Vocabulary,
    pub sign_policy: SignPolicy,
    pub features: FeatureRanges,
    pub statement: StatementSettings,
}

impl Default for Settings {
    fn default() -> Self {
        Settings::from_preset(Preset::default())
    }
}

/// Ready-made settings for the category sets the tool knows about.
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
pub enum Preset {
    /// Grocery, Transportation, Go out to eat and Tithing; anything else is dropped.
    #[default]
    Budget,
    /// Housing, Transport, Food and Entertainment; anything else is dropped.
    Household,
    /// Any category is kept; the faces are driven by the budget categories.
    Open,
}

serde_plain::derive_display_from_serialize!(Preset);
serde_plain::derive_fromstr_from_deserialize!(Preset);

impl Settings {
    pub fn from_preset(preset: Preset) -> Self {
        let (vocabulary, features) = match preset {
            Preset::Budget => (
                Vocabulary::closed(BUDGET_CATEGORIES),
                FeatureRanges::for_categories(BUDGET_CATEGORIES),
            ),
            Preset::Household => (
                Vocabulary::closed(HOUSEHOLD_CATEGORIES),
                FeatureRanges::for_categories(HOUSEHOLD_CATEGORIES),
            ),
            Preset::Open => (
                Vocabulary::Open,
                FeatureRanges::for_categories(BUDGET_CATEGORIES),
            ),
        };
        Self {
            columns: Columns::default(),
            vocabulary,
            sign_policy: SignPolicy::default(),
            features,
            statement: StatementSettings::default(),
        }
    }

    pub fn row_rules(&self) -> RowRules<'_> {
        RowRules {
            columns: &self.columns,
            vocabulary: &self.vocabulary,
            sign_policy: self.sign_policy,
        }
    }
}

/// The result of ingesting one tabular upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Ingestion {
    pub table: AggregateTable,
    pub bounds: GlobalMaxTable,
    pub warnings: Vec<Warning>,
}

/// One face per day, in the day order of the `AggregateTable` it came from.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Faces(IndexMap<DateKey, VisualParameterSet>);

impl Faces {
    pub fn get(&self, date: &DateKey) -> Option<&VisualParameterSet> {
        self.0.get(date)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&DateKey, &VisualParameterSet)> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The single face derived from a statement's text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatementFace {
    pub balance: f64,
    /// From `-0.5` (frown) to `0.5` (grin).
    pub smile: f64,
    pub warnings: Vec<Warning>,
    /// The statement text the balance was read from.
    pub text: String,
}

/// Runs uploads through normalization, aggregation, bounds and scaling.
#[derive(Debug, Clone, Default)]
pub struct Pipeline {
    settings: Settings,
}

impl Pipeline {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Aggregates `rows` and computes the per-category maxima over the result.
    pub fn ingest(&self, rows: &[RawRow]) -> Ingestion {
        let (table, warnings) = aggregate(rows, self.settings.row_rules());
        let bounds = compute_global_max(&table, &self.settings.vocabulary);
        debug!(
            "Ingested {} rows into {} dates across {} categories",
            rows.len(),
            table.len(),
            bounds.len()
        );
        for warning in &warnings {
            warn!("{warning}");
        }
        Ingestion {
            table,
            bounds,
            warnings,
        }
    }

    /// Scales each day of `ingestion` into a face.
    pub fn faces(&self, ingestion: &Ingestion) -> Faces {
        Faces(
            ingestion
                .table
                .iter()
                .map(|(date, totals)| {
                    let params =
                        VisualParameterSet::derive(totals, &ingestion.bounds, &self.settings.features);
                    (date.clone(), params)
                })
                .collect(),
        )
    }

    /// Reads the labeled figure from statement text and turns it into a smile.
    pub fn digest(&self, text: &str) -> StatementFace {
        let statement = &self.settings.statement;
        let mut warnings = Vec::new();
        let balance = match extract_labeled(text, &statement.label) {
            Some(balance) => balance,
            None => {
                let warning = Warning::MissingBalance {
                    label: statement.label.clone(),
                };
                warn!("{warning}");
                warnings.push(warning);
                0.0
            }
        };
        let smile = derive_smile_factor(balance, statement.scale_ceiling);
        debug!("Statement balance {balance} gives smile {smile:.3}");
        StatementFace {
            balance,
            smile,
            warnings,
            text: text.to_string(),
        }
    }
}
