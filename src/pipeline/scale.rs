//! The scaling law that turns category totals into bounded face geometry.

use crate::model::BUDGET_CATEGORIES;
use crate::pipeline::{CategoryTotals, GlobalMaxTable};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Maps `value` into `[min_out, max_out]` by its share of `max_value`.
///
/// `min_out + (max_out - min_out) * clamp(value / max_value, 0, 1)`. A `max_value` that is zero
/// (or negative, or not finite) has no meaningful share, so the ratio is taken as `0` and the
/// result is `min_out`. Every face feature goes through this one function.
pub fn scale(value: f64, max_value: f64, min_out: f64, max_out: f64) -> f64 {
    let ratio = if max_value > 0.0 && max_value.is_finite() {
        value / max_value
    } else {
        0.0
    };
    let ratio = if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(0.0, 1.0)
    };
    min_out + (max_out - min_out) * ratio
}

/// Binds one face feature to the category that drives it and the range it moves through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeatureRange {
    pub category: String,
    pub min: f64,
    pub max: f64,
}

impl FeatureRange {
    pub fn new(category: impl Into<String>, min: f64, max: f64) -> Self {
        Self {
            category: category.into(),
            min,
            max,
        }
    }

    /// Scales this feature's category total for one day against its global maximum. A category
    /// with no total that day counts as `0.0`; one with no maximum scales to `min`.
    pub fn apply(&self, totals: &CategoryTotals, bounds: &GlobalMaxTable) -> f64 {
        let value = totals.get(&self.category).unwrap_or(0.0);
        let max_value = bounds.get(&self.category).unwrap_or(0.0);
        scale(value, max_value, self.min, self.max)
    }
}

/// The four feature bindings of a face.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct FeatureRanges {
    /// Vertical radius of the face outline.
    pub face_radius_y: FeatureRange,
    /// Horizontal radius of each eye.
    pub eye_radius_x: FeatureRange,
    /// Width of the mouth.
    pub mouth_width: FeatureRange,
    /// How far the eyebrows sit above the eyes.
    pub eyebrow_y: FeatureRange,
}

impl FeatureRanges {
    /// Binds the four features, in order, to the given categories using the default ranges.
    pub fn for_categories(categories: [&str; 4]) -> Self {
        let [face, eye, mouth, eyebrow] = categories;
        Self {
            face_radius_y: FeatureRange::new(face, 80.0, 120.0),
            eye_radius_x: FeatureRange::new(eye, 6.0, 16.0),
            mouth_width: FeatureRange::new(mouth, 20.0, 70.0),
            eyebrow_y: FeatureRange::new(eyebrow, 12.0, 30.0),
        }
    }

    pub fn categories(&self) -> [&str; 4] {
        [
            self.face_radius_y.category.as_str(),
            self.eye_radius_x.category.as_str(),
            self.mouth_width.category.as_str(),
            self.eyebrow_y.category.as_str(),
        ]
    }
}

impl Default for FeatureRanges {
    fn default() -> Self {
        Self::for_categories(BUDGET_CATEGORIES)
    }
}

/// Derived geometry for one face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisualParameterSet {
    pub face_radius_y: f64,
    pub eye_radius_x: f64,
    pub mouth_width: f64,
    pub eyebrow_y: f64,
}

impl VisualParameterSet {
    pub fn derive(totals: &CategoryTotals, bounds: &GlobalMaxTable, ranges: &FeatureRanges) -> Self {
        Self {
            face_radius_y: ranges.face_radius_y.apply(totals, bounds),
            eye_radius_x: ranges.eye_radius_x.apply(totals, bounds),
            mouth_width: ranges.mouth_width.apply(totals, bounds),
            eyebrow_y: ranges.eyebrow_y.apply(totals, bounds),
        }
    }

    /// The face drawn when there is no data: every feature at its minimum.
    pub fn neutral(ranges: &FeatureRanges) -> Self {
        Self {
            face_radius_y: ranges.face_radius_y.min,
            eye_radius_x: ranges.eye_radius_x.min,
            mouth_width: ranges.mouth_width.min,
            eyebrow_y: ranges.eyebrow_y.min,
        }
    }
}
