//! Canonical date keys used to group transactions by day.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// The format every parseable date is rendered to.
pub const CANONICAL_FORMAT: &str = "%m/%d/%Y";

/// Formats tried, in order, when parsing a repaired date string.
const INPUT_FORMATS: &[&str] = &["%m/%d/%Y", "%Y-%m-%d", "%m-%d-%Y", "%Y/%m/%d"];

/// A grouping key for a day. Two raw dates that name the same calendar day always produce the
/// same key. Dates that cannot be parsed still get a key: the repaired raw text.
#[derive(Debug, Clone, Default, Eq, PartialEq, Ord, PartialOrd, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DateKey(String);

impl DateKey {
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parses the key back to a calendar date, if it is one.
    pub fn date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.0, CANONICAL_FORMAT).ok()
    }
}

impl Display for DateKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl AsRef<str> for DateKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// The outcome of normalizing a raw date field.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct NormalizedDate {
    pub key: DateKey,
    /// `None` when the key is a fallback rather than a calendar date.
    pub date: Option<NaiveDate>,
}

impl NormalizedDate {
    pub fn is_calendar_date(&self) -> bool {
        self.date.is_some()
    }
}

/// Normalizes `raw` and reports whether it was understood as a calendar date.
pub fn resolve_date(raw: &str) -> NormalizedDate {
    let repaired = repair(raw.trim());
    match parse(&repaired) {
        Some(date) => NormalizedDate {
            key: DateKey(date.format(CANONICAL_FORMAT).to_string()),
            date: Some(date),
        },
        None => NormalizedDate {
            key: DateKey(repaired),
            date: None,
        },
    }
}

/// Derives the grouping key for a raw date field.
pub fn normalize_date(raw: &str) -> DateKey {
    resolve_date(raw).key
}

/// `MMDDYYYY` becomes `MM/DD/YYYY`; anything else passes through.
fn repair(s: &str) -> String {
    if s.len() == 8 && s.chars().all(|c| c.is_ascii_digit()) {
        format!("{}/{}/{}", &s[0..2], &s[2..4], &s[4..8])
    } else {
        s.to_string()
    }
}

fn parse(s: &str) -> Option<NaiveDate> {
    INPUT_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(s, fmt).ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compact_and_slashed_agree() {
        assert_eq!(normalize_date("01152024"), normalize_date("01/15/2024"));
        assert_eq!(normalize_date("01152024").as_str(), "01/15/2024");
    }

    #[test]
    fn test_iso_is_canonicalized() {
        assert_eq!(normalize_date("2024-01-15").as_str(), "01/15/2024");
        assert_eq!(normalize_date("2024/01/15").as_str(), "01/15/2024");
        assert_eq!(normalize_date("01-15-2024").as_str(), "01/15/2024");
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(normalize_date("  01/15/2024 ").as_str(), "01/15/2024");
    }

    #[test]
    fn test_unparseable_falls_back_to_raw() {
        let resolved = resolve_date("sometime in March");
        assert!(!resolved.is_calendar_date());
        assert_eq!(resolved.key.as_str(), "sometime in March");
    }

    #[test]
    fn test_compact_invalid_date_falls_back_to_repaired() {
        // 13th month: repaired but not a calendar date
        let resolved = resolve_date("13452024");
        assert!(!resolved.is_calendar_date());
        assert_eq!(resolved.key.as_str(), "13/45/2024");
    }

    #[test]
    fn test_key_round_trips_to_date() {
        let key = normalize_date("02292024");
        assert_eq!(key.date(), NaiveDate::from_ymd_opt(2024, 2, 29));
        assert_eq!(normalize_date("garbage").date(), None);
    }
}
