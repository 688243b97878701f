use crate::model::Vocabulary;
use crate::pipeline::AggregateTable;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// The largest daily total seen for each category across the whole upload.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GlobalMaxTable(IndexMap<String, f64>);

impl GlobalMaxTable {
    pub fn get(&self, category: &str) -> Option<f64> {
        self.0.get(category).copied()
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

    fn observe(&mut self, category: &str, total: f64) {
        let max = self.0.entry(category.to_string()).or_insert(total);
        if total > *max {
            *max = total;
        }
    }
}

/// Scans `table` once, in O(dates × categories).
///
/// With a closed vocabulary every known category gets an entry and a day that lacks the
/// category counts as `0.0` for it; an empty table gives `0.0` for every known category. With an open vocabulary only observed totals count, so a
/// category never seen has no entry at all.
pub fn compute_global_max(table: &AggregateTable, vocabulary: &Vocabulary) -> GlobalMaxTable {
    let mut max = GlobalMaxTable::default();
    match vocabulary.known() {
        Some(known) => {
            for category in known {
                if table.is_empty() {
                    max.observe(category, 0.0);
                }
                for (_, totals) in table.iter() {
                    max.observe(category, totals.get(category).unwrap_or(0.0));
                }
            }
        }
        None => {
            for (_, totals) in table.iter() {
                for (category, total) in totals.iter() {
                    max.observe(category, total);
                }
            }
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::normalize_date;
    use crate::pipeline::CategoryTotals;

    fn table(days: Vec<(&str, Vec<(&str, f64)>)>) -> AggregateTable {
        days.into_iter()
            .map(|(date, totals)| {
                (
                    normalize_date(date),
                    totals.into_iter().collect::<CategoryTotals>(),
                )
            })
            .collect()
    }

    #[test]
    fn test_single_day_equals_its_totals() {
        let t = table(vec![("01/01/2024", vec![("Food", 12.5), ("Fun", 3.0)])]);
        let max = compute_global_max(&t, &Vocabulary::Open);
        let totals = t.get(&normalize_date("01/01/2024")).unwrap();
        assert_eq!(max.len(), totals.len());
        for (category, total) in totals.iter() {
            assert_eq!(max.get(category), Some(total));
        }
    }

    #[test]
    fn test_max_across_days() {
        let t = table(vec![
            ("01/01/2024", vec![("Grocery", 150.0)]),
            ("01/02/2024", vec![("Grocery", 300.0), ("Tithing", 20.0)]),
            ("01/03/2024", vec![("Grocery", 10.0)]),
        ]);
        let max = compute_global_max(&t, &Vocabulary::Open);
        assert_eq!(max.get("Grocery"), Some(300.0));
        assert_eq!(max.get("Tithing"), Some(20.0));
    }

    #[test]
    fn test_closed_vocabulary_counts_absence_as_zero() {
        // Signed totals: absence beats an all-negative category
        let t = table(vec![
            ("01/01/2024", vec![("Food", -5.0)]),
            ("01/02/2024", vec![("Housing", 10.0)]),
        ]);
        let closed = Vocabulary::closed(["Housing", "Food", "Transport"]);
        let max = compute_global_max(&t, &closed);
        assert_eq!(max.get("Food"), Some(0.0));
        assert_eq!(max.get("Housing"), Some(10.0));
        assert_eq!(max.get("Transport"), Some(0.0));

        let open = compute_global_max(&t, &Vocabulary::Open);
        assert_eq!(open.get("Food"), Some(-5.0));
        assert_eq!(open.get("Transport"), None);
    }

    #[test]
    fn test_closed_vocabulary_keeps_negative_max_when_always_present() {
        let t = table(vec![
            ("01/01/2024", vec![("Food", -5.0)]),
            ("01/02/2024", vec![("Food", -3.0)]),
        ]);
        let closed = compute_global_max(&t, &Vocabulary::closed(["Food", "Housing"]));
        assert_eq!(closed.get("Food"), Some(-3.0));
        assert_eq!(closed.get("Housing"), Some(0.0));
        assert_eq!(closed.get("Food"), compute_global_max(&t, &Vocabulary::Open).get("Food"));
    }

    #[test]
    fn test_all_zero_is_exactly_zero() {
        let t = table(vec![("01/01/2024", vec![("Food", 0.0)]), ("01/02/2024", vec![("Food", 0.0)])]);
        let max = compute_global_max(&t, &Vocabulary::Open);
        assert_eq!(max.get("Food"), Some(0.0));
    }

    #[test]
    fn test_empty_table() {
        let t = AggregateTable::default();
        assert!(compute_global_max(&t, &Vocabulary::Open).is_empty());
        let closed = compute_global_max(&t, &Vocabulary::default());
        assert_eq!(closed.len(), 4);
        assert!(closed.iter().all(|(_, v)| v == 0.0));
    }
}
