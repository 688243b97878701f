//! Pulls a single labeled figure out of unstructured statement text.

use regex::Regex;
use std::sync::OnceLock;

/// The label `extract_balance` looks for.
pub const BALANCE_LABEL: &str = "Balance";

fn balance_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| labeled_regex(BALANCE_LABEL)).as_ref()
}

/// `<label>:` (any case), optional whitespace, then a number with optional thousands commas
/// and at most one decimal point. A leading minus is kept.
fn labeled_regex(label: &str) -> Option<Regex> {
    let pattern = format!(r"(?i){}:\s*(-?\d[\d,]*(?:\.\d+)?)", regex::escape(label));
    Regex::new(&pattern).ok()
}

fn parse_figure(re: &Regex, text: &str) -> Option<f64> {
    let figure = re.captures(text)?.get(1)?.as_str().replace(',', "");
    figure.parse().ok()
}

/// Finds the first figure labeled `label` in `text`. Later occurrences are ignored.
pub fn extract_labeled(text: &str, label: &str) -> Option<f64> {
    if label.eq_ignore_ascii_case(BALANCE_LABEL) {
        return parse_figure(balance_regex()?, text);
    }
    parse_figure(&labeled_regex(label)?, text)
}

/// The first `Balance:` figure in `text`, or `0.0` when there is none.
pub fn extract_balance(text: &str) -> f64 {
    extract_labeled(text, BALANCE_LABEL).unwrap_or(0.0)
}

/// How much the face smiles, from `-0.5` (frown) to `0.5` (grin).
///
/// `clamp(balance / scale_ceiling, -0.5, 0.5)`. Symmetric around zero, unlike `scale`, because
/// a negative balance should frown. A ceiling that is not positive yields a neutral `0.0`.
pub fn derive_smile_factor(balance: f64, scale_ceiling: f64) -> f64 {
    if scale_ceiling.is_nan() || scale_ceiling <= 0.0 {
        return 0.0;
    }
    let ratio = balance / scale_ceiling;
    if ratio.is_nan() {
        0.0
    } else {
        ratio.clamp(-0.5, 0.5)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_balance() {
        assert_eq!(extract_balance("Balance: 1,250.75 USD"), 1250.75);
        assert_eq!(extract_balance("no balance here"), 0.0);
    }

    #[test]
    fn test_case_insensitive_and_no_space() {
        assert_eq!(extract_balance("ENDING BALANCE:300"), 300.0);
        assert_eq!(extract_balance("balance:\n  42"), 42.0);
    }

    #[test]
    fn test_first_match_wins() {
        let text = "Opening Balance: 100.00\nClosing Balance: 900.00";
        assert_eq!(extract_balance(text), 100.0);
    }

    #[test]
    fn test_at_most_one_decimal_point() {
        assert_eq!(extract_balance("Balance: 1.2.3"), 1.2);
    }

    #[test]
    fn test_negative_balance() {
        assert_eq!(extract_balance("Balance: -1,000.50"), -1000.5);
    }

    #[test]
    fn test_label_without_figure() {
        assert_eq!(extract_balance("Balance: n/a"), 0.0);
        assert_eq!(extract_labeled("Balance: n/a", "Balance"), None);
    }

    #[test]
    fn test_custom_label() {
        assert_eq!(extract_labeled("Total Due: 12.50", "Total Due"), Some(12.5));
        assert_eq!(extract_labeled("Balance (USD): 5", "Balance (USD)"), Some(5.0));
    }

    #[test]
    fn test_smile_factor() {
        assert_eq!(derive_smile_factor(0.0, 5000.0), 0.0);
        assert_eq!(derive_smile_factor(1250.0, 5000.0), 0.25);
        assert_eq!(derive_smile_factor(100_000.0, 5000.0), 0.5);
        assert_eq!(derive_smile_factor(-100_000.0, 5000.0), -0.5);
        assert_eq!(derive_smile_factor(-1250.0, 5000.0), -0.25);
        assert_eq!(derive_smile_factor(100.0, 0.0), 0.0);
    }
}
