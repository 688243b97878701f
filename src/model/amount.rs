//! Amount type for handling monetary values scraped from statements and exports.
//!
//! Bank exports are dirty: dollar signs, thousands separators, trailing currency codes and
//! accounting-style parentheses all show up in the amount column. This module treats all of
//! that as noise and recovers a signed value. Digits are read as a `Decimal` so that the
//! conversion to `f64` is exact; figures too large for a `Decimal` are read as a float instead.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// Represents a monetary amount parsed from loosely formatted text.
///
/// # Examples
///
/// Noise characters are discarded:
/// ```
/// # use ledger_face::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("$1,234.56 USD").unwrap();
/// assert_eq!(amount.to_f64(), 1234.56);
/// ```
///
/// Both a leading minus and accounting parentheses mean negative:
/// ```
/// # use ledger_face::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("-$50.00").unwrap();
/// let b = Amount::from_str("($50.00)").unwrap();
/// assert_eq!(a, b);
/// assert!(a.is_negative());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Default)]
pub struct Amount {
    value: f64,
}

impl Amount {
    /// The value as a float, which is what the scaling pipeline works in.
    pub fn to_f64(&self) -> f64 {
        self.value
    }

    /// The absolute value as a float.
    pub fn magnitude(&self) -> f64 {
        self.value.abs()
    }

    pub fn is_zero(&self) -> bool {
        self.value == 0.0
    }

    pub fn is_negative(&self) -> bool {
        self.value < 0.0
    }
}

/// An error that can occur when the digits left after stripping noise do not form a number.
pub struct AmountError {
    raw: String,
    source: rust_decimal::Error,
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "AmountError({:?}, {:?})", self.raw, self.source)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' is not an amount: {}", self.raw, self.source)
    }
}

impl Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(&self.source)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        let digits: String = trimmed
            .chars()
            .filter(|c| c.is_ascii_digit() || *c == '.')
            .collect();

        let value = match Decimal::from_str(&digits) {
            Ok(value) => decimal_to_f64(value),
            // more digits than a Decimal holds, but still a number
            Err(source) => match digits.parse::<f64>() {
                Ok(value) if value.is_finite() => value,
                _ => {
                    return Err(AmountError {
                        raw: s.to_string(),
                        source,
                    })
                }
            },
        };

        let value = if is_negative_notation(trimmed) && value != 0.0 {
            -value
        } else {
            value
        };
        Ok(Amount { value })
    }
}

/// Goes through the decimal string so that `1234.56` lands on the nearest `f64` exactly.
fn decimal_to_f64(value: Decimal) -> f64 {
    value.to_string().parse().unwrap_or_default()
}

/// A minus before the first digit, e.g. `-$5.00` or `$-5.00`, or accounting parentheses.
fn is_negative_notation(s: &str) -> bool {
    if s.starts_with('(') && s.ends_with(')') {
        return true;
    }
    s.chars()
        .take_while(|c| !c.is_ascii_digit())
        .any(|c| c == '-')
}

/// Coerces a raw amount field into a non-negative magnitude. Anything that cannot be read as a
/// number becomes `0.0`.
pub fn normalize_amount(raw: &str) -> f64 {
    Amount::from_str(raw)
        .map(|amount| amount.magnitude())
        .unwrap_or(0.0)
}

/// Formats a float as dollars with thousands separators, e.g. `-$1,234.50`.
pub fn format_money(value: f64) -> String {
    let sign = if value < 0.0 { "-" } else { "" };
    format!("{sign}${}", format_num::format_num!(",.2", value.abs()))
}

impl Display for Amount {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", format_money(self.to_f64()))
    }
}

impl Serialize for Amount {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Amount {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Amount::from_str(&s).map_err(serde::de::Error::custom)
    }
}
