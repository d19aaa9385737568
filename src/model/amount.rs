//! Amount type for handling cost values with optional thousands separators.
//!
//! This module provides the `Amount` type which wraps `Decimal`. Cost fields are entered with or
//! without commas and are always stored in the data file as text with exactly two decimal places
//! and commas re-inserted, e.g. `1,234.50`. That text form is what gets parsed again on the next
//! edit, so parse and format must agree exactly.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::error::Error;
use std::fmt;
use std::fmt::{Debug, Display, Formatter};
use std::str::FromStr;

/// The number of fractional digits an `Amount` is stored with.
const DECIMAL_PLACES: u32 = 2;

/// Represents a cost value.
///
/// The value is rounded to two decimal places (midpoint away from zero) when it is parsed or
/// constructed, so a formatted `Amount` always parses back to the same value. Values too large to
/// keep two decimal places are rejected rather than stored with fewer.
///
/// # Examples
///
/// Parsing with commas:
/// ```
/// # use costbook::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("1,234.5").unwrap();
/// assert_eq!(amount.to_string(), "1,234.50");
/// ```
///
/// Parsing without commas:
/// ```
/// # use costbook::model::Amount;
/// # use std::str::FromStr;
/// let amount = Amount::from_str("1234567").unwrap();
/// assert_eq!(amount.to_string(), "1,234,567.00");
/// ```
///
/// Formatting is not significant for equality:
/// ```
/// # use costbook::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("5000").unwrap();
/// let b = Amount::from_str("5,000.00").unwrap();
/// assert_eq!(a, b);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Amount {
    value: Decimal,
}

impl Amount {
    /// Zero.
    pub const ZERO: Amount = Amount {
        value: Decimal::from_parts(0, 0, 0, false, DECIMAL_PLACES),
    };

    /// Creates a new Amount from a Decimal value, rounding it to two decimal places.
    ///
    /// # Errors
    /// Returns an error if the value is too large to be held with two decimal places.
    pub fn new(value: Decimal) -> Result<Self, AmountError> {
        let mut rounded =
            value.round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero);
        // rescale keeps a smaller scale when the mantissa has no room left
        rounded.rescale(DECIMAL_PLACES);
        if rounded.scale() != DECIMAL_PLACES {
            return Err(AmountError {
                input: value.to_string(),
                kind: AmountErrorKind::TooLarge,
            });
        }
        Ok(Self { value: rounded })
    }

    /// The largest amount that can be held with two decimal places.
    pub const MAX: Amount = Amount {
        value: Decimal::from_parts(u32::MAX, u32::MAX, u32::MAX, false, DECIMAL_PLACES),
    };

    /// Adds two amounts, returning `None` if the sum cannot be held with two decimal places.
    pub fn checked_add(self, rhs: Amount) -> Option<Amount> {
        self.value
            .checked_add(rhs.value)
            .and_then(|sum| Amount::new(sum).ok())
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.value
    }

    /// Returns true if the amount is zero.
    pub fn is_zero(&self) -> bool {
        self.value().is_zero()
    }

    /// Returns true if the amount is negative.
    pub fn is_negative(&self) -> bool {
        !self.is_zero() && self.value().is_sign_negative()
    }
}

impl Default for Amount {
    fn default() -> Self {
        Amount::ZERO
    }
}

/// An error that can occur when parsing strings into `Amount` values.
pub struct AmountError {
    input: String,
    kind: AmountErrorKind,
}

#[derive(Debug)]
enum AmountErrorKind {
    NotANumber(rust_decimal::Error),
    TooLarge,
}

impl Debug for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}: {:?}", self.input, self.kind)
    }
}

impl Display for AmountError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match &self.kind {
            AmountErrorKind::NotANumber(e) => write!(f, "'{}' is not a number: {e}", self.input),
            AmountErrorKind::TooLarge => write!(
                f,
                "'{}' is too large to be stored with two decimal places",
                self.input
            ),
        }
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            AmountErrorKind::NotANumber(e) => Some(e),
            AmountErrorKind::TooLarge => None,
        }
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();

        // An empty cost field means zero
        if trimmed.is_empty() {
            return Ok(Amount::ZERO);
        }

        // Remove commas (thousand separators)
        let without_commas = trimmed.replace(',', "");

        let value = Decimal::from_str(&without_commas)
            .or_else(|_| Decimal::from_scientific(&without_commas))
            .map_err(|e| AmountError {
                input: s.to_string(),
                kind: AmountErrorKind::NotANumber(e),
            })?;
        Amount::new(value).map_err(|e| AmountError {
            input: s.to_string(),
            ..e
        })
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.is_negative() { "-" } else { "" };
        // The scale is always DECIMAL_PLACES, so the mantissa splits exactly into integer and
        // hundredths
        let mantissa = self.value.mantissa().unsigned_abs();
        let divisor = 10u128.pow(self.value.scale());
        let int_part = mantissa / divisor;
        let frac_part = mantissa % divisor;
        write!(
            f,
            "{sign}{}.{frac_part:02}",
            group_thousands(&int_part.to_string())
        )
    }
}

/// Inserts a comma every three digits from the right, e.g. `1234567` -> `1,234,567`.
fn group_thousands(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (ix, c) in digits.chars().enumerate() {
        if ix > 0 && (len - ix) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
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

impl TryFrom<Decimal> for Amount {
    type Error = AmountError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Amount::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.value()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_parse_with_commas() {
        let amount = Amount::from_str("1,234.5").unwrap();
        assert_eq!(amount.value(), dec("1234.50"));
        assert_eq!(amount.to_string(), "1,234.50");
    }

    #[test]
    fn test_reparse_formatted_value() {
        let amount = Amount::from_str("1,234.50").unwrap();
        assert_eq!(amount.value(), dec("1234.50"));
    }

    #[test]
    fn test_parse_empty_string_is_zero() {
        let amount = Amount::from_str("").unwrap();
        assert!(amount.is_zero());
        assert_eq!(amount.to_string(), "0.00");
    }

    #[test]
    fn test_parse_whitespace() {
        let amount = Amount::from_str("  50  ").unwrap();
        assert_eq!(amount.value(), dec("50.00"));
    }

    #[test]
    fn test_parse_negative() {
        let amount = Amount::from_str("-60,000").unwrap();
        assert!(amount.is_negative());
        assert_eq!(amount.to_string(), "-60,000.00");
    }

    #[test]
    fn test_parse_invalid() {
        let e = Amount::from_str("abc").unwrap_err();
        assert!(e.to_string().contains("'abc'"));
        assert!(Amount::from_str("12.5.1").is_err());
        assert!(Amount::from_str("$").is_err());
    }

    #[test]
    fn test_parse_scientific() {
        let amount = Amount::from_str("1e3").unwrap();
        assert_eq!(amount.to_string(), "1,000.00");
    }

    #[test]
    fn test_rounding_midpoint_away_from_zero() {
        assert_eq!(Amount::from_str("0.005").unwrap().to_string(), "0.01");
        assert_eq!(Amount::from_str("-0.005").unwrap().to_string(), "-0.01");
        assert_eq!(Amount::from_str("2.344").unwrap().to_string(), "2.34");
    }

    #[test]
    fn test_negative_zero_has_no_sign() {
        let amount = Amount::from_str("-0.001").unwrap();
        assert!(amount.is_zero());
        assert!(!amount.is_negative());
        assert_eq!(amount.to_string(), "0.00");
    }

    #[test]
    fn test_group_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("123456"), "123,456");
        assert_eq!(group_thousands("1234567890"), "1,234,567,890");
    }

    #[test]
    fn test_format_is_idempotent() {
        for s in [
            "0", "0.1", "7.05", "999.99", "1000", "12,345.6", "-42.42", "98765432109876.54",
        ] {
            let once = Amount::from_str(s).unwrap();
            let twice = Amount::from_str(&once.to_string()).unwrap();
            assert_eq!(once, twice, "{s}");
            assert_eq!(once.to_string(), twice.to_string(), "{s}");
        }
    }

    #[test]
    fn test_large_value_is_exact() {
        let amount = Amount::from_str("98765432109876.54").unwrap();
        assert_eq!(amount.to_string(), "98,765,432,109,876.54");
    }

    #[test]
    fn test_checked_add() {
        let total = ["1,000", "250.5", "0.25"]
            .iter()
            .map(|s| Amount::from_str(s).unwrap())
            .try_fold(Amount::ZERO, Amount::checked_add)
            .unwrap();
        assert_eq!(total.to_string(), "1,250.75");
    }

    #[test]
    fn test_checked_add_overflow() {
        let half = Amount::from_str("500,000,000,000,000,000,000,000,000").unwrap();
        assert!(half.checked_add(half).is_none());
        let max = Amount::from_str(MAX).unwrap();
        assert!(max.checked_add(Amount::from_str("0.01").unwrap()).is_none());
        assert_eq!(max.checked_add(Amount::ZERO), Some(max));
    }

    const MAX: &str = "792,281,625,142,643,375,935,439,503.35";

    #[test]
    fn test_largest_value_keeps_two_places() {
        let amount = Amount::from_str(MAX).unwrap();
        assert_eq!(amount.to_string(), MAX);
        assert_eq!(amount.value().scale(), 2);
        assert_eq!(amount, Amount::MAX);
        let negative = Amount::from_str(&format!("-{MAX}")).unwrap();
        assert_eq!(negative.to_string(), format!("-{MAX}"));
    }

    #[test]
    fn test_too_large_for_two_places_rejected() {
        for s in [
            "792,281,625,142,643,375,935,439,503.36",
            "7922816251426433759354395033.5",
            "79,228,162,514,264,337,593,543,950,335",
            "-7922816251426433759354395033",
        ] {
            let e = Amount::from_str(s).unwrap_err();
            assert!(e.to_string().contains("too large"), "{s}: {e}");
        }
        let e = Amount::new(Decimal::MAX).unwrap_err();
        assert!(e.to_string().contains("too large"));
    }

    #[test]
    fn test_round_trip_near_limit() {
        for s in [
            "792281625142643375935439503.35",
            "-792281625142643375935439503.3",
            "123456789012345678901234567",
            "0.01",
            "-0.01",
        ] {
            let once = Amount::from_str(s).unwrap();
            let text = once.to_string();
            assert!(text.ends_with(|c: char| c.is_ascii_digit()));
            assert_eq!(text.split_once('.').unwrap().1.len(), 2, "{s}");
            let twice = Amount::from_str(&text).unwrap();
            assert_eq!(once, twice, "{s}");
            assert_eq!(text, twice.to_string(), "{s}");
        }
    }

    #[test]
    fn test_zero_and_default_format() {
        assert_eq!(Amount::ZERO.to_string(), "0.00");
        assert_eq!(Amount::default(), Amount::ZERO);
        assert_eq!(Amount::try_from(Decimal::ZERO).unwrap().to_string(), "0.00");
    }

    #[test]
    fn test_serde() {
        let amount = Amount::from_str("1234.5").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"1,234.50\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn test_ordering() {
        let a1 = Amount::from_str("30").unwrap();
        let a2 = Amount::from_str("50.00").unwrap();
        assert!(a1 < a2);
    }
}
