//! Amount type for monetary values.
//!
//! Wraps `Decimal` and tolerates values that arrive with a dollar sign or
//! thousands separators, since historical ledger documents stored amounts as
//! display strings. Serialized form is the plain decimal string.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;

/// A monetary amount.
///
/// ```
/// # use budget_sync::model::Amount;
/// # use std::str::FromStr;
/// let a = Amount::from_str("-$5,000.00").unwrap();
/// let b = Amount::from_str("-5000.00").unwrap();
/// assert_eq!(a, b);
/// assert_eq!(a.to_string(), "-5000.00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Amount(Decimal);

impl Amount {
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the underlying Decimal value.
    pub fn value(&self) -> Decimal {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }

    pub fn is_negative(&self) -> bool {
        self.0.is_sign_negative()
    }
}

/// An error that can occur when parsing strings into `Amount` values.
#[derive(Debug)]
pub struct AmountError(rust_decimal::Error);

impl fmt::Display for AmountError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

impl std::error::Error for AmountError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.0)
    }
}

impl FromStr for Amount {
    type Err = AmountError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if trimmed.is_empty() {
            return Ok(Amount::default());
        }

        // Strip a dollar sign in either "-$50.00" or "$50.00" position.
        let without_dollar = if let Some(after_minus) = trimmed.strip_prefix('-') {
            if let Some(after_dollar) = after_minus.strip_prefix('$') {
                format!("-{after_dollar}")
            } else {
                trimmed.to_string()
            }
        } else if let Some(after_dollar) = trimmed.strip_prefix('$') {
            after_dollar.to_string()
        } else {
            trimmed.to_string()
        };

        // Remove commas (thousand separators)
        let without_commas = without_dollar.replace(',', "");
        let value = Decimal::from_str(&without_commas).map_err(AmountError)?;
        Ok(Amount(value))
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
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

impl From<Decimal> for Amount {
    fn from(value: Decimal) -> Self {
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

    #[test]
    fn test_parse_with_dollar_sign() {
        let amount = Amount::from_str("$50.00").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("50.00").unwrap());
    }

    #[test]
    fn test_parse_negative_with_dollar_and_commas() {
        let amount = Amount::from_str("-$1,234.56").unwrap();
        assert_eq!(amount.value(), Decimal::from_str("-1234.56").unwrap());
        assert!(amount.is_negative());
    }

    #[test]
    fn test_parse_plain() {
        let amount = Amount::from_str("19.99").unwrap();
        assert_eq!(amount.to_string(), "19.99");
    }

    #[test]
    fn test_parse_empty_is_zero() {
        let amount = Amount::from_str("  ").unwrap();
        assert!(amount.is_zero());
    }

    #[test]
    fn test_parse_garbage_fails() {
        assert!(Amount::from_str("fifty").is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let amount = Amount::from_str("-42.00").unwrap();
        let json = serde_json::to_string(&amount).unwrap();
        assert_eq!(json, "\"-42.00\"");
        let back: Amount = serde_json::from_str(&json).unwrap();
        assert_eq!(back, amount);
    }

    #[test]
    fn test_deserialize_legacy_display_string() {
        let back: Amount = serde_json::from_str("\"-$87.43\"").unwrap();
        assert_eq!(back.value(), Decimal::from_str("-87.43").unwrap());
    }
}
