//! Adoption fee representation using decimal arithmetic.

use core::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// A monetary amount in US dollars.
///
/// Used for adoption fees. The backend serializes amounts as decimal
/// strings, which `rust_decimal`'s `serde-with-str` feature handles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(transparent)]
pub struct Price(Decimal);

impl Price {
    /// Create a price from a decimal amount.
    #[must_use]
    pub const fn new(amount: Decimal) -> Self {
        Self(amount)
    }

    /// Create a price from whole cents.
    #[must_use]
    pub fn from_cents(cents: i64) -> Self {
        Self(Decimal::new(cents, 2))
    }

    /// The underlying decimal amount.
    #[must_use]
    pub const fn amount(&self) -> Decimal {
        self.0
    }

    /// Whether this fee is zero (free to a good home).
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.0.is_zero()
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "${:.2}", self.0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_display() {
        assert_eq!(Price::from_cents(12_500).to_string(), "$125.00");
        assert_eq!(Price::from_cents(99).to_string(), "$0.99");
    }

    #[test]
    fn test_is_zero() {
        assert!(Price::from_cents(0).is_zero());
        assert!(!Price::from_cents(1).is_zero());
    }

    #[test]
    fn test_serde_string_amount() {
        let price: Price = serde_json::from_str("\"75.50\"").unwrap();
        assert_eq!(price, Price::from_cents(7550));
    }
}
