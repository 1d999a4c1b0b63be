//! Money type with decimal precision and currency.
//!
//! CRITICAL: Never use floating-point for money calculations.
//! This type wraps `rust_decimal::Decimal` for arbitrary precision.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Represents a monetary amount with currency.
///
/// Uses `Decimal` internally to avoid floating-point precision errors.
/// Amounts are expressed in major units with at most the currency's
/// minor-unit scale of fractional digits (see [`Money::fits_minor_units`]).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Money {
    /// The monetary amount.
    pub amount: Decimal,
    /// ISO 4217 currency code (e.g., "GBP", "USD").
    pub currency: Currency,
}

/// ISO 4217 currency codes supported by the system.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    /// US Dollar
    Usd,
    /// Euro
    Eur,
    /// Pound Sterling
    Gbp,
    /// Singapore Dollar
    Sgd,
    /// Japanese Yen
    Jpy,
}

impl Currency {
    /// Number of decimal digits in this currency's minor unit.
    ///
    /// JPY has no minor unit; the rest use two decimal places.
    #[must_use]
    pub const fn minor_units(self) -> u32 {
        match self {
            Self::Jpy => 0,
            Self::Usd | Self::Eur | Self::Gbp | Self::Sgd => 2,
        }
    }
}

impl Money {
    /// Creates a new Money instance.
    #[must_use]
    pub const fn new(amount: Decimal, currency: Currency) -> Self {
        Self { amount, currency }
    }

    /// Creates a zero amount in the specified currency.
    #[must_use]
    pub fn zero(currency: Currency) -> Self {
        Self {
            amount: Decimal::ZERO,
            currency,
        }
    }

    /// Returns true if the amount is zero.
    #[must_use]
    pub fn is_zero(&self) -> bool {
        self.amount.is_zero()
    }

    /// Returns true if the amount is negative.
    #[must_use]
    pub fn is_negative(&self) -> bool {
        self.amount.is_sign_negative() && !self.amount.is_zero()
    }

    /// Returns true if the amount is strictly positive.
    #[must_use]
    pub fn is_positive(&self) -> bool {
        self.amount.is_sign_positive() && !self.amount.is_zero()
    }

    /// Returns true if the amount has no more fractional digits than the
    /// currency's minor unit allows.
    ///
    /// Trailing zeros do not count: `10.00` GBP fits, `10.005` GBP does not,
    /// `100.50` JPY does not.
    #[must_use]
    pub fn fits_minor_units(&self) -> bool {
        self.amount.normalize().scale() <= self.currency.minor_units()
    }

    /// Adds another amount of the same currency.
    ///
    /// Returns `None` on currency mismatch or arithmetic overflow.
    #[must_use]
    pub fn checked_add(self, other: Self) -> Option<Self> {
        if self.currency != other.currency {
            return None;
        }
        self.amount.checked_add(other.amount).map(|amount| Self {
            amount,
            currency: self.currency,
        })
    }

    /// Subtracts another amount of the same currency.
    ///
    /// Returns `None` on currency mismatch or arithmetic overflow.
    #[must_use]
    pub fn checked_sub(self, other: Self) -> Option<Self> {
        if self.currency != other.currency {
            return None;
        }
        self.amount.checked_sub(other.amount).map(|amount| Self {
            amount,
            currency: self.currency,
        })
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

impl std::fmt::Display for Currency {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Usd => write!(f, "USD"),
            Self::Eur => write!(f, "EUR"),
            Self::Gbp => write!(f, "GBP"),
            Self::Sgd => write!(f, "SGD"),
            Self::Jpy => write!(f, "JPY"),
        }
    }
}

impl std::str::FromStr for Currency {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USD" => Ok(Self::Usd),
            "EUR" => Ok(Self::Eur),
            "GBP" => Ok(Self::Gbp),
            "SGD" => Ok(Self::Sgd),
            "JPY" => Ok(Self::Jpy),
            _ => Err(format!("Unknown currency: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;
    use std::str::FromStr;

    #[test]
    fn test_money_new() {
        let amount = dec!(100.00);
        let money = Money::new(amount, Currency::Gbp);
        assert_eq!(money.amount, amount);
        assert_eq!(money.currency, Currency::Gbp);
    }

    #[test]
    fn test_money_zero() {
        let money = Money::zero(Currency::Usd);
        assert!(money.is_zero());
        assert!(!money.is_negative());
        assert!(!money.is_positive());
    }

    #[test]
    fn test_money_sign_predicates() {
        let positive = Money::new(dec!(10), Currency::Usd);
        assert!(positive.is_positive());
        assert!(!positive.is_negative());

        let negative = Money::new(dec!(-10), Currency::Usd);
        assert!(negative.is_negative());
        assert!(!negative.is_positive());
    }

    #[rstest]
    #[case(dec!(10.00), Currency::Gbp, true)]
    #[case(dec!(10.50), Currency::Gbp, true)]
    #[case(dec!(10.005), Currency::Gbp, false)]
    #[case(dec!(100), Currency::Jpy, true)]
    #[case(dec!(100.50), Currency::Jpy, false)]
    #[case(dec!(0.01), Currency::Usd, true)]
    fn test_fits_minor_units(
        #[case] amount: Decimal,
        #[case] currency: Currency,
        #[case] expected: bool,
    ) {
        assert_eq!(Money::new(amount, currency).fits_minor_units(), expected);
    }

    #[test]
    fn test_checked_add_same_currency() {
        let a = Money::new(dec!(10.50), Currency::Gbp);
        let b = Money::new(dec!(4.50), Currency::Gbp);
        assert_eq!(a.checked_add(b), Some(Money::new(dec!(15.00), Currency::Gbp)));
    }

    #[test]
    fn test_checked_add_currency_mismatch() {
        let a = Money::new(dec!(10), Currency::Gbp);
        let b = Money::new(dec!(10), Currency::Usd);
        assert_eq!(a.checked_add(b), None);
        assert_eq!(a.checked_sub(b), None);
    }

    #[test]
    fn test_checked_sub_goes_negative() {
        let a = Money::new(dec!(5), Currency::Eur);
        let b = Money::new(dec!(10), Currency::Eur);
        let result = a.checked_sub(b).unwrap();
        assert!(result.is_negative());
        assert_eq!(result.amount, dec!(-5));
    }

    #[test]
    fn test_currency_minor_units() {
        assert_eq!(Currency::Gbp.minor_units(), 2);
        assert_eq!(Currency::Usd.minor_units(), 2);
        assert_eq!(Currency::Jpy.minor_units(), 0);
    }

    #[test]
    fn test_currency_display() {
        assert_eq!(Currency::Usd.to_string(), "USD");
        assert_eq!(Currency::Eur.to_string(), "EUR");
        assert_eq!(Currency::Gbp.to_string(), "GBP");
        assert_eq!(Currency::Sgd.to_string(), "SGD");
        assert_eq!(Currency::Jpy.to_string(), "JPY");
    }

    #[test]
    fn test_currency_from_str() {
        assert_eq!(Currency::from_str("GBP").unwrap(), Currency::Gbp);
        assert_eq!(Currency::from_str("gbp").unwrap(), Currency::Gbp);
        assert_eq!(Currency::from_str("USD").unwrap(), Currency::Usd);

        assert!(Currency::from_str("XXX").is_err());
        assert!(Currency::from_str("").is_err());
    }

    #[test]
    fn test_money_display() {
        let money = Money::new(dec!(42.50), Currency::Gbp);
        assert_eq!(money.to_string(), "42.50 GBP");
    }
}
