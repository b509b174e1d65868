//! Type-safe price representation using decimal arithmetic.
//!
//! Prices are stored in the currency's standard unit (rupees, not paise) as
//! `rust_decimal::Decimal`. The payment gateway wants integer minor units, so
//! [`Price::to_minor_units`] converts losslessly or fails.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

/// Errors converting a [`Price`] to gateway minor units.
#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum PriceError {
    /// The amount is negative.
    #[error("price cannot be negative: {0}")]
    Negative(Decimal),
    /// The amount has sub-minor-unit precision (fractional paise).
    #[error("price has sub-paise precision: {0}")]
    SubMinorUnit(Decimal),
    /// The amount does not fit in an i64 after conversion.
    #[error("price out of range: {0}")]
    OutOfRange(Decimal),
}

/// A price with currency information.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Price {
    /// Amount in the currency's standard unit (e.g., rupees, not paise).
    pub amount: Decimal,
    /// ISO 4217 currency code.
    pub currency_code: CurrencyCode,
}

impl Price {
    /// Create a new price.
    #[must_use]
    pub const fn new(amount: Decimal, currency_code: CurrencyCode) -> Self {
        Self {
            amount,
            currency_code,
        }
    }

    /// Convert to integer minor units (paise for INR).
    ///
    /// # Errors
    ///
    /// Returns `PriceError` if the amount is negative, has more than two
    /// decimal places, or overflows i64.
    pub fn to_minor_units(&self) -> Result<i64, PriceError> {
        if self.amount.is_sign_negative() {
            return Err(PriceError::Negative(self.amount));
        }

        let scaled = self.amount * Decimal::from(100);
        if scaled.fract() != Decimal::ZERO {
            return Err(PriceError::SubMinorUnit(self.amount));
        }

        scaled.to_i64().ok_or(PriceError::OutOfRange(self.amount))
    }

    /// Build a price from integer minor units.
    #[must_use]
    pub fn from_minor_units(minor: i64, currency_code: CurrencyCode) -> Self {
        Self {
            amount: Decimal::new(minor, 2),
            currency_code,
        }
    }
}

/// ISO 4217 currency codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum CurrencyCode {
    #[default]
    INR,
    USD,
    EUR,
}

impl CurrencyCode {
    /// The ISO code as a static string (what the gateway API wants).
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::INR => "INR",
            Self::USD => "USD",
            Self::EUR => "EUR",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rupees(s: &str) -> Decimal {
        s.parse().expect("valid decimal")
    }

    #[test]
    fn test_to_minor_units() {
        let price = Price::new(rupees("12999.50"), CurrencyCode::INR);
        assert_eq!(price.to_minor_units(), Ok(1_299_950));
    }

    #[test]
    fn test_to_minor_units_whole() {
        let price = Price::new(rupees("45000"), CurrencyCode::INR);
        assert_eq!(price.to_minor_units(), Ok(4_500_000));
    }

    #[test]
    fn test_to_minor_units_negative() {
        let price = Price::new(rupees("-1"), CurrencyCode::INR);
        assert!(matches!(price.to_minor_units(), Err(PriceError::Negative(_))));
    }

    #[test]
    fn test_to_minor_units_sub_paise() {
        let price = Price::new(rupees("9.999"), CurrencyCode::INR);
        assert!(matches!(
            price.to_minor_units(),
            Err(PriceError::SubMinorUnit(_))
        ));
    }

    #[test]
    fn test_from_minor_units_roundtrip() {
        let price = Price::from_minor_units(1_299_950, CurrencyCode::INR);
        assert_eq!(price.amount, rupees("12999.50"));
        assert_eq!(price.to_minor_units(), Ok(1_299_950));
    }

    #[test]
    fn test_currency_code_str() {
        assert_eq!(CurrencyCode::INR.as_str(), "INR");
    }
}
