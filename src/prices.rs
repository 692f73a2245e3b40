//! Prices

use std::ops::Deref;

use rust_decimal::Decimal;
use rusty_money::iso::{self, Currency};
use thiserror::Error;

/// Errors raised while constructing or parsing a price.
#[derive(Debug, Error, PartialEq)]
pub enum PriceError {
    /// Prices must be strictly positive.
    #[error("price must be greater than zero, got {0}")]
    NotPositive(Decimal),

    /// The price string was not in the `AMOUNT CURRENCY` format.
    #[error("invalid price format: {0}")]
    InvalidFormat(String),

    /// The currency code is not a known ISO currency.
    #[error("unknown currency code: {0}")]
    UnknownCurrency(String),
}

/// A strictly positive unit price.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Price {
    value: Decimal,
}

impl Price {
    /// Creates a new price.
    ///
    /// # Errors
    ///
    /// Returns [`PriceError::NotPositive`] if the value is zero or negative.
    pub fn new(value: Decimal) -> Result<Self, PriceError> {
        if value <= Decimal::ZERO {
            return Err(PriceError::NotPositive(value));
        }

        Ok(Price { value })
    }

    /// Returns the underlying decimal amount.
    pub fn amount(self) -> Decimal {
        self.value
    }
}

impl Deref for Price {
    type Target = Decimal;

    fn deref(&self) -> &Self::Target {
        &self.value
    }
}

impl TryFrom<Decimal> for Price {
    type Error = PriceError;

    fn try_from(value: Decimal) -> Result<Self, Self::Error> {
        Price::new(value)
    }
}

/// Parse a price string (e.g. `"8.50 MAD"`) into a price and its currency.
///
/// # Errors
///
/// Returns an error if the string is not in the format `AMOUNT CURRENCY`, if the amount
/// is not a decimal, if the amount is not positive, or if the currency is unknown.
pub fn parse_price(s: &str) -> Result<(Price, &'static Currency), PriceError> {
    let mut parts = s.split_whitespace();

    let (Some(amount), Some(code), None) = (parts.next(), parts.next(), parts.next()) else {
        return Err(PriceError::InvalidFormat(format!(
            "expected format 'AMOUNT CURRENCY', got: {s}"
        )));
    };

    let amount = amount
        .parse::<Decimal>()
        .map_err(|_err| PriceError::InvalidFormat(s.to_string()))?;

    let currency = iso::find(code).ok_or_else(|| PriceError::UnknownCurrency(code.to_string()))?;

    Ok((Price::new(amount)?, currency))
}

#[cfg(test)]
mod tests {
    use rust_decimal_macros::dec;
    use testresult::TestResult;

    use super::*;

    #[test]
    fn new_price_rejects_zero_and_negative() {
        assert_eq!(
            Price::new(Decimal::ZERO),
            Err(PriceError::NotPositive(Decimal::ZERO))
        );
        assert!(matches!(
            Price::new(Decimal::NEGATIVE_ONE),
            Err(PriceError::NotPositive(_))
        ));
    }

    #[test]
    fn price_derefs_to_decimal() -> TestResult {
        let price = Price::new(dec!(8.50))?;

        assert_eq!(*price, dec!(8.5));
        assert_eq!(price.amount(), dec!(8.50));

        Ok(())
    }

    #[test]
    fn parse_price_reads_amount_and_currency() -> TestResult {
        let (price, currency) = parse_price("8.50 MAD")?;

        assert_eq!(price.amount(), dec!(8.50));
        assert_eq!(currency, iso::MAD);

        Ok(())
    }

    #[test]
    fn parse_price_rejects_invalid_format() {
        assert!(matches!(
            parse_price("8.50MAD"),
            Err(PriceError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_price("8.50 MAD extra"),
            Err(PriceError::InvalidFormat(_))
        ));
        assert!(matches!(
            parse_price("cheap MAD"),
            Err(PriceError::InvalidFormat(_))
        ));
    }

    #[test]
    fn parse_price_rejects_unknown_currency() {
        let result = parse_price("2.99 ABC");

        assert!(matches!(result, Err(PriceError::UnknownCurrency(code)) if code == "ABC"));
    }

    #[test]
    fn parse_price_rejects_negative_amounts() {
        assert!(matches!(
            parse_price("-1.00 MAD"),
            Err(PriceError::NotPositive(_))
        ));
    }
}
