//! Shared helpers for moving exact decimal amounts in and out of storage.

use std::str::FromStr;

use log::error;
use rust_decimal::Decimal;

/// Parses a stored amount string into a `Decimal`, logging and falling back
/// to zero on malformed data rather than failing the whole read.
pub(crate) fn parse_amount(value_str: &str, field_name: &str) -> Decimal {
    match Decimal::from_str(value_str) {
        Ok(d) => d,
        Err(e) => {
            error!(
                "Failed to parse {} '{}' as Decimal: {}. Falling back to ZERO.",
                field_name, value_str, e
            );
            Decimal::ZERO
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount_exact() {
        assert_eq!(parse_amount("1234.56", "amount"), dec!(1234.56));
        assert_eq!(parse_amount("-42.10", "amount"), dec!(-42.10));
        assert_eq!(parse_amount("0", "amount"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_amount_malformed_falls_back_to_zero() {
        assert_eq!(parse_amount("not-a-number", "amount"), Decimal::ZERO);
        assert_eq!(parse_amount("", "amount"), Decimal::ZERO);
    }

    #[test]
    fn test_parse_amount_round_trips_display() {
        let d = dec!(99999.99);
        assert_eq!(parse_amount(&d.to_string(), "amount"), d);
    }
}
