//! Unit-of-account conversion
//!
//! Volatile amounts are priced as `floor(native * price / decimal_factor)`
//! where `decimal_factor = 10^(volatile + oracle - stable)`. Stable amounts
//! are worth their raw amount. All division rounds toward zero, so a
//! positive dust amount may convert to zero.

use vault_types::numeric::{NativeAmount, UoaAmount};

use crate::config::Precisions;
use crate::errors::{ConfigError, LedgerError};
use crate::oracle::ValidatedPrice;

/// `floor(a * b / c)`. `None` on overflow or division by zero.
pub fn mul_div_down(a: u128, b: u128, c: u128) -> Option<u128> {
    if c == 0 {
        return None;
    }
    a.checked_mul(b)?.checked_div(c)
}

/// Prices native volatile amounts in the unit of account.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UnitConverter {
    decimal_factor: u128,
}

impl UnitConverter {
    pub fn from_precisions(precisions: &Precisions) -> Result<Self, ConfigError> {
        Ok(Self {
            decimal_factor: precisions.decimal_factor()?,
        })
    }

    pub fn decimal_factor(&self) -> u128 {
        self.decimal_factor
    }

    /// Value of `native` volatile base units at `price`.
    pub fn to_unit_of_account(
        &self,
        native: NativeAmount,
        price: &ValidatedPrice,
    ) -> Result<UoaAmount, LedgerError> {
        mul_div_down(native, price.price, self.decimal_factor).ok_or(LedgerError::MathOverflow)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ONE_ETH: u128 = 1_000_000_000_000_000_000;

    fn at(price: u128) -> ValidatedPrice {
        ValidatedPrice { price, as_of: 0 }
    }

    #[test]
    fn test_mul_div_down_floors() {
        assert_eq!(mul_div_down(7, 3, 2), Some(10));
        assert_eq!(mul_div_down(1, 1, 2), Some(0));
    }

    #[test]
    fn test_mul_div_down_guards() {
        assert_eq!(mul_div_down(u128::MAX, 2, 1), None);
        assert_eq!(mul_div_down(1, 1, 0), None);
    }

    #[test]
    fn test_one_eth_at_2000_usdc() {
        let converter = UnitConverter::from_precisions(&Precisions::default()).unwrap();
        let value = converter
            .to_unit_of_account(ONE_ETH, &at(2_000_00000000))
            .unwrap();
        assert_eq!(value, 2_000_000_000); // 2,000.000000
    }

    #[test]
    fn test_whole_unit_of_account() {
        let precisions = Precisions {
            volatile: 18,
            stable: 0,
            oracle: 8,
        };
        let converter = UnitConverter::from_precisions(&precisions).unwrap();
        assert_eq!(converter.decimal_factor(), 10u128.pow(26));
        assert_eq!(
            converter.to_unit_of_account(5 * ONE_ETH, &at(2_000_00000000)),
            Ok(10_000)
        );
    }

    #[test]
    fn test_dust_rounds_to_zero() {
        let converter = UnitConverter::from_precisions(&Precisions::default()).unwrap();
        assert_eq!(converter.to_unit_of_account(1, &at(2_000_00000000)), Ok(0));
    }

    #[test]
    fn test_overflow_surfaces() {
        let converter = UnitConverter::from_precisions(&Precisions::default()).unwrap();
        assert_eq!(
            converter.to_unit_of_account(u128::MAX, &at(2)),
            Err(LedgerError::MathOverflow)
        );
    }
}
