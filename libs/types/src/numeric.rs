//! Base-unit amounts and precision helpers
//!
//! Every ledger amount is an unsigned integer count of the smallest unit of
//! its asset (or of the unit of account). Arithmetic stays in integers; the
//! decimal conversion here exists only for human-readable output.

use rust_decimal::Decimal;

/// Amount in the asset's own smallest unit.
pub type NativeAmount = u128;

/// Amount in the smallest unit of the unit of account.
pub type UoaAmount = u128;

/// `10^exp`, or `None` when it does not fit in a `u128`.
pub fn pow10(exp: u32) -> Option<u128> {
    10u128.checked_pow(exp)
}

/// Render a base-unit amount with `decimals` fractional digits.
///
/// Returns `None` when the amount exceeds the 96-bit mantissa `Decimal`
/// supports or `decimals` is beyond its maximum scale (28).
pub fn to_display_decimal(raw: u128, decimals: u32) -> Option<Decimal> {
    let signed = i128::try_from(raw).ok()?;
    Decimal::try_from_i128_with_scale(signed, decimals).ok()
}
