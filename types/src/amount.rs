//! Amount arithmetic.
//!
//! Amounts are raw integer units (`u128`). Every division rounds toward zero
//! and every intermediate product is checked, so callers surface overflow as
//! an error instead of wrapping.

/// Basis-point denominator: 10_000 bps = 100%.
pub const BPS_DENOMINATOR: u128 = 10_000;

/// `floor(value * numerator / denominator)`.
///
/// Returns `None` on overflow or a zero denominator.
pub fn mul_div(value: u128, numerator: u128, denominator: u128) -> Option<u128> {
    if denominator == 0 {
        return None;
    }
    value.checked_mul(numerator).map(|product| product / denominator)
}

/// `floor(value * bps / 10_000)`.
pub fn apply_bps(value: u128, bps: u128) -> Option<u128> {
    mul_div(value, bps, BPS_DENOMINATOR)
}

/// `floor(value * percent / 100)`.
pub fn apply_percent(value: u128, percent: u128) -> Option<u128> {
    mul_div(value, percent, 100)
}
