//! Conversions between on-chain fixed-point integers and display units.
//!
//! Every amount the dashboard reads is an integer scaled by `10^decimals`.
//! The helpers here turn those integers into `f64` for display only; nothing
//! computed from them is ever written back on-chain.

use alloy::primitives::utils::{ParseUnits, format_units, parse_units};
use alloy::primitives::{I256, U256};

/// Decimals of DOC, USDRIF and the RBTC native coin.
pub const TOKEN_DECIMALS: u8 = 18;

/// Decimals of the USD price reported by the price oracle.
pub const PRICE_DECIMALS: u8 = 18;

fn format_units_f64(amount: impl Into<ParseUnits>, decimals: u8) -> Option<f64> {
    format_units(amount, decimals).ok()?.parse().ok()
}

/// Returns `amount / 10^decimals`.
///
/// The decimal text is produced exactly and rounded once, when parsed.
pub fn to_human(amount: U256, decimals: u8) -> f64 {
    format_units_f64(amount, decimals).unwrap_or_else(|| {
        // Unit only goes up to 77 decimals; such a scale leaves a tiny fraction
        amount.to_string().parse::<f64>().unwrap_or(f64::NAN) / 10f64.powi(i32::from(decimals))
    })
}

/// Signed counterpart of [`to_human`].
pub fn to_human_signed(amount: I256, decimals: u8) -> f64 {
    let (sign, abs) = amount.into_sign_and_abs();
    let value = to_human(abs, decimals);
    if sign.is_negative() { -value } else { value }
}

/// Returns `a - b` in display units. Negative when `b > a`.
pub fn signed_delta(a: U256, b: U256, decimals: u8) -> f64 {
    if a >= b {
        to_human(a - b, decimals)
    } else {
        -to_human(b - a, decimals)
    }
}

/// Values `amount` at `price`, each with its own decimal count.
pub fn to_usd(amount: U256, amount_decimals: u8, price: U256, price_decimals: u8) -> f64 {
    match amount.checked_mul(price) {
        Some(product) => to_human(product, amount_decimals.saturating_add(price_decimals)),
        None => to_human(amount, amount_decimals) * to_human(price, price_decimals),
    }
}

/// Scales a display value back to a fixed-point integer.
///
/// Negative and non-finite inputs map to zero; values that do not fit in
/// 256 bits saturate.
pub fn from_human(value: f64, decimals: u8) -> U256 {
    if !value.is_finite() || value <= 0.0 {
        return U256::ZERO;
    }
    let text = format!("{value:.precision$}", precision = usize::from(decimals));
    parse_units(&text, decimals)
        .map(|units| units.get_absolute())
        .unwrap_or(U256::MAX)
}
