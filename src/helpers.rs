//! Shared helpers for Decimal ↔ f64 conversions and fixed-point formatting.
//!
//! All f64 → Decimal conversions go through the shortest round-trip decimal
//! representation of the float (what `f64::to_string` prints), so `21.005`
//! becomes exactly `21.005` rather than `21.00499999999999900524…`. That is
//! what makes the report's rounding rule observable: values are rounded
//! half away from zero on the decimal the provider actually sent.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::{Decimal, RoundingStrategy};
use std::str::FromStr;

/// Convert an f64 to Decimal using its shortest decimal representation.
///
/// Returns `None` for non-finite inputs (NaN, ±Inf).
pub(crate) fn f64_to_decimal(v: f64) -> Option<Decimal> {
    if !v.is_finite() {
        return None;
    }
    Decimal::from_str(&v.to_string())
        .ok()
        .or_else(|| Decimal::from_f64(v))
}

/// Convert an optional f64 to Decimal for binding into a NUMERIC column.
///
/// Non-finite values are stored as NULL, same as a missing measurement.
pub(crate) fn opt_f64_to_decimal(v: Option<f64>) -> Option<Decimal> {
    v.and_then(|x| {
        let d = f64_to_decimal(x);
        if d.is_none() {
            tracing::warn!("Non-finite measurement {} stored as NULL", x);
        }
        d
    })
}

/// Convert an Option<Decimal> to Option<f64>.
pub(crate) fn opt_dec_to_f64(d: Option<Decimal>) -> Option<f64> {
    d.and_then(|v| v.to_f64())
}

/// Format an f64 with exactly two decimal places, rounding half away from zero.
///
/// Returns `None` for non-finite inputs, which have no fixed-point form.
pub(crate) fn format_fixed_2dp(v: f64) -> Option<String> {
    let mut d = f64_to_decimal(v)?.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    d.rescale(2);
    if d.is_zero() {
        d.set_sign_positive(true);
    }
    Some(d.to_string())
}
