//! Amount conversion between display units and integer minor units.

use serde::Serializer;
use serde_json::Value;

use crate::error::{Result, WalletError};

/// Minor units per display unit.
pub const MINOR_PER_UNIT: u64 = 1_000_000;

/// Convert a display amount to minor units, rounding half away from zero.
pub fn to_minor(amount: f64) -> Result<u64> {
    if !amount.is_finite() {
        return Err(WalletError::InvalidAmount(format!(
            "{} is not a finite number",
            amount
        )));
    }
    if amount < 0.0 {
        return Err(WalletError::InvalidAmount(format!(
            "{} is negative",
            amount
        )));
    }
    let scaled = (amount * MINOR_PER_UNIT as f64).round();
    if scaled > u64::MAX as f64 {
        return Err(WalletError::InvalidAmount(format!(
            "{} is out of range",
            amount
        )));
    }
    Ok(scaled as u64)
}

/// Convert minor units to a display amount.
pub fn from_minor(minor: u64) -> f64 {
    minor as f64 / MINOR_PER_UNIT as f64
}

/// Format minor units as a fixed six-decimal display string.
pub fn format_minor(minor: u64) -> String {
    format!("{}.{:06}", minor / MINOR_PER_UNIT, minor % MINOR_PER_UNIT)
}

/// Write minor units as a decimal string, the form the forge RPC takes.
pub(crate) fn serialize_minor<S: Serializer>(
    minor: &u64,
    serializer: S,
) -> std::result::Result<S::Ok, S::Error> {
    serializer.collect_str(minor)
}

/// Read an integer that the node may send either as a string or a number.
pub(crate) fn parse_integer(value: &Value, field: &str) -> Result<u64> {
    let parsed = match value {
        Value::String(s) => s.trim().parse::<u64>().ok(),
        Value::Number(n) => n.as_u64(),
        _ => None,
    };
    parsed.ok_or_else(|| {
        WalletError::MalformedResponse(format!("{} is not an unsigned integer: {}", field, value))
    })
}
