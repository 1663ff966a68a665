//! Monetary amount coercion.
//!
//! Amounts travel as `rust_decimal::Decimal`. Checkout payloads are written
//! by browsers, so the amount fields arrive as JSON numbers, numeric
//! strings, or garbage; the contract is to coerce rather than reject:
//! missing or invalid amounts become zero, negatives clamp to zero. Product
//! prices use the strict parser instead - an unparseable price there is a
//! caller error.

use rust_decimal::Decimal;
use rust_decimal::prelude::FromPrimitive;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Strictly parse a JSON value as a decimal amount.
///
/// Accepts a JSON number or a numeric string. Returns `None` for anything
/// else.
#[must_use]
pub fn parse_strict(value: &Value) -> Option<Decimal> {
    match value {
        Value::Number(n) => from_number(n),
        Value::String(s) => s.trim().parse::<Decimal>().ok(),
        _ => None,
    }
}

/// Coerce a JSON value to a non-negative decimal amount.
///
/// Invalid or missing input becomes zero; negative amounts clamp to zero.
#[must_use]
pub fn coerce(value: &Value) -> Decimal {
    parse_strict(value)
        .filter(|d| !d.is_sign_negative())
        .unwrap_or(Decimal::ZERO)
}

/// Lenient serde deserializer for amount fields.
///
/// Use with `#[serde(default, deserialize_with = "money::lenient")]` so that
/// both absent and malformed fields coerce to zero.
///
/// # Errors
///
/// Never fails on value shape; only on a malformed underlying stream.
pub fn lenient<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(coerce(&value))
}

fn from_number(n: &serde_json::Number) -> Option<Decimal> {
    // serde_json renders the number exactly as it appeared in the input,
    // which Decimal parses without going through f64 unless the text uses
    // an exponent.
    n.to_string()
        .parse::<Decimal>()
        .ok()
        .or_else(|| n.as_f64().and_then(Decimal::from_f64))
}
