// ── Lenient field decoding ──
//
// The store has no schema. Older web clients wrote `""` for an unset price
// or rating and numeric strings from form inputs; one odd record must not
// fail the whole collection load.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// Number, numeric string, `""` or `null` → `Option<f64>`.
pub(crate) fn lenient_price<'de, D: Deserializer<'de>>(d: D) -> Result<Option<f64>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value.as_ref().and_then(number_like).filter(|p| p.is_finite()))
}

/// Integer, integral float or numeric string in 1..=5 → `Option<u8>`.
///
/// Anything outside the star range loads as "no rating".
pub(crate) fn lenient_rating<'de, D: Deserializer<'de>>(d: D) -> Result<Option<u8>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value
        .as_ref()
        .and_then(number_like)
        .filter(|r| r.fract() == 0.0)
        .and_then(|r| (1..=5u8).find(|star| (f64::from(*star) - r).abs() < f64::EPSILON)))
}

/// RFC 3339 string → timestamp; missing or unparseable → `None`.
pub(crate) fn lenient_timestamp<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<DateTime<Utc>>, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(value
        .as_ref()
        .and_then(Value::as_str)
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|t| t.with_timezone(&Utc)))
}

/// String or `null` → `String`; numbers are stringified (`"ram": 8`).
pub(crate) fn lenient_text<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    let value = Option::<Value>::deserialize(d)?;
    Ok(match value {
        Some(Value::String(s)) => s,
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        _ => String::new(),
    })
}

/// Empty strings collapse to `None`.
pub(crate) fn lenient_opt_text<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<String>, D::Error> {
    let text = lenient_text(d)?;
    Ok(Some(text).filter(|s| !s.is_empty()))
}

fn number_like(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    }
}
