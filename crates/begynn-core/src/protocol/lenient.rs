//! Forgiving field decoders for event bodies.
//!
//! The web content is JavaScript, so a field may arrive as `null`, as a
//! fractional number where an index was expected, or as a number where a
//! string was expected.  None of that may cost an event its type: each
//! decoder here takes whatever JSON value is present and maps it onto the
//! field's type, falling back to the type's default when nothing sensible is
//! left.  Used through `#[serde(deserialize_with = "...")]`.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

use crate::protocol::events::OnboardingPayload;

/// Scalar JSON values as text; `null` and containers yield `None`.
fn text(value: Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

fn float(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok().filter(|f| f.is_finite()),
        _ => None,
    }
}

fn list(value: Value) -> Vec<String> {
    match value {
        Value::Array(items) => items.into_iter().filter_map(text).collect(),
        scalar => text(scalar).into_iter().collect(),
    }
}

pub(crate) fn string<'de, D: Deserializer<'de>>(d: D) -> Result<String, D::Error> {
    Ok(text(Value::deserialize(d)?).unwrap_or_default())
}

pub(crate) fn optional_string<'de, D: Deserializer<'de>>(
    d: D,
) -> Result<Option<String>, D::Error> {
    Ok(text(Value::deserialize(d)?))
}

/// Whole numbers.  Fractions are truncated toward zero, out-of-range values
/// saturate, and negative values are kept.
pub(crate) fn integer<'de, D: Deserializer<'de>>(d: D) -> Result<i64, D::Error> {
    let value = Value::deserialize(d)?;
    let exact = match &value {
        Value::Number(n) => n.as_i64(),
        _ => None,
    };
    Ok(exact.or_else(|| float(&value).map(|f| f as i64)).unwrap_or_default())
}

pub(crate) fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    Ok(float(&Value::deserialize(d)?).unwrap_or_default())
}

/// Only JSON `true` is true.
pub(crate) fn boolean<'de, D: Deserializer<'de>>(d: D) -> Result<bool, D::Error> {
    Ok(matches!(Value::deserialize(d)?, Value::Bool(true)))
}

pub(crate) fn string_list<'de, D: Deserializer<'de>>(d: D) -> Result<Vec<String>, D::Error> {
    Ok(list(Value::deserialize(d)?))
}

pub(crate) fn payload<'de, D: Deserializer<'de>>(d: D) -> Result<OnboardingPayload, D::Error> {
    Ok(match Value::deserialize(d)? {
        Value::Object(fields) => fields.into_iter().map(|(k, v)| (k, list(v))).collect(),
        _ => OnboardingPayload::new(),
    })
}

/// Enums and other typed values: anything that does not decode becomes the
/// default.
pub(crate) fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(serde_json::from_value(Value::deserialize(d)?).unwrap_or_default())
}

// ── Tests ─────────────────────────────────────────────────────────────────────
