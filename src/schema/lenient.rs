//! Field-level deserializers that never reject a document.
//!
//! Only presence of `themes` / `sentiment_overall` is enforced (see `validate`).
//! Everything below that degrades: numbers become `NaN`, strings become empty or `None`,
//! sequences become empty, and malformed elements fall back to their `Default`.

use serde::{de::DeserializeOwned, Deserialize, Deserializer};
use serde_json::Value;

/// Default for numeric fields that are absent.
pub fn nan() -> f64 {
    f64::NAN
}

/// Any JSON number as `f64`; everything else is `NaN`.
pub fn number<'de, D>(d: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(v.as_f64().unwrap_or(f64::NAN))
}

/// Strings pass through, numbers are rendered, anything else is blank.
pub fn string<'de, D>(d: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::String(s) => s,
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    })
}

/// `Some` only for an actual JSON string.
pub fn opt_string<'de, D>(d: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let v = Value::deserialize(d)?;
    Ok(match v {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Nested object that falls back to `T::default()` when it does not fit.
pub fn or_default<'de, D, T>(d: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let v = Value::deserialize(d)?;
    Ok(T::deserialize(v).unwrap_or_default())
}

/// Optional value that is `None` when it does not fit.
pub fn opt<'de, D, T>(d: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned,
{
    let v = Value::deserialize(d)?;
    Ok(T::deserialize(v).ok())
}

/// Required sequence: a non-array becomes empty, a malformed element becomes `T::default()`
/// so positional indices are kept intact.
pub fn seq<'de, D, T>(d: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let v = Value::deserialize(d)?;
    Ok(collect_items(v).unwrap_or_default())
}

/// Optional sequence: `None` unless the value is an array.
pub fn opt_seq<'de, D, T>(d: D) -> Result<Option<Vec<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let v = Value::deserialize(d)?;
    Ok(collect_items(v))
}

fn collect_items<T>(v: Value) -> Option<Vec<T>>
where
    T: DeserializeOwned + Default,
{
    match v {
        Value::Array(items) => Some(
            items
                .into_iter()
                .map(|it| T::deserialize(it).unwrap_or_default())
                .collect(),
        ),
        _ => None,
    }
}
