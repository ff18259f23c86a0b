//! # Schema Validator
//! Presence-only gate in front of every derived figure.
//!
//! The imported text and the parsed document are kept alongside the typed view so
//! that export can reproduce exactly what was imported (key order, numeric text and
//! string escapes included).

use serde_json::Value;

use crate::error::SchemaError;
use crate::schema::{NarrativeSchema, Sentiment, Theme};

const REQUIRED_KEYS: [&str; 2] = ["themes", "sentiment_overall"];

/// A document that passed validation. Immutable for the lifetime of a render.
#[derive(Debug, Clone)]
pub struct ValidatedSchema {
    source: String,
    raw: Value,
    schema: NarrativeSchema,
}

impl ValidatedSchema {
    /// Imported text, verbatim.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Original document as parsed.
    pub fn raw(&self) -> &Value {
        &self.raw
    }

    /// Lenient typed view.
    pub fn schema(&self) -> &NarrativeSchema {
        &self.schema
    }

    pub fn themes(&self) -> &[Theme] {
        &self.schema.themes
    }

    pub fn sentiment_overall(&self) -> Sentiment {
        self.schema.sentiment_overall
    }

    /// `Theme[] × Sentiment`, the minimal contract downstream components rely on.
    pub fn parts(&self) -> (&[Theme], Sentiment) {
        (self.themes(), self.sentiment_overall())
    }
}

/// Parse and gate raw pasted text.
///
/// - not JSON → [`SchemaError::MalformedInput`]
/// - JSON without a truthy `themes` or `sentiment_overall` (absent, `null`, `false`,
///   `0` or `""`) → [`SchemaError::SchemaViolation`]
///
/// Field types and ranges are not checked.
pub fn validate(raw: &str) -> Result<ValidatedSchema, SchemaError> {
    let doc: Value =
        serde_json::from_str(raw).map_err(|e| SchemaError::MalformedInput(e.to_string()))?;

    check_required(&doc)?;

    // Cannot fail on an object once the gate passed: every field is lenient.
    let schema: NarrativeSchema =
        serde_json::from_str(raw).map_err(|e| SchemaError::MalformedInput(e.to_string()))?;

    Ok(ValidatedSchema {
        source: raw.to_owned(),
        raw: doc,
        schema,
    })
}

fn check_required(doc: &Value) -> Result<(), SchemaError> {
    let present = |key: &str| doc.get(key).is_some_and(truthy);
    if REQUIRED_KEYS.iter().all(|k| present(k)) {
        Ok(())
    } else {
        Err(SchemaError::SchemaViolation)
    }
}

/// Empty arrays and objects count as present; only scalar "nothing" values do not.
fn truthy(v: &Value) -> bool {
    match v {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}
