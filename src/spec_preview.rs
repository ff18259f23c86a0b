//! Vega-Lite chart spec for inspection only. Nothing in the crate renders from it.

use serde_json::{json, Value};

use crate::validate::ValidatedSchema;

pub const VEGA_LITE_SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Circle plot of themes: positive share vs. volume, sized by share, colored by name.
/// Data values are the themes exactly as imported.
pub fn spec_preview(validated: &ValidatedSchema) -> Value {
    let themes = match validated.raw().get("themes") {
        Some(v @ Value::Array(_)) => v.clone(),
        _ => Value::Array(Vec::new()),
    };

    json!({
        "$schema": VEGA_LITE_SCHEMA,
        "description": "Narrative Landscape",
        "data": { "values": themes },
        "mark": "circle",
        "encoding": {
            "x": { "field": "sentiment.positive", "type": "quantitative", "title": "Positive Sentiment" },
            "y": { "field": "count", "type": "quantitative", "title": "Volume" },
            "size": { "field": "percentage", "type": "quantitative" },
            "color": { "field": "name", "type": "nominal" }
        }
    })
}
