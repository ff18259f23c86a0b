// src/report/breakdown.rs
use serde::Serialize;

use crate::schema::{Insight, Polarity, Theme};

/// One row of the per-theme detail list.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ThemeBreakdown {
    pub name: String,
    pub polarity: Polarity,
    /// "Positive Driver" / "Friction Point".
    pub classification: &'static str,
    pub color: &'static str,
    pub percentage: f64,
    pub description: Option<String>,
    pub key_phrases: Vec<String>,
    pub insights: Vec<Insight>,
}

pub fn breakdown(themes: &[Theme]) -> Vec<ThemeBreakdown> {
    themes
        .iter()
        .map(|t| {
            let polarity = t.polarity();
            ThemeBreakdown {
                name: t.name.clone(),
                polarity,
                classification: polarity.label(),
                color: polarity.color(),
                percentage: t.percentage,
                description: t.description.clone(),
                key_phrases: t.key_phrases().to_vec(),
                insights: t.insights().to_vec(),
            }
        })
        .collect()
}
