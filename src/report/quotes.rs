// src/report/quotes.rs
use serde::Serialize;

use crate::schema::Theme;

pub const DEFAULT_QUOTE_LIMIT: usize = 4;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NotableQuote {
    pub theme: String,
    pub verbatim: String,
    pub insight: String,
    pub color: &'static str,
}

/// Insights with a non-empty verbatim, flattened in theme order, first `limit` only.
pub fn notable_quotes(themes: &[Theme], limit: usize) -> Vec<NotableQuote> {
    themes
        .iter()
        .flat_map(|t| {
            t.insights()
                .iter()
                .filter(|i| !i.verbatim.trim().is_empty())
                .map(move |i| NotableQuote {
                    theme: t.name.clone(),
                    verbatim: i.verbatim.clone(),
                    insight: i.insight.clone(),
                    color: t.polarity().color(),
                })
        })
        .take(limit)
        .collect()
}
