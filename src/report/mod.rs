//! Aggregate view bound by the report composer.
//!
//! Each figure is a pure function of the validated schema and the layout config. Only
//! the tension figure can come back empty-handed: its settle is abandoned if the
//! owning report is replaced mid-run.

pub mod breakdown;
pub mod quotes;
pub mod sources;

use serde::Serialize;

use crate::config::LayoutConfig;
use crate::fingerprint::{fingerprints, Fingerprint};
use crate::force::ForceSimulation;
use crate::landscape::{landscape, Landscape};
use crate::schema::{Meta, Sentiment};
use crate::tension::{build_graph, settle, TensionFrame};
use crate::trajectory::{synthesize, SentimentArc};
use crate::validate::ValidatedSchema;
use crate::wrap::CharWidthMeasure;

pub use breakdown::{breakdown, ThemeBreakdown};
pub use quotes::{notable_quotes, NotableQuote};
pub use sources::{source_list, SourceEntry};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub meta: Meta,
    pub sentiment_overall: Sentiment,
    pub landscape: Landscape,
    pub tension: TensionFrame,
    pub trajectory: SentimentArc,
    pub fingerprints: Vec<Fingerprint>,
    pub breakdown: Vec<ThemeBreakdown>,
    pub quotes: Vec<NotableQuote>,
    pub sources: Vec<SourceEntry>,
}

impl Report {
    /// Derive every figure. `None` when `is_live` turned false during the tension settle.
    pub fn compose<S, L>(
        validated: &ValidatedSchema,
        cfg: &LayoutConfig,
        sim: &mut S,
        is_live: L,
    ) -> Option<Self>
    where
        S: ForceSimulation + ?Sized,
        L: Fn() -> bool,
    {
        let schema = validated.schema();
        let themes = validated.themes();

        let tension = settle(
            &build_graph(themes, cfg.tension.threshold),
            &cfg.tension,
            sim,
            is_live,
        )?;

        Some(Self {
            meta: schema.meta.clone(),
            sentiment_overall: schema.sentiment_overall,
            landscape: landscape_figure(validated, cfg),
            tension,
            trajectory: synthesize(&schema.sentiment_overall),
            fingerprints: fingerprints(themes, &cfg.fingerprint),
            breakdown: breakdown(themes),
            quotes: notable_quotes(themes, cfg.quotes.limit),
            sources: source_list(schema.sources()),
        })
    }
}

/// Landscape with the configured label metrics.
pub fn landscape_figure(validated: &ValidatedSchema, cfg: &LayoutConfig) -> Landscape {
    landscape(
        validated.themes(),
        &cfg.landscape,
        &cfg.label,
        &CharWidthMeasure::from_style(&cfg.label),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_schema;
    use crate::force::DecayingForceLayout;

    #[test]
    fn demo_report_has_every_figure() {
        let v = default_schema().unwrap();
        let cfg = LayoutConfig::default();
        let r = Report::compose(&v, &cfg, &mut DecayingForceLayout::default(), || true).unwrap();
        assert_eq!(r.landscape.nodes.len(), 4);
        assert_eq!(r.tension.nodes.len(), 4);
        assert_eq!(r.fingerprints.len(), 4);
        assert_eq!(r.breakdown.len(), 4);
        assert!(r.quotes.len() <= 4);
        assert_eq!(r.sources.len(), 4);
        assert_eq!(r.trajectory.kind, crate::trajectory::ArcKind::Friction);
    }

    #[test]
    fn stale_compose_returns_none() {
        let v = default_schema().unwrap();
        let out = Report::compose(&v, &LayoutConfig::default(), &mut DecayingForceLayout::default(), || false);
        assert!(out.is_none());
    }
}
