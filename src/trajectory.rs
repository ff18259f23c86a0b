//! # Sentiment Trajectory
//! Synthesizes a short backstory that ends at the observed overall sentiment.
//!
//! This is a presentation heuristic, not inference: the earlier points are fixed
//! narrative templates chosen only by the shape of the final snapshot. Nothing here
//! recovers real history.
//!
//! Policy (first match wins):
//!   - negative > 35 → friction arc (5 points)
//!   - positive > 60 → growth arc (4 points)
//!   - otherwise     → mixed arc (3 points)

use serde::Serialize;

use crate::schema::Sentiment;

const FRICTION_NEGATIVE_MIN: f64 = 35.0;
const GROWTH_POSITIVE_MIN: f64 = 60.0;

/// `(label, positive, negative, neutral, annotation)`; empty annotation = unmarked.
type TemplatePoint = (&'static str, f64, f64, f64, &'static str);

const FRICTION_ARC: [TemplatePoint; 4] = [
    ("Start", 80.0, 5.0, 15.0, "Launch Hype"),
    ("Month 1", 65.0, 15.0, 20.0, ""),
    ("Month 2", 45.0, 35.0, 20.0, "Structural Friction Revealed"),
    ("Month 3", 35.0, 55.0, 10.0, "Peak Frustration"),
];

const GROWTH_ARC: [TemplatePoint; 3] = [
    ("Start", 50.0, 20.0, 30.0, "Beta"),
    ("Month 1", 55.0, 15.0, 30.0, ""),
    ("Month 2", 65.0, 10.0, 25.0, "Feature Release"),
];

const MIXED_ARC: [TemplatePoint; 2] = [
    ("Start", 40.0, 20.0, 40.0, "Initial"),
    ("Mid", 45.0, 30.0, 25.0, "Discovery"),
];

const CURRENT_LABEL: &str = "Current";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArcKind {
    Friction,
    Growth,
    Mixed,
}

impl ArcKind {
    fn template(self) -> &'static [TemplatePoint] {
        match self {
            ArcKind::Friction => &FRICTION_ARC,
            ArcKind::Growth => &GROWTH_ARC,
            ArcKind::Mixed => &MIXED_ARC,
        }
    }

    /// Annotation carried by the final (observed) point.
    pub fn closing_annotation(self) -> &'static str {
        match self {
            ArcKind::Friction => "Stabilization",
            ArcKind::Growth => "Adoption",
            ArcKind::Mixed => "Today",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcPoint {
    pub label: String,
    pub positive: f64,
    pub negative: f64,
    pub neutral: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub annotation: Option<String>,
}

impl ArcPoint {
    fn new(label: &str, positive: f64, negative: f64, neutral: f64, annotation: &str) -> Self {
        Self {
            label: label.to_string(),
            positive,
            negative,
            neutral,
            annotation: (!annotation.is_empty()).then(|| annotation.to_string()),
        }
    }

    pub fn is_marked(&self) -> bool {
        self.annotation.as_deref().is_some_and(|a| !a.is_empty())
    }
}

/// Reference line drawn on the trajectory figure.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ArcMarker {
    pub label: String,
    pub annotation: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentArc {
    pub kind: ArcKind,
    pub points: Vec<ArcPoint>,
    pub markers: Vec<ArcMarker>,
}

impl SentimentArc {
    /// Observed snapshot; always present.
    pub fn current(&self) -> Option<&ArcPoint> {
        self.points.last()
    }
}

/// Which template applies. `NaN` shares fail both comparisons and fall to `Mixed`.
pub fn select_arc(current: &Sentiment) -> ArcKind {
    if current.negative > FRICTION_NEGATIVE_MIN {
        ArcKind::Friction
    } else if current.positive > GROWTH_POSITIVE_MIN {
        ArcKind::Growth
    } else {
        ArcKind::Mixed
    }
}

/// Build the arc. The last point carries `current` verbatim plus the closing annotation.
pub fn synthesize(current: &Sentiment) -> SentimentArc {
    let kind = select_arc(current);

    let mut points: Vec<ArcPoint> = kind
        .template()
        .iter()
        .map(|&(label, p, n, u, note)| ArcPoint::new(label, p, n, u, note))
        .collect();
    points.push(ArcPoint::new(
        CURRENT_LABEL,
        current.positive,
        current.negative,
        current.neutral,
        kind.closing_annotation(),
    ));

    let markers = points
        .iter()
        .filter(|p| p.is_marked())
        .map(|p| ArcMarker {
            label: p.label.clone(),
            annotation: p.annotation.clone().unwrap_or_default(),
        })
        .collect();

    SentimentArc {
        kind,
        points,
        markers,
    }
}
