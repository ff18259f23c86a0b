//! # Narrative Landscape
//! Deterministic bubble layout on a net-sentiment axis.
//!
//! - x: linear scale, net sentiment [-100, 100] → [margin.left, width - margin.right]
//! - r: sqrt scale, count [0, max count] → radius range (area linear in volume)
//! - y: drivers sit on the center line; friction themes zigzag around it by index
//!   (`(-1)^i × (base + i × step)`, `i` counted over all themes)
//! - even indices land below the center line (+y in screen space); renderers that
//!   start the zigzag upward show the same layout mirrored
//!
//! The zigzag is an approximation, not a collision solver. Theme counts are small.

use serde::{Deserialize, Serialize};

use crate::schema::{Polarity, Theme};
use crate::wrap::{wrap_label, LabelStyle, TextMeasure, WrappedLabel};

/// Domain of the net-sentiment axis.
const NET_DOMAIN: (f64, f64) = (-100.0, 100.0);
/// Count domain used when no theme has a positive finite count.
const FALLBACK_MAX_COUNT: f64 = 100.0;

const NEGATIVE_CAPTION: &str = "← NEGATIVE / FRICTION";
const POSITIVE_CAPTION: &str = "POSITIVE / RESONANCE →";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Margins {
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub left: f64,
}

impl Margins {
    pub fn uniform(v: f64) -> Self {
        Self {
            top: v,
            right: v,
            bottom: v,
            left: v,
        }
    }
}

impl Default for Margins {
    fn default() -> Self {
        Self::uniform(60.0)
    }
}

/// Canvas and scale parameters for the landscape figure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LandscapeParams {
    pub width: f64,
    pub height: f64,
    pub margins: Margins,
    /// `[min, max]` bubble radius in px.
    pub radius_range: [f64; 2],
    pub stagger_base: f64,
    pub stagger_step: f64,
}

impl Default for LandscapeParams {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 360.0,
            margins: Margins::default(),
            radius_range: [35.0, 75.0],
            stagger_base: 25.0,
            stagger_step: 5.0,
        }
    }
}

impl LandscapeParams {
    pub fn center_y(&self) -> f64 {
        self.height / 2.0
    }

    /// Net sentiment → x.
    pub fn x_for(&self, net: f64) -> f64 {
        let (d0, d1) = NET_DOMAIN;
        let r0 = self.margins.left;
        let r1 = self.width - self.margins.right;
        r0 + (net - d0) / (d1 - d0) * (r1 - r0)
    }

    /// Count → radius, sqrt scale over `[0, max_count]`.
    pub fn radius_for(&self, count: f64, max_count: f64) -> f64 {
        let [r0, r1] = self.radius_range;
        r0 + signed_sqrt(count) / max_count.sqrt() * (r1 - r0)
    }

    /// Vertical offset from the center line for the theme at `index`.
    pub fn stagger(&self, index: usize, net: f64) -> f64 {
        if net < 0.0 {
            let sign = if index % 2 == 0 { 1.0 } else { -1.0 };
            sign * (self.stagger_base + index as f64 * self.stagger_step)
        } else {
            0.0
        }
    }
}

/// Sign-preserving square root, so a negative count maps below the range instead of `NaN`.
fn signed_sqrt(v: f64) -> f64 {
    if v < 0.0 {
        -(-v).sqrt()
    } else {
        v.sqrt()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BubbleNode {
    pub name: String,
    pub count: f64,
    pub net_sentiment: f64,
    pub polarity: Polarity,
    pub x: f64,
    pub y: f64,
    pub r: f64,
    pub color: &'static str,
    pub label: WrappedLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisGuide {
    pub x1: f64,
    pub x2: f64,
    pub y: f64,
    /// x of the net-sentiment zero marker.
    pub zero_x: f64,
    pub negative_caption: &'static str,
    pub positive_caption: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Landscape {
    pub width: f64,
    pub height: f64,
    pub axis: AxisGuide,
    pub nodes: Vec<BubbleNode>,
}

/// Largest positive finite count, or the fallback domain.
fn max_count(themes: &[Theme]) -> f64 {
    let max = themes
        .iter()
        .map(|t| t.count)
        .filter(|c| c.is_finite())
        .fold(f64::NEG_INFINITY, f64::max);
    if max > 0.0 {
        max
    } else {
        FALLBACK_MAX_COUNT
    }
}

/// Place every theme, in input order. Identical input yields identical output.
pub fn layout<M>(
    themes: &[Theme],
    params: &LandscapeParams,
    style: &LabelStyle,
    measure: &M,
) -> Vec<BubbleNode>
where
    M: TextMeasure + ?Sized,
{
    let max = max_count(themes);
    let center_y = params.center_y();

    themes
        .iter()
        .enumerate()
        .map(|(i, t)| {
            let net = t.net_sentiment();
            let polarity = Polarity::from_net(net);
            let r = params.radius_for(t.count, max);
            BubbleNode {
                name: t.name.clone(),
                count: t.count,
                net_sentiment: net,
                polarity,
                x: params.x_for(net),
                y: center_y + params.stagger(i, net),
                r,
                color: polarity.color(),
                label: wrap_label(&t.name, r, style, measure),
            }
        })
        .collect()
}

/// Full figure: nodes plus the axis geometry the composer draws behind them.
pub fn landscape<M>(
    themes: &[Theme],
    params: &LandscapeParams,
    style: &LabelStyle,
    measure: &M,
) -> Landscape
where
    M: TextMeasure + ?Sized,
{
    Landscape {
        width: params.width,
        height: params.height,
        axis: AxisGuide {
            x1: params.margins.left,
            x2: params.width - params.margins.right,
            y: params.center_y(),
            zero_x: params.x_for(0.0),
            negative_caption: NEGATIVE_CAPTION,
            positive_caption: POSITIVE_CAPTION,
        },
        nodes: layout(themes, params, style, measure),
    }
}
