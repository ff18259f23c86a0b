//! # Theme Fingerprints
//! Five 0–100 axes per theme for radar comparison.
//!
//! | Axis        | Value                                        |
//! |-------------|----------------------------------------------|
//! | Positivity  | `sentiment.positive`                         |
//! | Attention   | `percentage / ceiling × 100`                 |
//! | Controversy | `min(positive, negative) × 2`                |
//! | Negativity  | `sentiment.negative`                         |
//! | Uniqueness  | from [`UniquenessPolicy`]; see below         |
//!
//! Uniqueness has no real signal in the schema. It is never random: the policy either
//! emits a flagged constant, a flagged hash of the theme name, or a value supplied by
//! the operator.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::schema::{Polarity, Theme};

pub const FULL_MARK: f64 = 100.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Axis {
    Positivity,
    Attention,
    Controversy,
    Negativity,
    Uniqueness,
}

impl Axis {
    pub const ALL: [Axis; 5] = [
        Axis::Positivity,
        Axis::Attention,
        Axis::Controversy,
        Axis::Negativity,
        Axis::Uniqueness,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct AxisValue {
    pub axis: Axis,
    pub value: f64,
    pub full_mark: f64,
    /// True when the value is a stand-in rather than a measurement.
    pub placeholder: bool,
}

impl AxisValue {
    fn measured(axis: Axis, value: f64) -> Self {
        Self {
            axis,
            value: clamp(value),
            full_mark: FULL_MARK,
            placeholder: false,
        }
    }
}

/// Clamp into `[0, 100]`, keeping `NaN`.
fn clamp(v: f64) -> f64 {
    if v.is_nan() {
        v
    } else {
        v.clamp(0.0, FULL_MARK)
    }
}

/// Source of the Uniqueness axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum UniquenessPolicy {
    /// Fixed value for every theme.
    Placeholder {
        #[serde(default = "default_placeholder")]
        value: f64,
    },
    /// Stable value in `[60, 100)` derived from the theme name.
    NameHash,
    /// Operator-supplied values keyed by theme name; unknown names get `fallback`.
    External {
        #[serde(default)]
        values: BTreeMap<String, f64>,
        #[serde(default = "default_placeholder")]
        fallback: f64,
    },
}

fn default_placeholder() -> f64 {
    80.0
}

impl Default for UniquenessPolicy {
    fn default() -> Self {
        UniquenessPolicy::Placeholder {
            value: default_placeholder(),
        }
    }
}

impl UniquenessPolicy {
    pub fn axis_value(&self, theme_name: &str) -> AxisValue {
        let (value, placeholder) = match self {
            UniquenessPolicy::Placeholder { value } => (*value, true),
            UniquenessPolicy::NameHash => (name_hash(theme_name), true),
            UniquenessPolicy::External { values, fallback } => match values.get(theme_name) {
                Some(v) => (*v, false),
                None => (*fallback, true),
            },
        };
        AxisValue {
            axis: Axis::Uniqueness,
            value: clamp(value),
            full_mark: FULL_MARK,
            placeholder,
        }
    }
}

/// First 8 digest bytes scaled into `[60, 100)`.
fn name_hash(name: &str) -> f64 {
    let digest = Sha256::digest(name.as_bytes());
    let mut head = [0u8; 8];
    head.copy_from_slice(&digest[..8]);
    let unit = u64::from_be_bytes(head) as f64 / (u64::MAX as f64 + 1.0);
    60.0 + unit * 40.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FingerprintParams {
    /// Volume share treated as full attention.
    pub attention_ceiling: f64,
    pub uniqueness: UniquenessPolicy,
}

impl Default for FingerprintParams {
    fn default() -> Self {
        Self {
            attention_ceiling: 30.0,
            uniqueness: UniquenessPolicy::default(),
        }
    }
}

/// The five axes for one theme, in [`Axis::ALL`] order.
pub fn normalize(theme: &Theme, params: &FingerprintParams) -> [AxisValue; 5] {
    let s = theme.sentiment;
    [
        AxisValue::measured(Axis::Positivity, s.positive),
        AxisValue::measured(
            Axis::Attention,
            (theme.percentage / params.attention_ceiling) * FULL_MARK,
        ),
        AxisValue::measured(Axis::Controversy, s.positive.min(s.negative) * 2.0),
        AxisValue::measured(Axis::Negativity, s.negative),
        params.uniqueness.axis_value(&theme.name),
    ]
}

/// Dominant-side summary shown on each fingerprint card.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Badge {
    /// Share of the dominant side.
    pub share: f64,
    /// `"Pos"` or `"Neg"`.
    pub side: &'static str,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fingerprint {
    pub name: String,
    pub color: &'static str,
    pub badge: Badge,
    pub axes: [AxisValue; 5],
}

pub fn fingerprint(theme: &Theme, params: &FingerprintParams) -> Fingerprint {
    let polarity = Polarity::from_net(theme.sentiment.positive - theme.sentiment.negative);
    let badge = match polarity {
        Polarity::PositiveDriver => Badge {
            share: theme.sentiment.positive,
            side: "Pos",
            volume: theme.percentage,
        },
        Polarity::FrictionPoint => Badge {
            share: theme.sentiment.negative,
            side: "Neg",
            volume: theme.percentage,
        },
    };
    Fingerprint {
        name: theme.name.clone(),
        color: polarity.color(),
        badge,
        axes: normalize(theme, params),
    }
}

pub fn fingerprints(themes: &[Theme], params: &FingerprintParams) -> Vec<Fingerprint> {
    themes.iter().map(|t| fingerprint(t, params)).collect()
}
