//! # Label Wrapper
//! Greedy line-fill of theme names inside bubbles.
//!
//! Width measurement is injected through [`TextMeasure`]; the algorithm only relies on
//! "wider string ⇒ non-decreasing width". Words are never split: a single word wider
//! than the limit gets a line of its own.

use serde::{Deserialize, Serialize};

/// Width oracle for a rendered string, in pixels.
pub trait TextMeasure {
    fn width(&self, text: &str) -> f64;
}

impl<F> TextMeasure for F
where
    F: Fn(&str) -> f64,
{
    fn width(&self, text: &str) -> f64 {
        self(text)
    }
}

/// Fixed advance per character. Deterministic stand-in for real font metrics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CharWidthMeasure {
    pub px_per_char: f64,
}

impl CharWidthMeasure {
    pub fn new(px_per_char: f64) -> Self {
        Self { px_per_char }
    }

    pub fn from_style(style: &LabelStyle) -> Self {
        Self::new(style.font_size_px * style.char_width_em)
    }
}

impl TextMeasure for CharWidthMeasure {
    fn width(&self, text: &str) -> f64 {
        text.chars().count() as f64 * self.px_per_char
    }
}

/// Typography used for bubble labels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelStyle {
    /// Fraction of the bubble radius available for text (`max width = factor × r`).
    pub width_factor: f64,
    /// Line advance in ems.
    pub line_height_em: f64,
    pub font_size_px: f64,
    /// Average glyph advance in ems, used by [`CharWidthMeasure`].
    pub char_width_em: f64,
}

impl Default for LabelStyle {
    fn default() -> Self {
        Self {
            width_factor: 1.6,
            line_height_em: 1.1,
            font_size_px: 10.0,
            char_width_em: 0.6,
        }
    }
}

/// Split `text` into lines no wider than `max_width`, except single-word lines.
///
/// Always returns at least one line (empty input yields one empty line).
pub fn wrap<M>(text: &str, max_width: f64, measure: &M) -> Vec<String>
where
    M: TextMeasure + ?Sized,
{
    let mut lines = Vec::new();
    let mut line: Vec<&str> = Vec::new();

    for word in text.split_whitespace() {
        line.push(word);
        if line.len() > 1 && measure.width(&line.join(" ")) > max_width {
            line.pop();
            lines.push(line.join(" "));
            line.clear();
            line.push(word);
        }
    }
    lines.push(line.join(" "));
    lines
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LabelLine {
    pub text: String,
    /// Baseline offset from the bubble center, in ems.
    pub dy_em: f64,
}

/// Wrapped label, vertically centered as a block on the bubble center.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WrappedLabel {
    pub lines: Vec<LabelLine>,
    pub line_height_em: f64,
    pub font_size_px: f64,
}

impl WrappedLabel {
    pub fn texts(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(|l| l.text.as_str())
    }
}

/// Wrap a label for a bubble of radius `radius`.
///
/// The first line sits at `-((n - 1) / 2) × line_height`, each following line one
/// line height lower.
pub fn wrap_label<M>(text: &str, radius: f64, style: &LabelStyle, measure: &M) -> WrappedLabel
where
    M: TextMeasure + ?Sized,
{
    let texts = wrap(text, radius * style.width_factor, measure);
    let n = texts.len() as f64;
    let start = -((n - 1.0) * style.line_height_em) / 2.0;

    let lines = texts
        .into_iter()
        .enumerate()
        .map(|(i, text)| LabelLine {
            text,
            dy_em: start + i as f64 * style.line_height_em,
        })
        .collect();

    WrappedLabel {
        lines,
        line_height_em: style.line_height_em,
        font_size_px: style.font_size_px,
    }
}
