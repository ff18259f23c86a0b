//! # Narrative Schema
//! Typed, read-only view over an imported report document.
//!
//! Every field is deserialized leniently (see [`lenient`]): a malformed theme does not
//! reject the document, it renders blank further down the pipeline. Numbers that are
//! absent or not numeric become `NaN`, which serializes back out as `null`.

pub mod lenient;

use serde::{Deserialize, Serialize};

/// Fill color for themes whose net sentiment is strictly positive.
pub const COLOR_POSITIVE: &str = "#3B8C6E";
/// Fill color for every other theme (including net == 0 and unknown).
pub const COLOR_NEGATIVE: &str = "#BE3E3E";
/// Neutral series color used by the trajectory figure.
pub const COLOR_NEUTRAL: &str = "#A8A29E";

/// Share of discourse volume, in percent. Not normalized: the three parts may not sum to 100.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Sentiment {
    #[serde(default = "lenient::nan", deserialize_with = "lenient::number")]
    pub positive: f64,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::number")]
    pub negative: f64,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::number")]
    pub neutral: f64,
}

impl Sentiment {
    pub fn new(positive: f64, negative: f64, neutral: f64) -> Self {
        Self {
            positive,
            negative,
            neutral,
        }
    }

    /// `positive - negative`, nominally in [-100, 100].
    pub fn net(&self) -> f64 {
        self.positive - self.negative
    }
}

impl Default for Sentiment {
    /// Unknown sentiment: every share is `NaN`.
    fn default() -> Self {
        Self::new(f64::NAN, f64::NAN, f64::NAN)
    }
}

/// Binary classification shared by every figure.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Polarity {
    PositiveDriver,
    FrictionPoint,
}

impl Polarity {
    /// Strictly positive net sentiment is a driver; zero and `NaN` are friction.
    pub fn from_net(net: f64) -> Self {
        if net > 0.0 {
            Polarity::PositiveDriver
        } else {
            Polarity::FrictionPoint
        }
    }

    pub fn color(self) -> &'static str {
        match self {
            Polarity::PositiveDriver => COLOR_POSITIVE,
            Polarity::FrictionPoint => COLOR_NEGATIVE,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Polarity::PositiveDriver => "Positive Driver",
            Polarity::FrictionPoint => "Friction Point",
        }
    }

    /// Node group used by the tension graph (1 = driver, 2 = friction).
    pub fn group(self) -> u8 {
        match self {
            Polarity::PositiveDriver => 1,
            Polarity::FrictionPoint => 2,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Insight {
    #[serde(default, deserialize_with = "lenient::string")]
    pub insight: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub verbatim: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub why_valuable: String,
}

/// A clustered topic of discourse.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Theme {
    #[serde(default, deserialize_with = "lenient::string")]
    pub name: String,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::number")]
    pub count: f64,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::number")]
    pub percentage: f64,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub sentiment: Sentiment,
    #[serde(
        default,
        deserialize_with = "lenient::opt_string",
        skip_serializing_if = "Option::is_none"
    )]
    pub description: Option<String>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_seq",
        skip_serializing_if = "Option::is_none"
    )]
    pub key_phrases: Option<Vec<String>>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_seq",
        skip_serializing_if = "Option::is_none"
    )]
    pub insights: Option<Vec<Insight>>,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            name: String::new(),
            count: f64::NAN,
            percentage: f64::NAN,
            sentiment: Sentiment::default(),
            description: None,
            key_phrases: None,
            insights: None,
        }
    }
}

impl Theme {
    /// Minimal constructor used by tests and tools.
    pub fn new(name: impl Into<String>, count: f64, percentage: f64, sentiment: Sentiment) -> Self {
        Self {
            name: name.into(),
            count,
            percentage,
            sentiment,
            ..Self::default()
        }
    }

    pub fn net_sentiment(&self) -> f64 {
        self.sentiment.net()
    }

    pub fn polarity(&self) -> Polarity {
        Polarity::from_net(self.net_sentiment())
    }

    pub fn key_phrases(&self) -> &[String] {
        self.key_phrases.as_deref().unwrap_or_default()
    }

    pub fn insights(&self) -> &[Insight] {
        self.insights.as_deref().unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Source {
    #[serde(default, deserialize_with = "lenient::string")]
    pub url: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub title: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub snippet: String,
    #[serde(default, deserialize_with = "lenient::string")]
    pub published_date: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Stance {
    Positive,
    Negative,
    Neutral,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Opinion {
    #[serde(default, deserialize_with = "lenient::string")]
    pub text: String,
    #[serde(default = "lenient::nan", deserialize_with = "lenient::number")]
    pub percentage: f64,
    #[serde(default, deserialize_with = "lenient::opt")]
    pub sentiment: Option<Stance>,
}

impl Default for Opinion {
    fn default() -> Self {
        Self {
            text: String::new(),
            percentage: f64::NAN,
            sentiment: None,
        }
    }
}

/// Free-form report identity.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Meta {
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub question: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub topic: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub takeaway: Option<String>,
    #[serde(default, deserialize_with = "lenient::opt_string", skip_serializing_if = "Option::is_none")]
    pub hero_image_url: Option<String>,
}

/// Root aggregate. Theme order is display order and is never re-sorted.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NarrativeSchema {
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub meta: Meta,
    #[serde(default, deserialize_with = "lenient::or_default")]
    pub sentiment_overall: Sentiment,
    #[serde(default, deserialize_with = "lenient::seq")]
    pub themes: Vec<Theme>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_seq",
        skip_serializing_if = "Option::is_none"
    )]
    pub opinions: Option<Vec<Opinion>>,
    #[serde(
        default,
        deserialize_with = "lenient::opt_seq",
        skip_serializing_if = "Option::is_none"
    )]
    pub sources: Option<Vec<Source>>,
}

impl NarrativeSchema {
    pub fn sources(&self) -> &[Source] {
        self.sources.as_deref().unwrap_or_default()
    }

    pub fn opinions(&self) -> &[Opinion] {
        self.opinions.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn net_sentiment_sign_drives_polarity() {
        let pos = Theme::new("a", 1.0, 1.0, Sentiment::new(85.0, 5.0, 10.0));
        let neg = Theme::new("b", 1.0, 1.0, Sentiment::new(5.0, 85.0, 10.0));
        let flat = Theme::new("c", 1.0, 1.0, Sentiment::new(40.0, 40.0, 20.0));
        assert!((pos.net_sentiment() - 80.0).abs() < 1e-9);
        assert_eq!(pos.polarity(), Polarity::PositiveDriver);
        assert_eq!(neg.polarity(), Polarity::FrictionPoint);
        assert_eq!(flat.polarity(), Polarity::FrictionPoint);
        assert_eq!(pos.polarity().group(), 1);
        assert_eq!(flat.polarity().color(), COLOR_NEGATIVE);
    }

    #[test]
    fn theme_with_missing_fields_still_parses() {
        let t: Theme = serde_json::from_str(r#"{"name":"Bare","sentiment":{"negative":12}}"#).unwrap();
        assert_eq!(t.name, "Bare");
        assert!(t.count.is_nan());
        assert!(t.sentiment.positive.is_nan());
        assert!(t.net_sentiment().is_nan());
        assert_eq!(t.polarity(), Polarity::FrictionPoint);
        assert!(t.key_phrases().is_empty());
        assert!(t.insights().is_empty());
    }

    #[test]
    fn camel_case_fields_are_read() {
        let t: Theme = serde_json::from_str(
            r#"{"name":"X","count":3,"percentage":10,"sentiment":{"positive":1,"negative":2,"neutral":3},
                "keyPhrases":["one","two"],
                "insights":[{"insight":"i","verbatim":"v","whyValuable":"w"}]}"#,
        )
        .unwrap();
        assert_eq!(t.key_phrases(), ["one".to_string(), "two".to_string()]);
        assert_eq!(t.insights()[0].why_valuable, "w");
    }

    #[test]
    fn opinions_with_unknown_stance_keep_text() {
        let s: NarrativeSchema = serde_json::from_str(
            r#"{"themes":[],"sentiment_overall":{},"opinions":[{"text":"meh","percentage":5,"sentiment":"mixed"}]}"#,
        )
        .unwrap();
        assert_eq!(s.opinions()[0].text, "meh");
        assert_eq!(s.opinions()[0].sentiment, None);
    }
}
