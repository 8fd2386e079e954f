//! Sentiment normalization and presentation.
//!
//! Classifier adapters speak whatever label vocabulary their model was trained
//! with. This module turns that output into a [`SentimentResult`] over the
//! canonical vocabulary {positive, neutral, negative} and renders it for
//! people or programs.
//!
//! ## Main Types
//!
//! - [`Classifier`] - the adapter seam; anything that scores text
//! - [`SentimentAnalyzer`] - normalizer with the empty-input and failure fallbacks
//! - [`LabelMapping`] - versioned table from native labels to [`Sentiment`]
//! - [`KeywordClassifier`] - rule-based adapter used when no model is available
//! - [`report`] - markdown rendering of a result
//!
//! ## Usage Example
//!
//! ```rust
//! use sentiment_service::sentiment::{classifier, ModelVariant, Sentiment, SentimentAnalyzer};
//!
//! let classifier = classifier::from_fn(|_| Ok(vec![("POSITIVE".to_string(), 0.98_f32)]));
//! let analyzer = SentimentAnalyzer::new(classifier, ModelVariant::Binary);
//!
//! let result = analyzer.analyze("I love it!");
//! assert_eq!(result.sentiment, Sentiment::Positive);
//! assert_eq!(result.score, 0.98);
//! ```

pub mod analyzer;
pub mod classifier;
pub mod keyword;
pub mod labels;
pub mod report;

pub use analyzer::SentimentAnalyzer;
pub use classifier::{from_fn, Classifier, FnClassifier, LabelScores};
pub use keyword::KeywordClassifier;
pub use labels::LabelMapping;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The canonical sentiment vocabulary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    /// Fixed priority order, also used to break ties between equal scores.
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }
}

impl fmt::Display for Sentiment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Sentiment {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "positive" => Ok(Sentiment::Positive),
            "neutral" => Ok(Sentiment::Neutral),
            "negative" => Ok(Sentiment::Negative),
            other => Err(format!("unknown sentiment '{other}'")),
        }
    }
}

/// Which kind of model backs the service.
///
/// Both variants share the request/response shape; they differ in how the
/// adapter output is normalized and how reports are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModelVariant {
    /// Single-language positive/negative model.
    #[default]
    Binary,
    /// Multilingual positive/neutral/negative model.
    Multilingual,
}

impl fmt::Display for ModelVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ModelVariant::Binary => f.write_str("binary"),
            ModelVariant::Multilingual => f.write_str("multilingual"),
        }
    }
}

impl FromStr for ModelVariant {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "binary" => Ok(ModelVariant::Binary),
            "multilingual" | "multiclass" | "three-class" => Ok(ModelVariant::Multilingual),
            other => Err(format!(
                "unknown model variant '{other}' (expected 'binary' or 'multilingual')"
            )),
        }
    }
}

/// Per-class confidences of a three-class result.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ClassScores {
    pub positive: f64,
    pub neutral: f64,
    pub negative: f64,
}

impl ClassScores {
    pub fn get(&self, sentiment: Sentiment) -> f64 {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Neutral => self.neutral,
            Sentiment::Negative => self.negative,
        }
    }

    fn get_mut(&mut self, sentiment: Sentiment) -> &mut f64 {
        match sentiment {
            Sentiment::Positive => &mut self.positive,
            Sentiment::Neutral => &mut self.neutral,
            Sentiment::Negative => &mut self.negative,
        }
    }

    /// Highest-scoring class. On equal scores the earlier class in
    /// [`Sentiment::ALL`] wins.
    pub fn dominant(&self) -> Sentiment {
        let mut best = Sentiment::Positive;
        for sentiment in Sentiment::ALL {
            if self.get(sentiment) > self.get(best) {
                best = sentiment;
            }
        }
        best
    }

    /// Classes ordered by descending score, ties kept in priority order.
    pub fn ranked(&self) -> Vec<(Sentiment, f64)> {
        let mut ranked: Vec<(Sentiment, f64)> =
            Sentiment::ALL.iter().map(|&s| (s, self.get(s))).collect();
        ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
        ranked
    }

    fn rounded(&self) -> Self {
        Self {
            positive: round4(self.positive),
            neutral: round4(self.neutral),
            negative: round4(self.negative),
        }
    }
}

/// Outcome of one analysis request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SentimentResult {
    pub sentiment: Sentiment,
    pub score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scores: Option<ClassScores>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl SentimentResult {
    /// The neutral record returned for empty input and adapter failures.
    pub fn fallback(variant: ModelVariant, error: impl Into<String>) -> Self {
        let error = Some(error.into());
        match variant {
            ModelVariant::Binary => Self {
                sentiment: Sentiment::Neutral,
                score: 0.5,
                scores: None,
                error,
            },
            ModelVariant::Multilingual => Self {
                sentiment: Sentiment::Neutral,
                score: 0.33,
                scores: Some(ClassScores {
                    positive: 0.33,
                    neutral: 0.34,
                    negative: 0.33,
                }),
                error,
            },
        }
    }
}

/// Round to the 4 decimal places results are stored with.
pub(crate) fn round4(value: f64) -> f64 {
    round_to(value, 4)
}

pub(crate) fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
