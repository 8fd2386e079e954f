//! Markdown rendering of a [`SentimentResult`].
//!
//! The binary model keeps the original single-line layout:
//!
//! ```text
//! 😊 **Sentiment:** POSITIVE
//!
//! 📊 **Confidence Score:** 0.98
//! ```
//!
//! The multilingual model uses headings and a per-class breakdown:
//!
//! ```text
//! ## 😊 Sentiment: **POSITIVE**
//!
//! ### 📊 Confidence: 91.2%
//!
//! ### Score Breakdown
//!
//! 😊 **Positive**: `██████████████████░░` 91.2%
//! 😐 **Neutral**: `█░░░░░░░░░░░░░░░░░░░` 6.1%
//! 😢 **Negative**: `█░░░░░░░░░░░░░░░░░░░` 2.7%
//! ```

use super::{ModelVariant, Sentiment, SentimentResult};
use crate::core::error::AnalysisError;
use std::fmt::Write;

/// Cells in a breakdown bar at 100%.
pub const BAR_WIDTH: usize = 20;

/// The structured form of a result is the result itself.
pub fn to_record(result: &SentimentResult) -> SentimentResult {
    result.clone()
}

pub fn emoji(sentiment: Sentiment, variant: ModelVariant) -> &'static str {
    match (sentiment, variant) {
        (Sentiment::Positive, _) => "😊",
        (Sentiment::Negative, ModelVariant::Binary) => "😞",
        (Sentiment::Negative, ModelVariant::Multilingual) => "😢",
        (Sentiment::Neutral, _) => "😐",
    }
}

/// Render `result` as markdown in the layout of `variant`.
pub fn render(result: &SentimentResult, variant: ModelVariant) -> String {
    let name = result.sentiment.as_str().to_uppercase();
    let face = emoji(result.sentiment, variant);

    let mut out = String::new();
    match variant {
        ModelVariant::Binary => {
            let _ = write!(out, "{face} **Sentiment:** {name}\n\n");
            let _ = write!(out, "📊 **Confidence Score:** {}", format_decimal(result.score));
        }
        ModelVariant::Multilingual => {
            let _ = write!(out, "## {face} Sentiment: **{name}**\n\n");
            let _ = write!(out, "### 📊 Confidence: {:.1}%", result.score * 100.0);

            if let Some(scores) = &result.scores {
                out.push_str("\n\n### Score Breakdown\n");
                for (sentiment, score) in scores.ranked() {
                    let pct = score * 100.0;
                    let _ = write!(
                        out,
                        "\n{} **{}**: `{}` {:.1}%",
                        emoji(sentiment, variant),
                        capitalize(sentiment.as_str()),
                        bar(pct),
                        pct
                    );
                }
            }
        }
    }

    if let Some(error) = visible_error(result) {
        let _ = write!(out, "\n\n⚠️ Note: {error}");
    }

    out
}

/// The error to surface to a person, if any. Empty input is an expected
/// outcome and stays silent.
pub fn visible_error(result: &SentimentResult) -> Option<&str> {
    let empty = AnalysisError::EmptyInput.to_string();
    result.error.as_deref().filter(|e| *e != empty)
}

/// Fixed-width bar, `pct` in `[0, 100]`.
pub fn bar(pct: f64) -> String {
    let filled = ((pct.clamp(0.0, 100.0) / 100.0) * BAR_WIDTH as f64).round() as usize;
    let filled = filled.min(BAR_WIDTH);
    format!("{}{}", "█".repeat(filled), "░".repeat(BAR_WIDTH - filled))
}

/// Shortest decimal form, always with a fractional part (`1.0`, `0.5`, `0.9998`).
fn format_decimal(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{value:.1}")
    } else {
        format!("{value}")
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
