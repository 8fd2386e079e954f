//! HTTP client for a remote sentiment service.
//!
//! Posts the Gradio-style envelope `{"data": [text]}` and understands both
//! answers such a service gives: a JSON record (`/api/analyze`) or a markdown
//! report (`/api/predict`). Whenever the remote side is missing, slow or
//! unintelligible the client classifies locally with the
//! [`KeywordClassifier`], so callers always get a sentiment back.

use crate::core::error::{PipelineError, Result};
use crate::sentiment::{
    round_to, KeywordClassifier, LabelMapping, ModelVariant, Sentiment, SentimentAnalyzer,
};
use regex::Regex;
use serde_json::{json, Value};
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info, warn};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

pub struct SentimentClient {
    http: reqwest::Client,
    endpoint: Option<String>,
    fallback: SentimentAnalyzer<KeywordClassifier>,
}

impl SentimentClient {
    /// `endpoint` of `None` (or an empty string) always uses the local fallback.
    pub fn new(endpoint: Option<String>) -> Result<Self> {
        Self::with_timeout(endpoint, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(endpoint: Option<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| PipelineError::Unexpected(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            http,
            endpoint: endpoint.filter(|url| !url.trim().is_empty()),
            fallback: SentimentAnalyzer::new(KeywordClassifier::new()?, ModelVariant::Binary),
        })
    }

    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint.as_deref()
    }

    /// Sentiment of `text` with a score rounded to two decimals.
    pub async fn analyze(&self, text: &str) -> (Sentiment, f64) {
        let Some(url) = self.endpoint.as_deref() else {
            warn!("No sentiment endpoint configured, using keyword classifier");
            return self.classify_locally(text);
        };

        match self.query(url, text).await {
            Ok(Some(result)) => {
                info!(sentiment = %result.0, score = result.1, "Remote sentiment analysis");
                result
            }
            Ok(None) => {
                warn!(url, "Could not parse sentiment response, using keyword classifier");
                self.classify_locally(text)
            }
            Err(err) => {
                warn!(url, "Sentiment request failed, using keyword classifier: {err}");
                self.classify_locally(text)
            }
        }
    }

    async fn query(&self, url: &str, text: &str) -> reqwest::Result<Option<(Sentiment, f64)>> {
        debug!(url, "Calling sentiment service");
        let response = self
            .http
            .post(url)
            .json(&json!({ "data": [text] }))
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        debug!(%status, body = %body, "Sentiment service response");

        if !status.is_success() {
            warn!(%status, "Sentiment service returned an error status");
            return Ok(None);
        }
        Ok(parse_response(&body))
    }

    fn classify_locally(&self, text: &str) -> (Sentiment, f64) {
        let result = self.fallback.analyze(text);
        (result.sentiment, round_to(result.score, 2))
    }
}

/// Parse `{"data": [record]}` or `{"data": ["markdown"]}`.
pub fn parse_response(body: &str) -> Option<(Sentiment, f64)> {
    let value: Value = serde_json::from_str(body).ok()?;
    match value.get("data")?.as_array()?.first()? {
        Value::Object(record) => {
            let label = record.get("sentiment")?.as_str().unwrap_or("neutral");
            let score = record.get("score")?.as_f64()?;
            if let Some(scores) = record.get("scores") {
                debug!(%scores, "Detailed scores");
            }
            Some((canonical(label), round_to(score, 2)))
        }
        Value::String(markdown) => parse_markdown(markdown),
        _ => None,
    }
}

/// Parse a rendered report, current layout first, then the legacy one.
///
/// ```text
/// ## 😊 Sentiment: **POSITIVE**       ### 📊 Confidence: 99.8%
/// 😊 **Sentiment:** POSITIVE          📊 **Confidence Score:** 0.9998
/// ```
pub fn parse_markdown(markdown: &str) -> Option<(Sentiment, f64)> {
    let patterns = MarkdownPatterns::get()?;

    if let (Some(label), Some(pct)) = (
        patterns.heading_sentiment.captures(markdown),
        patterns.heading_confidence.captures(markdown),
    ) {
        let pct: f64 = pct[1].parse().ok()?;
        return Some((canonical(&label[1]), round_to(pct / 100.0, 2)));
    }

    if let (Some(label), Some(score)) = (
        patterns.inline_sentiment.captures(markdown),
        patterns.inline_score.captures(markdown),
    ) {
        let score: f64 = score[1].parse().ok()?;
        return Some((canonical(&label[1]), round_to(score, 2)));
    }

    let preview: String = markdown.chars().take(100).collect();
    warn!(markdown = %preview, "Unrecognized sentiment report layout");
    None
}

fn canonical(label: &str) -> Sentiment {
    LabelMapping::three_class().resolve(label)
}

static MARKDOWN_PATTERNS: OnceLock<Option<MarkdownPatterns>> = OnceLock::new();

struct MarkdownPatterns {
    heading_sentiment: Regex,
    heading_confidence: Regex,
    inline_sentiment: Regex,
    inline_score: Regex,
}

impl MarkdownPatterns {
    /// The compiled report patterns, or `None` when they fail to compile, in
    /// which case every report counts as unparseable.
    fn get() -> Option<&'static Self> {
        MARKDOWN_PATTERNS
            .get_or_init(|| {
                let patterns = Self::compile([
                    r"(?i)##\s*\S+\s*Sentiment:\s*\*\*(\w+)\*\*",
                    r"###\s*📊\s*Confidence:\s*([\d.]+)%",
                    r"(?i)\*\*Sentiment:\*\*\s*(\w+)",
                    r"\*\*(?:Confidence\s+)?Score:\*\*\s*([\d.]+)",
                ]);
                if patterns.is_none() {
                    warn!("Report patterns failed to compile, markdown replies are unparseable");
                }
                patterns
            })
            .as_ref()
    }

    fn compile(
        [heading_sentiment, heading_confidence, inline_sentiment, inline_score]: [&str; 4],
    ) -> Option<Self> {
        Some(Self {
            heading_sentiment: Regex::new(heading_sentiment).ok()?,
            heading_confidence: Regex::new(heading_confidence).ok()?,
            inline_sentiment: Regex::new(inline_sentiment).ok()?,
            inline_score: Regex::new(inline_score).ok()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_record_envelope() {
        let body = r#"{"data": [{"sentiment": "POSITIVE", "score": 0.98765,
                       "scores": {"positive": 0.98765, "neutral": 0.01, "negative": 0.00235}}]}"#;
        assert_eq!(parse_response(body), Some((Sentiment::Positive, 0.99)));

        let body = r#"{"data": [{"sentiment": "negative", "score": 0.05}]}"#;
        assert_eq!(parse_response(body), Some((Sentiment::Negative, 0.05)));
    }

    #[test]
    fn parses_markdown_envelope() {
        let body = json!({ "data": ["## 😊 Sentiment: **POSITIVE**\n\n### 📊 Confidence: 99.8%\n\n### Score Breakdown\n"] });
        assert_eq!(parse_response(&body.to_string()), Some((Sentiment::Positive, 1.0)));
    }

    #[test]
    fn bad_patterns_compile_to_none() {
        assert!(MarkdownPatterns::compile([r"\w+", r"(", r"\w+", r"\w+"]).is_none());
        assert!(MarkdownPatterns::get().is_some());
    }

    #[test]
    fn current_layout_divides_percentages() {
        let markdown = "## 😐 Sentiment: **NEUTRAL**\n\n### 📊 Confidence: 61.7%";
        assert_eq!(parse_markdown(markdown), Some((Sentiment::Neutral, 0.62)));
    }

    #[test]
    fn legacy_layout() {
        let markdown = "😞 **Sentiment:** NEGATIVE\n\n📊 **Confidence Score:** 0.0512";
        assert_eq!(parse_markdown(markdown), Some((Sentiment::Negative, 0.05)));

        let markdown = "**sentiment:** Positive **Score:** 0.7";
        assert_eq!(parse_markdown(markdown), Some((Sentiment::Positive, 0.7)));
    }

    #[test]
    fn rejects_unknown_shapes() {
        assert_eq!(parse_response("not json"), None);
        assert_eq!(parse_response(r#"{"result": "positive"}"#), None);
        assert_eq!(parse_response(r#"{"data": []}"#), None);
        assert_eq!(parse_response(r#"{"data": [42]}"#), None);
        assert_eq!(parse_response(r#"{"data": [{"sentiment": "positive"}]}"#), None);
        assert_eq!(parse_markdown("Sentiment: great"), None);
    }

    #[tokio::test]
    async fn without_endpoint_uses_keyword_classifier() {
        let client = SentimentClient::new(Some("  ".to_string())).unwrap();
        assert_eq!(client.endpoint(), None);

        assert_eq!(client.analyze("").await, (Sentiment::Neutral, 0.5));
        assert_eq!(client.analyze("This is great!").await, (Sentiment::Positive, 0.7));
        assert_eq!(
            client.analyze("bad and awful service").await,
            (Sentiment::Negative, 0.24)
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_falls_back() {
        let client = SentimentClient::with_timeout(
            Some("http://127.0.0.1:9/api/analyze".to_string()),
            Duration::from_millis(500),
        )
        .unwrap();
        assert_eq!(client.analyze("This is great!").await, (Sentiment::Positive, 0.7));
    }
}
