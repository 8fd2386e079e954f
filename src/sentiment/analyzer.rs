use super::classifier::{Classifier, LabelScores};
use super::labels::LabelMapping;
use super::{round4, ClassScores, ModelVariant, Sentiment, SentimentResult};
use crate::core::error::{AnalysisError, PipelineError};
use tracing::{debug, error};

/// Turns raw classifier output into a [`SentimentResult`].
///
/// The analyzer owns its adapter; nothing is shared between calls, so
/// analyzing the same text twice with a deterministic adapter gives the same
/// record.
pub struct SentimentAnalyzer<C> {
    classifier: C,
    variant: ModelVariant,
    labels: LabelMapping,
}

impl<C: Classifier> SentimentAnalyzer<C> {
    /// Create an analyzer using the default [`LabelMapping`] for `variant`.
    pub fn new(classifier: C, variant: ModelVariant) -> Self {
        Self {
            classifier,
            variant,
            labels: LabelMapping::for_variant(variant),
        }
    }

    pub fn with_labels(mut self, labels: LabelMapping) -> Self {
        self.labels = labels;
        self
    }

    pub fn variant(&self) -> ModelVariant {
        self.variant
    }

    pub fn labels(&self) -> &LabelMapping {
        &self.labels
    }

    pub fn classifier(&self) -> &C {
        &self.classifier
    }

    /// Analyze `text`, never failing.
    ///
    /// Empty input and adapter failures both produce the variant's neutral
    /// fallback record with `error` set; failures are logged.
    pub fn analyze(&self, text: &str) -> SentimentResult {
        match self.try_analyze(text) {
            Ok(result) => result,
            Err(AnalysisError::EmptyInput) => {
                debug!("Empty text submitted, returning neutral result");
                SentimentResult::fallback(self.variant, AnalysisError::EmptyInput.to_string())
            }
            Err(err) => {
                error!(
                    classifier = %self.classifier.name(),
                    "Sentiment classification failed: {err}"
                );
                SentimentResult::fallback(self.variant, err.to_string())
            }
        }
    }

    /// Analyze `text`, reporting why no model-backed result was produced.
    pub fn try_analyze(&self, text: &str) -> Result<SentimentResult, AnalysisError> {
        if text.trim().is_empty() {
            return Err(AnalysisError::EmptyInput);
        }

        let predictions = self.classifier.classify(text)?;
        if predictions.is_empty() {
            return Err(PipelineError::Unexpected("Classifier returned no predictions".into()).into());
        }
        if let Some((label, confidence)) = predictions.iter().find(|(_, c)| !c.is_finite()) {
            return Err(PipelineError::Unexpected(format!(
                "Classifier returned a non-finite confidence ({confidence}) for label '{label}'"
            ))
            .into());
        }

        let result = match self.variant {
            ModelVariant::Binary => self.normalize_binary(&predictions),
            ModelVariant::Multilingual => self.normalize_three_class(&predictions),
        };
        debug!(
            sentiment = %result.sentiment,
            score = result.score,
            "Analyzed {} characters",
            text.chars().count()
        );
        Ok(result)
    }

    /// Keep the top prediction; a negative score is flipped so the stored
    /// value is the confidence that the reported sentiment is right.
    fn normalize_binary(&self, predictions: &LabelScores) -> SentimentResult {
        let (label, confidence) = predictions
            .iter()
            .skip(1)
            .fold(&predictions[0], |best, candidate| {
                if candidate.1 > best.1 {
                    candidate
                } else {
                    best
                }
            });

        let sentiment = self.labels.resolve(label);
        let confidence = (*confidence as f64).clamp(0.0, 1.0);
        let score = match sentiment {
            Sentiment::Negative => 1.0 - confidence,
            _ => confidence,
        };

        SentimentResult {
            sentiment,
            score: round4(score),
            scores: None,
            error: None,
        }
    }

    /// Native labels resolving to the same class are summed; classes the
    /// model did not report score zero.
    fn normalize_three_class(&self, predictions: &LabelScores) -> SentimentResult {
        let mut scores = ClassScores {
            positive: 0.0,
            neutral: 0.0,
            negative: 0.0,
        };
        for (label, confidence) in predictions {
            let slot = scores.get_mut(self.labels.resolve(label));
            *slot = (*slot + *confidence as f64).clamp(0.0, 1.0);
        }

        let scores = scores.rounded();
        let sentiment = scores.dominant();

        SentimentResult {
            sentiment,
            score: scores.get(sentiment),
            scores: Some(scores),
            error: None,
        }
    }
}
