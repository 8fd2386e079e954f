use super::model::SentimentAnalysisModel;
use crate::core::error::Result;
use crate::sentiment::{Classifier, LabelScores};
use tokenizers::Tokenizer;

/// A loaded sentiment model together with its tokenizer.
///
/// Construct with [`SentimentAnalysisPipelineBuilder`](super::SentimentAnalysisPipelineBuilder).
/// The pipeline is the [`Classifier`] adapter handed to a
/// [`SentimentAnalyzer`](crate::sentiment::SentimentAnalyzer).
pub struct SentimentAnalysisPipeline<M: SentimentAnalysisModel> {
    pub(crate) model: M,
    pub(crate) tokenizer: Tokenizer,
    pub(crate) name: String,
}

impl<M: SentimentAnalysisModel> SentimentAnalysisPipeline<M> {
    /// Class probabilities for `text` in the model's own label vocabulary.
    pub fn predict(&self, text: &str) -> Result<LabelScores> {
        self.model.predict_scores(&self.tokenizer, text)
    }

    /// Returns the device (CPU/GPU) the model is running on.
    pub fn device(&self) -> &candle_core::Device {
        self.model.device()
    }
}

impl<M: SentimentAnalysisModel> Classifier for SentimentAnalysisPipeline<M> {
    fn classify(&self, text: &str) -> Result<LabelScores> {
        self.predict(text)
    }

    fn name(&self) -> String {
        self.name.clone()
    }
}
