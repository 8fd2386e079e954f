use crate::core::error::Result;
use crate::loaders::ClassifierFiles;
use crate::sentiment::LabelScores;
use tokenizers::Tokenizer;

/// A sequence-classification model that scores text for sentiment.
pub trait SentimentAnalysisModel: Send + Sync {
    type Options: std::fmt::Debug + Clone;

    /// Hub repository holding `config.json` and the weights.
    fn model_repo(options: &Self::Options) -> String;

    /// Hub repository holding `tokenizer.json`.
    fn tokenizer_repo(options: &Self::Options) -> String {
        Self::model_repo(options)
    }

    fn load(options: Self::Options, files: &ClassifierFiles, device: candle_core::Device) -> Result<Self>
    where
        Self: Sized;

    /// Probability of every class, as `(label, p)` in class-id order.
    fn predict_scores(&self, tokenizer: &Tokenizer, text: &str) -> Result<LabelScores>;

    /// Longest input, in tokens, the position embeddings cover.
    fn max_input_tokens(&self) -> usize;

    fn device(&self) -> &candle_core::Device;
}
