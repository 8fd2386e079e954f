use super::model::SentimentAnalysisModel;
use super::pipeline::SentimentAnalysisPipeline;
use crate::core::error::{PipelineError, Result};
use crate::loaders::{ClassifierLoader, TokenizerLoader};
use crate::models::{DistilBertSentimentModel, ModernBertSize, SentimentModernBertModel};
use crate::pipelines::utils::{DeviceRequest, DeviceSelectable};
use tokenizers::TruncationParams;
use tracing::info;

pub struct SentimentAnalysisPipelineBuilder<M: SentimentAnalysisModel> {
    options: M::Options,
    device_request: DeviceRequest,
    model_id: Option<String>,
    tokenizer_id: Option<String>,
}

impl<M: SentimentAnalysisModel> SentimentAnalysisPipelineBuilder<M> {
    pub fn new(options: M::Options) -> Self {
        Self {
            options,
            device_request: DeviceRequest::Default,
            model_id: None,
            tokenizer_id: None,
        }
    }

    /// Load weights from `repo` instead of the default checkpoint. The
    /// repository must hold a compatible architecture. The tokenizer still
    /// comes from the model's default tokenizer repo unless
    /// [`tokenizer_id`](Self::tokenizer_id) is set.
    pub fn model_id(mut self, repo: impl Into<String>) -> Self {
        self.model_id = Some(repo.into());
        self
    }

    /// Load `tokenizer.json` from `repo`.
    pub fn tokenizer_id(mut self, repo: impl Into<String>) -> Self {
        self.tokenizer_id = Some(repo.into());
        self
    }

    /// `(model repo, tokenizer repo)` after overrides.
    fn repos(&self) -> (String, String) {
        let model_repo = self
            .model_id
            .clone()
            .unwrap_or_else(|| M::model_repo(&self.options));
        let tokenizer_repo = self
            .tokenizer_id
            .clone()
            .unwrap_or_else(|| M::tokenizer_repo(&self.options));
        (model_repo, tokenizer_repo)
    }

    pub async fn build(self) -> Result<SentimentAnalysisPipeline<M>> {
        let device = self.device_request.clone().resolve()?;
        let (model_repo, tokenizer_repo) = self.repos();
        info!(repo = %model_repo, tokenizer = %tokenizer_repo, device = ?device.location(), "Loading sentiment model");

        let files = ClassifierLoader::new(&model_repo).load().await?;
        let mut tokenizer = TokenizerLoader::new(&tokenizer_repo, "tokenizer.json")
            .load()
            .await?;
        let model = M::load(self.options, &files, device)?;

        tokenizer
            .with_truncation(Some(TruncationParams {
                max_length: model.max_input_tokens(),
                ..Default::default()
            }))
            .map_err(|e| PipelineError::Tokenization(format!("Failed to set truncation: {e}")))?;

        info!(repo = %model_repo, "Sentiment model ready");
        Ok(SentimentAnalysisPipeline {
            model,
            tokenizer,
            name: model_repo,
        })
    }
}

impl<M: SentimentAnalysisModel> DeviceSelectable for SentimentAnalysisPipelineBuilder<M> {
    fn device_request_mut(&mut self) -> &mut DeviceRequest {
        &mut self.device_request
    }
}

impl SentimentAnalysisPipelineBuilder<DistilBertSentimentModel> {
    /// English binary model fine-tuned on SST-2.
    pub fn distilbert() -> Self {
        Self::new(())
    }
}

impl SentimentAnalysisPipelineBuilder<SentimentModernBertModel> {
    /// Multilingual positive / neutral / negative model.
    pub fn modernbert(size: ModernBertSize) -> Self {
        Self::new(size)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn model_override_keeps_default_tokenizer() {
        let builder =
            SentimentAnalysisPipelineBuilder::distilbert().model_id("acme/distilbert-reviews");
        assert_eq!(
            builder.repos(),
            (
                "acme/distilbert-reviews".to_string(),
                "distilbert/distilbert-base-uncased".to_string()
            )
        );

        let builder = builder.tokenizer_id("acme/reviews-tokenizer");
        assert_eq!(builder.repos().1, "acme/reviews-tokenizer");
    }

    #[test]
    fn defaults_come_from_the_model() {
        let builder = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Large);
        let (model_repo, tokenizer_repo) = builder.repos();
        assert_eq!(model_repo, "clapAI/modernBERT-large-multilingual-sentiment");
        assert_eq!(tokenizer_repo, model_repo);
    }
}
