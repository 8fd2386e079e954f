//! English binary sentiment classifier on DistilBERT (SST-2).
//!
//! `candle_transformers` ships the DistilBERT encoder only; the
//! sequence-classification head (`pre_classifier` → ReLU → `classifier` over
//! the first token) is built here from the checkpoint's own weights.

use super::{encode, var_builder};
use crate::core::error::{PipelineError, Result};
use crate::loaders::{ClassifierFiles, ClassifierLabels};
use crate::pipelines::sentiment_analysis_pipeline::SentimentAnalysisModel;
use crate::sentiment::LabelScores;
use candle_core::{DType, Device, IndexOp, Tensor, D};
use candle_nn::{linear, ops::softmax, Linear, Module};
use candle_transformers::models::distilbert::{Config, DistilBertModel};
use serde::Deserialize;
use tokenizers::Tokenizer;

const MODEL_REPO: &str = "distilbert/distilbert-base-uncased-finetuned-sst-2-english";
// The fine-tuned repo only ships a vocab.txt; the base model's tokenizer.json
// carries the same uncased vocabulary.
const TOKENIZER_REPO: &str = "distilbert/distilbert-base-uncased";

#[derive(Deserialize)]
struct HeadDims {
    dim: usize,
    max_position_embeddings: usize,
}

pub struct DistilBertSentimentModel {
    encoder: DistilBertModel,
    pre_classifier: Linear,
    classifier: Linear,
    device: Device,
    labels: ClassifierLabels,
    max_position_embeddings: usize,
}

impl DistilBertSentimentModel {
    pub fn new(files: &ClassifierFiles, device: Device) -> Result<Self> {
        let config_content = files.read_config()?;
        let labels = ClassifierLabels::from_config_str(&config_content)?;
        let config: Config = serde_json::from_str(&config_content)
            .map_err(|e| PipelineError::Config(format!("Failed to parse model config: {e}")))?;
        let dims: HeadDims = serde_json::from_str(&config_content)?;

        let vb = var_builder(files, &device)?;
        let encoder = DistilBertModel::load(vb.pp("distilbert"), &config)?;
        let pre_classifier = linear(dims.dim, dims.dim, vb.pp("pre_classifier"))?;
        let classifier = linear(dims.dim, labels.len(), vb.pp("classifier"))?;

        Ok(Self {
            encoder,
            pre_classifier,
            classifier,
            device,
            labels,
            max_position_embeddings: dims.max_position_embeddings,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn predict_scores(&self, tokenizer: &Tokenizer, text: &str) -> Result<LabelScores> {
        let (input_ids, _) = encode(tokenizer, text, &self.device)?;
        let seq_len = input_ids.dim(1)?;

        // Nonzero entries block attention; one unpadded sequence blocks nothing.
        let mask = Tensor::zeros((seq_len, seq_len), DType::U8, &self.device)?;
        let hidden = self.encoder.forward(&input_ids, &mask)?;

        let first_token = hidden.i((.., 0))?;
        let pooled = self.pre_classifier.forward(&first_token)?.relu()?;
        let logits = self.classifier.forward(&pooled)?;
        let probs = softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec1::<f32>()?;

        probs
            .into_iter()
            .enumerate()
            .map(|(id, p)| {
                let label = self.labels.get(id).ok_or_else(|| {
                    PipelineError::Unexpected(format!(
                        "Class id {id} not in id2label ({} labels)",
                        self.labels.len()
                    ))
                })?;
                Ok((label.to_string(), p))
            })
            .collect()
    }
}

impl SentimentAnalysisModel for DistilBertSentimentModel {
    type Options = ();

    fn model_repo(_options: &Self::Options) -> String {
        MODEL_REPO.to_string()
    }

    fn tokenizer_repo(_options: &Self::Options) -> String {
        TOKENIZER_REPO.to_string()
    }

    fn load(_options: Self::Options, files: &ClassifierFiles, device: Device) -> Result<Self> {
        DistilBertSentimentModel::new(files, device)
    }

    fn predict_scores(&self, tokenizer: &Tokenizer, text: &str) -> Result<LabelScores> {
        self.predict_scores(tokenizer, text)
    }

    fn max_input_tokens(&self) -> usize {
        self.max_position_embeddings
    }

    fn device(&self) -> &Device {
        self.device()
    }
}

#[cfg(test)]
mod tests {
    use super::super::tiny_tokenizer;
    use super::*;
    use candle_nn::{VarBuilder, VarMap};

    const TINY_CONFIG: &str = r#"{
        "vocab_size": 8,
        "dim": 16,
        "n_layers": 2,
        "n_heads": 2,
        "hidden_dim": 32,
        "activation": "gelu",
        "max_position_embeddings": 32,
        "initializer_range": 0.02,
        "pad_token_id": 1,
        "model_type": "distilbert",
        "id2label": {"0": "NEGATIVE", "1": "POSITIVE"},
        "label2id": {"NEGATIVE": 0, "POSITIVE": 1}
    }"#;

    #[test]
    fn head_dims_come_from_config() {
        let dims: HeadDims = serde_json::from_str(
            r#"{"dim": 768, "max_position_embeddings": 512, "n_layers": 6,
                "id2label": {"0": "NEGATIVE", "1": "POSITIVE"}}"#,
        )
        .unwrap();
        assert_eq!(dims.dim, 768);
        assert_eq!(dims.max_position_embeddings, 512);
    }

    #[test]
    fn scores_are_the_head_softmax_in_label_order() -> Result<()> {
        let dir = tempfile::tempdir()?;
        let files = ClassifierFiles {
            config: dir.path().join("config.json"),
            weights: dir.path().join("model.safetensors"),
        };
        std::fs::write(&files.config, TINY_CONFIG)?;

        // Random weights under the checkpoint's tensor names, saved to disk.
        let config: Config = serde_json::from_str(TINY_CONFIG)?;
        let varmap = VarMap::new();
        let vb = VarBuilder::from_varmap(&varmap, DType::F32, &Device::Cpu);
        let encoder = DistilBertModel::load(vb.pp("distilbert"), &config)?;
        let pre_classifier = linear(16, 16, vb.pp("pre_classifier"))?;
        let classifier = linear(16, 2, vb.pp("classifier"))?;
        varmap.save(&files.weights)?;

        let tokenizer = tiny_tokenizer();
        let (input_ids, _) = encode(&tokenizer, "i love it", &Device::Cpu)?;
        let mask = Tensor::zeros((3, 3), DType::U8, &Device::Cpu)?;
        let first_token = encoder.forward(&input_ids, &mask)?.i((.., 0))?;
        let logits = classifier.forward(&pre_classifier.forward(&first_token)?.relu()?)?;
        let expected = softmax(&logits, D::Minus1)?.squeeze(0)?.to_vec1::<f32>()?;

        let model = DistilBertSentimentModel::new(&files, Device::Cpu)?;
        let scores = model.predict_scores(&tokenizer, "i love it")?;
        let names: Vec<&str> = scores.iter().map(|(label, _)| label.as_str()).collect();
        assert_eq!(names, ["NEGATIVE", "POSITIVE"]);
        for ((label, p), want) in scores.iter().zip(&expected) {
            assert!((p - want).abs() < 1e-6, "{label}: {p} vs head {want}");
        }
        Ok(())
    }

    #[tokio::test]
    #[ignore = "downloads the SST-2 checkpoint"]
    async fn classifies_with_real_weights() -> Result<()> {
        use crate::pipelines::sentiment_analysis_pipeline::*;

        let pipeline = SentimentAnalysisPipelineBuilder::distilbert().cpu().build().await?;
        let scores = pipeline.predict("I love it!")?;
        let (label, _) = scores
            .iter()
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .expect("two classes");
        assert_eq!(label, "POSITIVE");
        Ok(())
    }
}
