//! Multilingual sentiment classifier on ModernBERT.
//!
//! Wraps `candle_transformers`' `ModernBertForSequenceClassification` around
//! the clapAI multilingual sentiment checkpoints, whose `id2label` is
//! `negative` / `neutral` / `positive`.

use super::{encode, var_builder};
use crate::core::error::{PipelineError, Result};
use crate::loaders::{ClassifierFiles, ClassifierLabels};
use crate::pipelines::sentiment_analysis_pipeline::SentimentAnalysisModel;
use crate::sentiment::LabelScores;
use candle_core::Device;
use candle_transformers::models::modernbert::{
    ClassifierConfig, ClassifierPooling, Config, ModernBertForSequenceClassification,
};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use tokenizers::Tokenizer;

/// Available ModernBERT model sizes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModernBertSize {
    /// Base model (~150M parameters).
    #[default]
    Base,
    /// Large model (~400M parameters).
    Large,
}

impl fmt::Display for ModernBertSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ModernBertSize::Base => "modernbert-base",
            ModernBertSize::Large => "modernbert-large",
        };
        write!(f, "{name}")
    }
}

impl FromStr for ModernBertSize {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "base" => Ok(ModernBertSize::Base),
            "large" => Ok(ModernBertSize::Large),
            other => Err(format!("unknown model size '{other}' (expected base or large)")),
        }
    }
}

#[derive(Deserialize)]
struct PoolingJson {
    #[serde(default)]
    classifier_pooling: Option<ClassifierPooling>,
}

pub struct SentimentModernBertModel {
    model: ModernBertForSequenceClassification,
    device: Device,
    labels: ClassifierLabels,
    max_position_embeddings: usize,
}

impl SentimentModernBertModel {
    pub fn repo_id(size: ModernBertSize) -> &'static str {
        match size {
            ModernBertSize::Base => "clapAI/modernBERT-base-multilingual-sentiment",
            ModernBertSize::Large => "clapAI/modernBERT-large-multilingual-sentiment",
        }
    }

    pub fn new(files: &ClassifierFiles, device: Device) -> Result<Self> {
        let config_content = files.read_config()?;
        let labels = ClassifierLabels::from_config_str(&config_content)?;

        let mut config: Config = serde_json::from_str(&config_content)
            .map_err(|e| PipelineError::Config(format!("Failed to parse model config: {e}")))?;

        // The head is sized from classifier_config, so it has to match id2label
        // even when the checkpoint spells label2id with integer ids.
        let pooling: PoolingJson = serde_json::from_str(&config_content)?;
        let (id2label, label2id) = labels.to_maps();
        config.classifier_config = Some(ClassifierConfig {
            id2label,
            label2id,
            classifier_pooling: pooling.classifier_pooling.unwrap_or_default(),
        });

        let vb = var_builder(files, &device)?;
        let model = ModernBertForSequenceClassification::load(vb, &config)?;

        Ok(Self {
            model,
            device,
            labels,
            max_position_embeddings: config.max_position_embeddings,
        })
    }

    pub fn device(&self) -> &Device {
        &self.device
    }

    pub fn predict_scores(&self, tokenizer: &Tokenizer, text: &str) -> Result<LabelScores> {
        let (input_ids, attention_mask) = encode(tokenizer, text, &self.device)?;

        // The candle head already ends in a softmax over the classes.
        let probs = self
            .model
            .forward(&input_ids, &attention_mask)?
            .squeeze(0)?
            .to_vec1::<f32>()?;

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

impl SentimentAnalysisModel for SentimentModernBertModel {
    type Options = ModernBertSize;

    fn model_repo(options: &Self::Options) -> String {
        Self::repo_id(*options).to_string()
    }

    fn load(_options: Self::Options, files: &ClassifierFiles, device: Device) -> Result<Self> {
        SentimentModernBertModel::new(files, device)
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
