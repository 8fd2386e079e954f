//! Hugging Face Hub loaders for classifier checkpoints.
//!
//! ## Main Types
//!
//! - [`HfLoader`] - fetches one file from a repository, retrying lock failures
//! - [`TokenizerLoader`] - fetches and parses a `tokenizer.json`
//! - [`ClassifierLoader`] - fetches `config.json` plus weights of a classifier
//! - [`ClassifierLabels`] - the ordered `id2label` table of a classifier config
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use sentiment_service::loaders::{ClassifierLoader, TokenizerLoader};
//!
//! # async fn run() -> sentiment_service::core::Result<()> {
//! let repo = "distilbert/distilbert-base-uncased-finetuned-sst-2-english";
//! let files = ClassifierLoader::new(repo).load().await?;
//! let tokenizer = TokenizerLoader::new("distilbert/distilbert-base-uncased", "tokenizer.json")
//!     .load()
//!     .await?;
//! # Ok(())
//! # }
//! ```
//!
//! Downloads are cached by `hf-hub` under the usual Hugging Face cache
//! directory, so only the first start of the service touches the network.

use crate::core::error::{PipelineError, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokenizers::Tokenizer;
use tracing::{debug, warn};

const MAX_ATTEMPTS: u32 = 3;

#[derive(Debug, Clone)]
pub struct HfLoader {
    pub repo: String,
    pub filename: String,
}

impl HfLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            repo: repo.into(),
            filename: filename.into(),
        }
    }

    pub async fn load(&self) -> Result<PathBuf> {
        let hf_api = hf_hub::api::tokio::ApiBuilder::new()
            .with_chunk_size(None)
            .build()?;
        let hf_api = hf_api.model(self.repo.clone());

        let mut attempt = 0;
        loop {
            match hf_api.get(self.filename.as_str()).await {
                Ok(path) => {
                    debug!(repo = %self.repo, file = %self.filename, "Resolved {}", path.display());
                    return Ok(path);
                }
                Err(e) => {
                    attempt += 1;
                    let lock_contention = e.to_string().contains("Lock acquisition failed");
                    if !lock_contention || attempt >= MAX_ATTEMPTS {
                        return Err(e.into());
                    }
                    let wait = std::time::Duration::from_millis(100 * (1 << attempt));
                    warn!(
                        repo = %self.repo,
                        file = %self.filename,
                        "Hub cache lock busy, retrying in {wait:?}"
                    );
                    tokio::time::sleep(wait).await;
                }
            }
        }
    }
}

#[derive(Clone)]
pub struct TokenizerLoader {
    pub tokenizer_file_loader: HfLoader,
}

impl TokenizerLoader {
    pub fn new(repo: &str, filename: &str) -> Self {
        Self {
            tokenizer_file_loader: HfLoader::new(repo, filename),
        }
    }

    pub async fn load(&self) -> Result<Tokenizer> {
        let path = self.tokenizer_file_loader.load().await?;
        Tokenizer::from_file(&path).map_err(|e| {
            PipelineError::Tokenization(format!(
                "Failed to load tokenizer from '{}': {e}",
                path.display()
            ))
        })
    }
}

/// Local paths of a downloaded classifier checkpoint.
#[derive(Debug, Clone)]
pub struct ClassifierFiles {
    pub config: PathBuf,
    pub weights: PathBuf,
}

impl ClassifierFiles {
    pub fn read_config(&self) -> Result<String> {
        std::fs::read_to_string(&self.config).map_err(|e| {
            PipelineError::Config(format!(
                "Failed to read config file {}: {e}",
                self.config.display()
            ))
        })
    }

    pub fn is_safetensors(&self) -> bool {
        has_extension(&self.weights, "safetensors")
    }

    pub fn is_pytorch(&self) -> bool {
        has_extension(&self.weights, "bin")
    }
}

fn has_extension(path: &Path, ext: &str) -> bool {
    path.extension().is_some_and(|e| e == ext)
}

#[derive(Debug, Clone)]
pub struct ClassifierLoader {
    pub repo: String,
}

impl ClassifierLoader {
    pub fn new(repo: &str) -> Self {
        Self { repo: repo.into() }
    }

    /// Fetch `config.json` and the weights, preferring `model.safetensors`
    /// over `pytorch_model.bin`.
    pub async fn load(&self) -> Result<ClassifierFiles> {
        let config = HfLoader::new(&self.repo, "config.json").load().await?;
        let weights = match HfLoader::new(&self.repo, "model.safetensors").load().await {
            Ok(path) => path,
            Err(safetensors_err) => HfLoader::new(&self.repo, "pytorch_model.bin")
                .load()
                .await
                .map_err(|e| {
                    PipelineError::Download(format!(
                        "Model weights not found in '{}'. Expected `model.safetensors` ({safetensors_err}) or `pytorch_model.bin` ({e})",
                        self.repo
                    ))
                })?,
        };
        Ok(ClassifierFiles { config, weights })
    }
}

#[derive(Deserialize)]
struct ClassifierConfigJson {
    #[serde(default)]
    id2label: HashMap<String, String>,
    #[serde(default)]
    label2id: HashMap<String, u32>,
}

/// Class labels of a sequence-classification checkpoint, indexed by class id.
#[derive(Debug, Clone, PartialEq)]
pub struct ClassifierLabels(Vec<String>);

impl ClassifierLabels {
    /// Read `id2label` (or `label2id`) from a `config.json` body. Ids with no
    /// name are called `LABEL_<id>`.
    pub fn from_config_str(config: &str) -> Result<Self> {
        let raw: ClassifierConfigJson = serde_json::from_str(config)?;

        let mut by_id: HashMap<usize, String> = HashMap::new();
        for (id, label) in raw.id2label {
            let id: usize = id
                .parse()
                .map_err(|_| PipelineError::Config(format!("Invalid id2label key '{id}'")))?;
            by_id.insert(id, label);
        }
        for (label, id) in raw.label2id {
            by_id.entry(id as usize).or_insert(label);
        }

        let count = by_id.keys().max().map_or(0, |max| max + 1);
        if count == 0 {
            return Err(PipelineError::Config(
                "Classifier config has neither id2label nor label2id".into(),
            ));
        }

        Ok(Self(
            (0..count)
                .map(|i| by_id.remove(&i).unwrap_or_else(|| format!("LABEL_{i}")))
                .collect(),
        ))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn get(&self, id: usize) -> Option<&str> {
        self.0.get(id).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// `id2label` / `label2id` maps in the string form candle configs expect.
    pub fn to_maps(&self) -> (HashMap<String, String>, HashMap<String, String>) {
        let id2label = self
            .0
            .iter()
            .enumerate()
            .map(|(i, l)| (i.to_string(), l.clone()))
            .collect();
        let label2id = self
            .0
            .iter()
            .enumerate()
            .map(|(i, l)| (l.clone(), i.to_string()))
            .collect();
        (id2label, label2id)
    }
}
