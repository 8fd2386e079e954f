pub mod distilbert;
pub mod modernbert;

pub use distilbert::DistilBertSentimentModel;
pub use modernbert::{ModernBertSize, SentimentModernBertModel};

use crate::core::error::{PipelineError, Result};
use crate::loaders::ClassifierFiles;
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use tokenizers::Tokenizer;

/// Memory-map or read the checkpoint weights as F32.
fn var_builder(files: &ClassifierFiles, device: &Device) -> Result<VarBuilder<'static>> {
    if files.is_safetensors() {
        // SAFETY: the hub cache file is not modified while mapped.
        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[files.weights.as_path()], DType::F32, device)?
        };
        Ok(vb)
    } else if files.is_pytorch() {
        Ok(VarBuilder::from_pth(&files.weights, DType::F32, device)?)
    } else {
        Err(PipelineError::Config(format!(
            "Unsupported weight file format: {}",
            files.weights.display()
        )))
    }
}

/// Tokenize one text into `(input_ids, attention_mask)`, both `[1, seq_len]`.
fn encode(tokenizer: &Tokenizer, text: &str, device: &Device) -> Result<(Tensor, Tensor)> {
    let encoding = tokenizer.encode(text, true).map_err(|e| {
        PipelineError::Tokenization(format!(
            "Tokenization failed on '{}': {e}",
            text.chars().take(50).collect::<String>()
        ))
    })?;

    let input_ids = Tensor::new(encoding.get_ids(), device)?.unsqueeze(0)?;
    let attention_mask = Tensor::new(encoding.get_attention_mask(), device)?.unsqueeze(0)?;
    Ok((input_ids, attention_mask))
}

/// Whitespace word-level tokenizer over a handful of words, for running the
/// heads on random weights.
#[cfg(test)]
fn tiny_tokenizer() -> Tokenizer {
    let json = r#"{
        "version": "1.0",
        "truncation": null,
        "padding": null,
        "added_tokens": [],
        "normalizer": null,
        "pre_tokenizer": {"type": "Whitespace"},
        "post_processor": null,
        "decoder": null,
        "model": {
            "type": "WordLevel",
            "vocab": {"[UNK]": 0, "[PAD]": 1, "i": 2, "love": 3, "rust": 4, "it": 5},
            "unk_token": "[UNK]"
        }
    }"#;
    json.parse().expect("tokenizer json is valid")
}
