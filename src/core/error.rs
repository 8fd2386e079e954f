//! Error types for this crate.
//!
//! Classifier adapters and model loading report [`PipelineError`]. The
//! normalizer wraps those in [`AnalysisError`] so callers can tell invalid
//! input apart from a failing model before the fallback record is produced.

use thiserror::Error;

/// A [`Result`](std::result::Result) alias using [`PipelineError`] as the error type.
pub type Result<T> = std::result::Result<T, PipelineError>;

/// Failure raised by a classifier adapter or while loading one.
#[derive(Error, Debug)]
#[non_exhaustive]
pub enum PipelineError {
    /// Network or download failure. Retry may help.
    #[error("{0}")]
    Download(String),

    /// Tokenization failure. Check input text.
    #[error("{0}")]
    Tokenization(String),

    /// Device initialization failure. Fall back to CPU.
    #[error("{0}")]
    Device(String),

    /// Model or service configuration could not be read.
    #[error("{0}")]
    Config(String),

    /// Internal error. Report if seen.
    #[error("{0}")]
    Unexpected(String),
}

impl From<hf_hub::api::tokio::ApiError> for PipelineError {
    fn from(value: hf_hub::api::tokio::ApiError) -> Self {
        PipelineError::Download(format!("HuggingFace API error: {value}"))
    }
}

impl From<candle_core::Error> for PipelineError {
    fn from(value: candle_core::Error) -> Self {
        PipelineError::Unexpected(value.to_string())
    }
}

impl From<std::io::Error> for PipelineError {
    fn from(value: std::io::Error) -> Self {
        PipelineError::Unexpected(value.to_string())
    }
}

impl From<serde_json::Error> for PipelineError {
    fn from(value: serde_json::Error) -> Self {
        PipelineError::Config(format!("Invalid model config: {value}"))
    }
}

/// Why an analysis did not produce a model-backed result.
///
/// The display text of [`AnalysisError::EmptyInput`] is the `"Empty text"`
/// sentinel that reports hide from their warning line.
#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("Empty text")]
    EmptyInput,

    #[error(transparent)]
    ClassifierFailure(#[from] PipelineError),
}

impl AnalysisError {
    pub fn is_empty_input(&self) -> bool {
        matches!(self, AnalysisError::EmptyInput)
    }
}
