//! Sentiment analysis pipeline for classifying text emotional tone.
//!
//! Loads a pretrained sequence-classification checkpoint from the Hugging Face
//! Hub and scores text with it. The pipeline returns the model's raw
//! `(label, probability)` pairs; normalizing them into
//! positive / neutral / negative is left to
//! [`SentimentAnalyzer`](crate::sentiment::SentimentAnalyzer).
//!
//! ## Main Types
//!
//! - [`SentimentAnalysisPipeline`] - loaded model plus tokenizer; a [`Classifier`](crate::sentiment::Classifier)
//! - [`SentimentAnalysisPipelineBuilder`] - builder pattern for pipeline configuration
//! - [`SentimentAnalysisModel`] - trait for sentiment analysis model implementations
//! - [`ModernBertSize`] - available multilingual model sizes
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use sentiment_service::pipelines::sentiment_analysis_pipeline::*;
//! use sentiment_service::sentiment::{ModelVariant, SentimentAnalyzer};
//!
//! # async fn run() -> sentiment_service::core::Result<()> {
//! let pipeline = SentimentAnalysisPipelineBuilder::modernbert(ModernBertSize::Base)
//!     .cpu()
//!     .build()
//!     .await?;
//!
//! let analyzer = SentimentAnalyzer::new(pipeline, ModelVariant::Multilingual);
//! let result = analyzer.analyze("I love this product!");
//! println!("Sentiment: {} (confidence: {:.2})", result.sentiment, result.score);
//! # Ok(())
//! # }
//! ```

pub mod builder;
pub mod model;
pub mod pipeline;

pub use builder::SentimentAnalysisPipelineBuilder;
pub use model::SentimentAnalysisModel;
pub use pipeline::SentimentAnalysisPipeline;

pub use crate::models::{DistilBertSentimentModel, ModernBertSize, SentimentModernBertModel};
pub use crate::pipelines::utils::DeviceSelectable;
