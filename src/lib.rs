pub mod client;
pub mod core;
pub mod loaders;
pub mod models;
pub mod pipelines;
pub mod sentiment;
pub mod server;

// Re-export core types
pub use self::core::{AnalysisError, PipelineError, ServiceConfig};

pub use sentiment::{
    Classifier, ClassScores, KeywordClassifier, LabelMapping, ModelVariant, Sentiment,
    SentimentAnalyzer, SentimentResult,
};

// Re-export model types for easier access
pub use models::{DistilBertSentimentModel, ModernBertSize, SentimentModernBertModel};
