pub mod config;
pub mod error;

pub use config::{FallbackConfig, ModelConfig, ServerConfig, ServiceConfig};
pub use error::{AnalysisError, PipelineError, Result};
